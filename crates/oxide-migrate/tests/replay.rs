//! End-to-end replay: JSON migration files applied to a SQLite database on
//! disk, then reverted.

use oxide_migrate::prelude::*;
use oxide_query::{QueryBuilder, SqlValue, SqliteDialect};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;

const SCHEMA: &str = r#"{
  "name": "0001_schema",
  "commands": [
    {"create_table": {"table": "authors", "columns": [
      {"name": "id", "data_type": "INTEGER", "primary_key": true, "auto_increment": true},
      {"name": "name", "data_type": "TEXT", "not_null": true},
      {"name": "active", "data_type": "BOOLEAN", "default": true}
    ]}},
    {"add_column": {"table": "authors", "column": {"name": "bio", "data_type": "TEXT"}}},
    {"create_index": {"name": "idx_authors_name", "table": "authors", "columns": ["name"], "unique": true}}
  ]
}"#;

async fn open(dir: &tempfile::TempDir) -> SqlitePool {
    let options = SqliteConnectOptions::new()
        .filename(dir.path().join("test.sqlite3"))
        .create_if_missing(true);
    SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .expect("Failed to open SQLite database")
}

fn write_migration(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("Failed to write migration file");
    path
}

async fn table_exists(pool: &SqlitePool, table: &str) -> bool {
    sqlx::query("SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?")
        .bind(table)
        .fetch_optional(pool)
        .await
        .unwrap()
        .is_some()
}

#[tokio::test]
async fn apply_and_revert_file() {
    let dir = tempfile::tempdir().unwrap();
    let pool = open(&dir).await;
    let migration = MigrationFile::load(write_migration(&dir, "0001.json", SCHEMA)).unwrap();
    let runner = MigrationRunner::new(pool.clone(), QueryBuilder::new(SqliteDialect::new()));

    let statements = runner.up(&migration).await.unwrap();
    assert_eq!(statements.len(), 3);
    assert!(table_exists(&pool, "authors").await);

    sqlx::query("INSERT INTO authors (name, bio) VALUES ('Ada', NULL)")
        .execute(&pool)
        .await
        .unwrap();
    let row = sqlx::query("SELECT active FROM authors")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert!(row.get::<bool, _>("active"));

    let statements = runner.down(&migration).await.unwrap();
    assert_eq!(
        statements.iter().map(Statement::sql).collect::<Vec<_>>(),
        vec![
            "DROP INDEX \"idx_authors_name\"",
            "ALTER TABLE \"authors\" DROP COLUMN \"bio\"",
            "DROP TABLE \"authors\"",
        ]
    );
    assert!(!table_exists(&pool, "authors").await);
}

struct Seed;

impl Migration for Seed {
    fn name(&self) -> &str {
        "0002_seed"
    }

    fn change(&self, recorder: &mut CommandRecorder) {
        recorder
            .insert(
                "authors",
                vec![
                    ("name", SqlValue::Text(String::from("Grace"))),
                    ("bio", SqlValue::Text(String::from("it's :p0 in a string"))),
                ],
            )
            .insert("authors", vec![("name", SqlValue::Text(String::from("Linus")))])
            .delete("authors", vec![("name", SqlValue::Text(String::from("Linus")))])
            .execute(
                "UPDATE authors SET active = :active WHERE name = :name",
                vec![
                    (":active", SqlValue::Bool(false)),
                    (":name", SqlValue::Text(String::from("Grace"))),
                ],
            );
    }
}

#[tokio::test]
async fn data_commands_bind_values() {
    let dir = tempfile::tempdir().unwrap();
    let pool = open(&dir).await;
    let runner = MigrationRunner::new(pool.clone(), QueryBuilder::new(SqliteDialect::new()));
    let schema = MigrationFile::load(write_migration(&dir, "0001.json", SCHEMA)).unwrap();

    runner.up(&schema).await.unwrap();
    runner.up(&Seed).await.unwrap();

    let rows = sqlx::query("SELECT name, bio, active FROM authors")
        .fetch_all(&pool)
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get::<String, _>("name"), "Grace");
    assert_eq!(rows[0].get::<String, _>("bio"), "it's :p0 in a string");
    assert!(!rows[0].get::<bool, _>("active"));

    assert!(matches!(
        runner.down(&Seed).await,
        Err(MigrateError::Irreversible { .. })
    ));
}

#[test]
fn unsupported_commands_are_marked_for_sqlite() {
    let fk = MigrationCommand::AddForeignKey(ForeignKeyDef {
        name: String::from("fk_books_author"),
        table: String::from("books"),
        columns: vec![String::from("author_id")],
        ref_table: String::from("authors"),
        ref_columns: vec![String::from("id")],
        on_delete: ForeignKeyAction::Cascade,
        on_update: ForeignKeyAction::default(),
    });
    let statement = render(&QueryBuilder::new(SqliteDialect::new()), &fk).unwrap();
    assert_eq!(statement.sql(), "-- unsupported: add_foreign_key(fk_books_author)");
}
