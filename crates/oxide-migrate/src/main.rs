//! oxide-migrate CLI
//!
//! Renders or applies migrations stored as JSON command files.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use sqlx::sqlite::SqlitePoolOptions;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use oxide_migrate::prelude::*;
use oxide_query::{GenericDialect, PostgresDialect, QueryBuilder, SqliteDialect};

/// Command capture/replay migrations.
#[derive(Parser)]
#[command(name = "oxide-migrate")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the SQL a migration file renders to.
    Sql {
        /// Migration file (JSON).
        file: PathBuf,

        /// Render the reverting statements instead.
        #[arg(long)]
        down: bool,

        /// SQL dialect to render for.
        #[arg(long, value_enum, default_value_t = DialectArg::Sqlite)]
        dialect: DialectArg,
    },

    /// Apply a migration file to a SQLite database.
    Apply {
        /// Migration file (JSON).
        file: PathBuf,

        /// Revert the migration instead of applying it.
        #[arg(long)]
        down: bool,

        /// Database URL.
        #[arg(short, long, env = "DATABASE_URL", default_value = "sqlite:db.sqlite3")]
        database: String,

        /// Show SQL without executing (dry run).
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum DialectArg {
    Generic,
    Postgres,
    Sqlite,
}

impl DialectArg {
    fn builder(self) -> QueryBuilder {
        match self {
            Self::Generic => QueryBuilder::new(GenericDialect::new()),
            Self::Postgres => QueryBuilder::new(PostgresDialect::new()),
            Self::Sqlite => QueryBuilder::new(SqliteDialect::new()),
        }
    }
}

const fn direction(down: bool) -> Direction {
    if down {
        Direction::Down
    } else {
        Direction::Up
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Sql {
            file,
            down,
            dialect,
        } => {
            let migration = MigrationFile::load(&file)?;
            let builder = dialect.builder();
            for statement in plan(&builder, &migration, direction(down))? {
                println!("{};", statement.raw_sql(builder.dialect()));
            }
        }

        Commands::Apply {
            file,
            down,
            database,
            dry_run,
        } => {
            let migration = MigrationFile::load(&file)?;
            let pool = SqlitePoolOptions::new()
                .max_connections(1)
                .connect(&database)
                .await?;

            let runner =
                MigrationRunner::new(pool, QueryBuilder::new(SqliteDialect::new())).dry_run(dry_run);
            let statements = match direction(down) {
                Direction::Up => runner.up(&migration).await?,
                Direction::Down => runner.down(&migration).await?,
            };

            if dry_run {
                for statement in &statements {
                    println!("{};", statement.raw_sql(runner.builder().dialect()));
                }
            }
            info!(
                name = %migration.name,
                statements = statements.len(),
                "Done"
            );
        }
    }

    Ok(())
}
