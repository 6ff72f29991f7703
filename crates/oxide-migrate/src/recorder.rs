//! Command capture.
//!
//! A [`CommandRecorder`] is handed to a migration in place of a live
//! connection. Every schema-builder call is captured in call order; the
//! captured list can be replayed as is (up) or reversed (down).

use oxide_query::SqlValue;
use tracing::trace;

use crate::command::{ColumnDef, ForeignKeyDef, MigrationCommand};
use crate::error::{MigrateError, Result};

/// Captures migration commands instead of executing them.
#[derive(Debug, Clone, Default)]
pub struct CommandRecorder {
    commands: Vec<MigrationCommand>,
}

impl CommandRecorder {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Captures an already built command.
    pub fn record(&mut self, command: MigrationCommand) -> &mut Self {
        trace!(command = %command, "recorded command");
        self.commands.push(command);
        self
    }

    /// Captured commands in call order.
    #[must_use]
    pub fn commands(&self) -> &[MigrationCommand] {
        &self.commands
    }

    /// Consumes the recorder, returning the captured commands.
    #[must_use]
    pub fn into_commands(self) -> Vec<MigrationCommand> {
        self.commands
    }

    /// Returns the commands undoing everything captured, last first.
    ///
    /// # Errors
    ///
    /// Returns [`MigrateError::Irreversible`] naming the first captured
    /// command that has no inverse.
    pub fn reverse(&self) -> Result<Vec<MigrationCommand>> {
        if let Some(command) = self.commands.iter().find(|c| c.inverse().is_none()) {
            return Err(MigrateError::Irreversible {
                command: command.to_string(),
            });
        }
        Ok(self
            .commands
            .iter()
            .rev()
            .filter_map(MigrationCommand::inverse)
            .collect())
    }

    /// Creates a table.
    pub fn create_table(&mut self, table: &str, columns: Vec<ColumnDef>) -> &mut Self {
        self.record(MigrationCommand::CreateTable {
            table: table.to_string(),
            columns,
        })
    }

    /// Drops a table.
    ///
    /// `columns` is the table definition restored when reversing.
    pub fn drop_table(&mut self, table: &str, columns: Vec<ColumnDef>) -> &mut Self {
        self.record(MigrationCommand::DropTable {
            table: table.to_string(),
            columns,
        })
    }

    /// Renames a table.
    pub fn rename_table(&mut self, from: &str, to: &str) -> &mut Self {
        self.record(MigrationCommand::RenameTable {
            from: from.to_string(),
            to: to.to_string(),
        })
    }

    /// Adds a column.
    pub fn add_column(&mut self, table: &str, column: ColumnDef) -> &mut Self {
        self.record(MigrationCommand::AddColumn {
            table: table.to_string(),
            column,
        })
    }

    /// Drops a column.
    ///
    /// `column` is the definition restored when reversing.
    pub fn drop_column(&mut self, table: &str, column: ColumnDef) -> &mut Self {
        self.record(MigrationCommand::DropColumn {
            table: table.to_string(),
            column,
        })
    }

    /// Renames a column.
    pub fn rename_column(&mut self, table: &str, from: &str, to: &str) -> &mut Self {
        self.record(MigrationCommand::RenameColumn {
            table: table.to_string(),
            from: from.to_string(),
            to: to.to_string(),
        })
    }

    /// Changes a column definition. Not reversible.
    pub fn alter_column(&mut self, table: &str, column: ColumnDef) -> &mut Self {
        self.record(MigrationCommand::AlterColumn {
            table: table.to_string(),
            column,
        })
    }

    /// Creates an index.
    pub fn create_index(
        &mut self,
        name: &str,
        table: &str,
        columns: &[&str],
        unique: bool,
    ) -> &mut Self {
        self.record(MigrationCommand::CreateIndex {
            name: name.to_string(),
            table: table.to_string(),
            columns: to_strings(columns),
            unique,
        })
    }

    /// Drops an index.
    pub fn drop_index(
        &mut self,
        name: &str,
        table: &str,
        columns: &[&str],
        unique: bool,
    ) -> &mut Self {
        self.record(MigrationCommand::DropIndex {
            name: name.to_string(),
            table: table.to_string(),
            columns: to_strings(columns),
            unique,
        })
    }

    /// Adds a named primary key constraint.
    pub fn add_primary_key(&mut self, name: &str, table: &str, columns: &[&str]) -> &mut Self {
        self.record(MigrationCommand::AddPrimaryKey {
            name: name.to_string(),
            table: table.to_string(),
            columns: to_strings(columns),
        })
    }

    /// Drops a primary key constraint.
    pub fn drop_primary_key(&mut self, name: &str, table: &str, columns: &[&str]) -> &mut Self {
        self.record(MigrationCommand::DropPrimaryKey {
            name: name.to_string(),
            table: table.to_string(),
            columns: to_strings(columns),
        })
    }

    /// Adds a foreign key constraint.
    pub fn add_foreign_key(&mut self, foreign_key: ForeignKeyDef) -> &mut Self {
        self.record(MigrationCommand::AddForeignKey(foreign_key))
    }

    /// Drops a foreign key constraint.
    pub fn drop_foreign_key(&mut self, foreign_key: ForeignKeyDef) -> &mut Self {
        self.record(MigrationCommand::DropForeignKey(foreign_key))
    }

    /// Inserts one row. Not reversible.
    pub fn insert(&mut self, table: &str, values: Vec<(&str, SqlValue)>) -> &mut Self {
        self.record(MigrationCommand::Insert {
            table: table.to_string(),
            values: values
                .into_iter()
                .map(|(column, value)| (column.to_string(), value))
                .collect(),
        })
    }

    /// Deletes the rows matching every `(column, value)` pair. Not reversible.
    pub fn delete(&mut self, table: &str, conditions: Vec<(&str, SqlValue)>) -> &mut Self {
        self.record(MigrationCommand::Delete {
            table: table.to_string(),
            conditions: conditions
                .into_iter()
                .map(|(column, value)| (column.to_string(), value))
                .collect(),
        })
    }

    /// Runs raw SQL with named parameters. Not reversible.
    pub fn execute(&mut self, sql: &str, params: Vec<(&str, SqlValue)>) -> &mut Self {
        self.record(MigrationCommand::Execute {
            sql: sql.to_string(),
            params: params
                .into_iter()
                .map(|(name, value)| (name.to_string(), value))
                .collect(),
        })
    }
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_captures_in_call_order() {
        let mut recorder = CommandRecorder::new();
        recorder
            .create_table("users", vec![ColumnDef::new("id", "INTEGER").primary_key()])
            .add_column("users", ColumnDef::new("email", "TEXT"))
            .create_index("idx_users_email", "users", &["email"], true);

        let kinds: Vec<_> = recorder.commands().iter().map(MigrationCommand::kind).collect();
        assert_eq!(kinds, vec!["create_table", "add_column", "create_index"]);
    }

    #[test]
    fn test_reverse_inverts_in_reverse_order() {
        let mut recorder = CommandRecorder::new();
        recorder
            .create_table("users", vec![ColumnDef::new("id", "INTEGER").primary_key()])
            .rename_column("users", "mail", "email")
            .add_primary_key("pk_users", "users", &["id"]);

        let reversed = recorder.reverse().unwrap();
        let kinds: Vec<_> = reversed.iter().map(MigrationCommand::kind).collect();
        assert_eq!(kinds, vec!["drop_primary_key", "rename_column", "drop_table"]);
        assert_eq!(
            reversed[1],
            MigrationCommand::RenameColumn {
                table: String::from("users"),
                from: String::from("email"),
                to: String::from("mail"),
            }
        );
    }

    #[test]
    fn test_reverse_names_first_irreversible_command() {
        let mut recorder = CommandRecorder::new();
        recorder
            .create_table("users", vec![ColumnDef::new("id", "INTEGER")])
            .insert("users", vec![("id", SqlValue::Int(1))])
            .execute("UPDATE users SET id = 2", vec![]);

        match recorder.reverse() {
            Err(MigrateError::Irreversible { command }) => assert_eq!(command, "insert(users)"),
            other => panic!("Expected Irreversible, got {other:?}"),
        }
    }
}
