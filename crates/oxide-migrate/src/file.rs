//! Migrations stored as JSON command lists.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::command::MigrationCommand;
use crate::error::Result;
use crate::recorder::CommandRecorder;
use crate::runner::Migration;

/// A migration loaded from a file.
///
/// ```json
/// {
///   "name": "0001_create_users",
///   "commands": [
///     {"create_table": {"table": "users", "columns": [
///       {"name": "id", "data_type": "INTEGER", "primary_key": true}
///     ]}}
///   ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MigrationFile {
    /// Migration name.
    pub name: String,
    /// Commands, in the order they run up.
    pub commands: Vec<MigrationCommand>,
}

impl MigrationFile {
    /// Reads and parses a migration file.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or is not a valid migration.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

impl Migration for MigrationFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn change(&self, recorder: &mut CommandRecorder) {
        for command in &self.commands {
            recorder.record(command.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::error::MigrateError;

    #[test]
    fn test_load() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"name": "0001_users", "commands": [{{"drop_index": {{"name": "idx", "table": "users", "columns": ["email"]}}}}]}}"#
        )
        .unwrap();

        let migration = MigrationFile::load(file.path()).unwrap();
        assert_eq!(migration.name(), "0001_users");

        let mut recorder = CommandRecorder::new();
        migration.change(&mut recorder);
        assert_eq!(recorder.commands().len(), 1);
        assert_eq!(recorder.reverse().unwrap()[0].kind(), "create_index");
    }

    #[test]
    fn test_load_invalid() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{\"name\": 1}}").unwrap();
        assert!(matches!(
            MigrationFile::load(file.path()),
            Err(MigrateError::Serialization(_))
        ));
    }
}
