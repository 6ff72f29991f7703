//! Captured schema and data commands.
//!
//! Commands are plain data: they can be recorded, reversed, serialized to a
//! migration file and rendered later against any dialect.

use std::fmt;

use oxide_query::SqlValue;
use serde::{Deserialize, Serialize};

/// Foreign key action (ON DELETE, ON UPDATE).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ForeignKeyAction {
    /// No action (error if referenced row is deleted/updated).
    #[default]
    NoAction,
    /// Restrict (same as NoAction but checked immediately).
    Restrict,
    /// Cascade the delete/update to referencing rows.
    Cascade,
    /// Set the foreign key column to NULL.
    SetNull,
    /// Set the foreign key column to its default value.
    SetDefault,
}

impl ForeignKeyAction {
    /// SQL keyword(s) for this action.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::NoAction => "NO ACTION",
            Self::Restrict => "RESTRICT",
            Self::Cascade => "CASCADE",
            Self::SetNull => "SET NULL",
            Self::SetDefault => "SET DEFAULT",
        }
    }
}

/// A column definition carried by table and column commands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDef {
    /// Column name.
    pub name: String,
    /// Database type, written as is (`INTEGER`, `VARCHAR(255)`, ...).
    pub data_type: String,
    /// NOT NULL constraint.
    #[serde(default)]
    pub not_null: bool,
    /// Inline PRIMARY KEY.
    #[serde(default)]
    pub primary_key: bool,
    /// AUTOINCREMENT (only meaningful with `primary_key`).
    #[serde(default)]
    pub auto_increment: bool,
    /// UNIQUE constraint.
    #[serde(default)]
    pub unique: bool,
    /// Default value, rendered inline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<SqlValue>,
}

impl ColumnDef {
    /// Creates a nullable column.
    #[must_use]
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            not_null: false,
            primary_key: false,
            auto_increment: false,
            unique: false,
            default: None,
        }
    }

    /// Sets NOT NULL.
    #[must_use]
    pub const fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    /// Marks the column as the primary key.
    #[must_use]
    pub const fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.not_null = true;
        self
    }

    /// Sets AUTOINCREMENT.
    #[must_use]
    pub const fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    /// Sets UNIQUE.
    #[must_use]
    pub const fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Sets the default value.
    #[must_use]
    pub fn default(mut self, value: impl Into<SqlValue>) -> Self {
        self.default = Some(value.into());
        self
    }
}

/// A foreign key constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyDef {
    /// Constraint name.
    pub name: String,
    /// Referencing table.
    pub table: String,
    /// Referencing column(s).
    pub columns: Vec<String>,
    /// Referenced table.
    pub ref_table: String,
    /// Referenced column(s).
    pub ref_columns: Vec<String>,
    /// Action on delete.
    #[serde(default)]
    pub on_delete: ForeignKeyAction,
    /// Action on update.
    #[serde(default)]
    pub on_update: ForeignKeyAction,
}

/// A single captured command.
///
/// Commands that remove something carry the definition needed to recreate
/// it, so they can be reversed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MigrationCommand {
    /// Create a table.
    CreateTable {
        /// Table name.
        table: String,
        /// Column definitions.
        columns: Vec<ColumnDef>,
    },
    /// Drop a table.
    DropTable {
        /// Table name.
        table: String,
        /// Definition used to recreate the table on reversal.
        columns: Vec<ColumnDef>,
    },
    /// Rename a table.
    RenameTable {
        /// Current name.
        from: String,
        /// New name.
        to: String,
    },
    /// Add a column.
    AddColumn {
        /// Table name.
        table: String,
        /// Column definition.
        column: ColumnDef,
    },
    /// Drop a column.
    DropColumn {
        /// Table name.
        table: String,
        /// Definition used to recreate the column on reversal.
        column: ColumnDef,
    },
    /// Rename a column.
    RenameColumn {
        /// Table name.
        table: String,
        /// Current name.
        from: String,
        /// New name.
        to: String,
    },
    /// Change a column's type or constraints.
    AlterColumn {
        /// Table name.
        table: String,
        /// New definition.
        column: ColumnDef,
    },
    /// Create an index.
    CreateIndex {
        /// Index name.
        name: String,
        /// Table name.
        table: String,
        /// Indexed columns.
        columns: Vec<String>,
        /// UNIQUE index.
        #[serde(default)]
        unique: bool,
    },
    /// Drop an index.
    DropIndex {
        /// Index name.
        name: String,
        /// Table name.
        table: String,
        /// Indexed columns.
        columns: Vec<String>,
        /// UNIQUE index.
        #[serde(default)]
        unique: bool,
    },
    /// Add a named primary key constraint.
    AddPrimaryKey {
        /// Constraint name.
        name: String,
        /// Table name.
        table: String,
        /// Key columns.
        columns: Vec<String>,
    },
    /// Drop a named primary key constraint.
    DropPrimaryKey {
        /// Constraint name.
        name: String,
        /// Table name.
        table: String,
        /// Key columns.
        columns: Vec<String>,
    },
    /// Add a foreign key constraint.
    AddForeignKey(ForeignKeyDef),
    /// Drop a foreign key constraint.
    DropForeignKey(ForeignKeyDef),
    /// Insert one row.
    Insert {
        /// Table name.
        table: String,
        /// Column/value pairs.
        values: Vec<(String, SqlValue)>,
    },
    /// Delete rows matching all column/value pairs; all rows when empty.
    Delete {
        /// Table name.
        table: String,
        /// Equality conditions, ANDed.
        #[serde(default)]
        conditions: Vec<(String, SqlValue)>,
    },
    /// Run a raw statement with named parameters.
    Execute {
        /// SQL text.
        sql: String,
        /// Named parameters referenced by `sql`.
        #[serde(default)]
        params: Vec<(String, SqlValue)>,
    },
}

impl MigrationCommand {
    /// Short command name, used in errors and logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::CreateTable { .. } => "create_table",
            Self::DropTable { .. } => "drop_table",
            Self::RenameTable { .. } => "rename_table",
            Self::AddColumn { .. } => "add_column",
            Self::DropColumn { .. } => "drop_column",
            Self::RenameColumn { .. } => "rename_column",
            Self::AlterColumn { .. } => "alter_column",
            Self::CreateIndex { .. } => "create_index",
            Self::DropIndex { .. } => "drop_index",
            Self::AddPrimaryKey { .. } => "add_primary_key",
            Self::DropPrimaryKey { .. } => "drop_primary_key",
            Self::AddForeignKey(_) => "add_foreign_key",
            Self::DropForeignKey(_) => "drop_foreign_key",
            Self::Insert { .. } => "insert",
            Self::Delete { .. } => "delete",
            Self::Execute { .. } => "execute",
        }
    }

    /// Returns the command undoing this one, if there is one.
    #[must_use]
    pub fn inverse(&self) -> Option<Self> {
        let inverse = match self {
            Self::CreateTable { table, columns } => Self::DropTable {
                table: table.clone(),
                columns: columns.clone(),
            },
            Self::DropTable { table, columns } => Self::CreateTable {
                table: table.clone(),
                columns: columns.clone(),
            },
            Self::RenameTable { from, to } => Self::RenameTable {
                from: to.clone(),
                to: from.clone(),
            },
            Self::AddColumn { table, column } => Self::DropColumn {
                table: table.clone(),
                column: column.clone(),
            },
            Self::DropColumn { table, column } => Self::AddColumn {
                table: table.clone(),
                column: column.clone(),
            },
            Self::RenameColumn { table, from, to } => Self::RenameColumn {
                table: table.clone(),
                from: to.clone(),
                to: from.clone(),
            },
            Self::CreateIndex {
                name,
                table,
                columns,
                unique,
            } => Self::DropIndex {
                name: name.clone(),
                table: table.clone(),
                columns: columns.clone(),
                unique: *unique,
            },
            Self::DropIndex {
                name,
                table,
                columns,
                unique,
            } => Self::CreateIndex {
                name: name.clone(),
                table: table.clone(),
                columns: columns.clone(),
                unique: *unique,
            },
            Self::AddPrimaryKey {
                name,
                table,
                columns,
            } => Self::DropPrimaryKey {
                name: name.clone(),
                table: table.clone(),
                columns: columns.clone(),
            },
            Self::DropPrimaryKey {
                name,
                table,
                columns,
            } => Self::AddPrimaryKey {
                name: name.clone(),
                table: table.clone(),
                columns: columns.clone(),
            },
            Self::AddForeignKey(fk) => Self::DropForeignKey(fk.clone()),
            Self::DropForeignKey(fk) => Self::AddForeignKey(fk.clone()),
            // The previous definition or the affected rows are unknown.
            Self::AlterColumn { .. }
            | Self::Insert { .. }
            | Self::Delete { .. }
            | Self::Execute { .. } => return None,
        };
        Some(inverse)
    }
}

impl fmt::Display for MigrationCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateTable { table, .. }
            | Self::DropTable { table, .. }
            | Self::AddColumn { table, .. }
            | Self::DropColumn { table, .. }
            | Self::RenameColumn { table, .. }
            | Self::AlterColumn { table, .. }
            | Self::Insert { table, .. }
            | Self::Delete { table, .. } => write!(f, "{}({table})", self.kind()),
            Self::RenameTable { from, .. } => write!(f, "{}({from})", self.kind()),
            Self::CreateIndex { name, .. }
            | Self::DropIndex { name, .. }
            | Self::AddPrimaryKey { name, .. }
            | Self::DropPrimaryKey { name, .. } => write!(f, "{}({name})", self.kind()),
            Self::AddForeignKey(fk) | Self::DropForeignKey(fk) => {
                write!(f, "{}({})", self.kind(), fk.name)
            }
            Self::Execute { .. } => f.write_str(self.kind()),
        }
    }
}
