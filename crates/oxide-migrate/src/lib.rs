//! Command capture and replay for schema migrations.
//!
//! A migration is written once against a [`CommandRecorder`](recorder::CommandRecorder).
//! The recorder captures every call as a
//! [`MigrationCommand`](command::MigrationCommand), and the captured list is
//! then either replayed (up) or inverted (down):
//!
//! - **Commands** - Plain, serializable schema and data changes
//! - **Recorder** - Captures commands in call order and reverses them
//! - **Render** - Turns commands into SQL through the `oxide-query` engine
//! - **Statement** - SQL plus its named bindings, executable on SQLite
//! - **Runner** - Applies or reverts a migration, with a dry-run mode
//!
//! # Example
//!
//! ```rust
//! use oxide_migrate::prelude::*;
//! use oxide_query::{QueryBuilder, SqliteDialect};
//!
//! struct CreatePosts;
//!
//! impl Migration for CreatePosts {
//!     fn name(&self) -> &str {
//!         "0001_create_posts"
//!     }
//!
//!     fn change(&self, recorder: &mut CommandRecorder) {
//!         recorder
//!             .create_table(
//!                 "posts",
//!                 vec![
//!                     ColumnDef::new("id", "INTEGER").primary_key(),
//!                     ColumnDef::new("title", "TEXT").not_null(),
//!                 ],
//!             )
//!             .add_column("posts", ColumnDef::new("body", "TEXT"));
//!     }
//! }
//!
//! let builder = QueryBuilder::new(SqliteDialect::new());
//! let down = plan(&builder, &CreatePosts, Direction::Down).unwrap();
//! assert_eq!(down[0].sql(), r#"ALTER TABLE "posts" DROP COLUMN "body""#);
//! assert_eq!(down[1].sql(), r#"DROP TABLE "posts""#);
//! ```

pub mod command;
pub mod error;
pub mod file;
pub mod recorder;
pub mod render;
pub mod runner;
pub mod statement;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::command::{ColumnDef, ForeignKeyAction, ForeignKeyDef, MigrationCommand};
    pub use crate::error::{MigrateError, Result};
    pub use crate::file::MigrationFile;
    pub use crate::recorder::CommandRecorder;
    pub use crate::render::{render, render_all};
    pub use crate::runner::{plan, Direction, Migration, MigrationRunner};
    pub use crate::statement::Statement;
}
