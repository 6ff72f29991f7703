//! Migration replay.
//!
//! A migration describes its changes once, in [`Migration::change`]. Running
//! it up replays the captured commands; running it down replays their
//! inverses. Both directions can be rendered without a database.

use oxide_query::QueryBuilder;
use sqlx::sqlite::SqlitePool;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::recorder::CommandRecorder;
use crate::render::{render_all, UNSUPPORTED_PREFIX};
use crate::statement::Statement;

/// A migration written against a [`CommandRecorder`].
pub trait Migration: Send + Sync {
    /// Migration name, used in logs.
    fn name(&self) -> &str;

    /// Records the changes this migration makes.
    fn change(&self, recorder: &mut CommandRecorder);
}

/// Replay direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Apply the captured commands.
    Up,
    /// Apply the inverse commands, last first.
    Down,
}

/// Renders the statements a migration would run in `direction`.
///
/// # Errors
///
/// Fails if a command cannot be rendered, or, going down, if a command has
/// no inverse.
pub fn plan(
    builder: &QueryBuilder,
    migration: &dyn Migration,
    direction: Direction,
) -> Result<Vec<Statement>> {
    let mut recorder = CommandRecorder::new();
    migration.change(&mut recorder);

    let commands = match direction {
        Direction::Up => recorder.into_commands(),
        Direction::Down => recorder.reverse()?,
    };
    render_all(builder, &commands)
}

/// Runs migrations against a SQLite database.
#[derive(Debug)]
pub struct MigrationRunner {
    pool: SqlitePool,
    builder: QueryBuilder,
    dry_run: bool,
}

impl MigrationRunner {
    /// Creates a runner using `builder` to render commands.
    #[must_use]
    pub fn new(pool: SqlitePool, builder: QueryBuilder) -> Self {
        Self {
            pool,
            builder,
            dry_run: false,
        }
    }

    /// Enables dry-run mode (statements are rendered but not executed).
    #[must_use]
    pub fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    /// Returns the query builder.
    #[must_use]
    pub const fn builder(&self) -> &QueryBuilder {
        &self.builder
    }

    /// Applies a migration, returning the statements run.
    ///
    /// # Errors
    ///
    /// See [`plan`]; also fails on the first statement the database rejects.
    pub async fn up(&self, migration: &dyn Migration) -> Result<Vec<Statement>> {
        self.run(migration, Direction::Up).await
    }

    /// Reverts a migration, returning the statements run.
    ///
    /// # Errors
    ///
    /// See [`up`](Self::up).
    pub async fn down(&self, migration: &dyn Migration) -> Result<Vec<Statement>> {
        self.run(migration, Direction::Down).await
    }

    async fn run(&self, migration: &dyn Migration, direction: Direction) -> Result<Vec<Statement>> {
        info!(
            name = migration.name(),
            direction = ?direction,
            dry_run = self.dry_run,
            "Running migration"
        );

        let statements = plan(&self.builder, migration, direction)?;
        for statement in &statements {
            if statement.sql().starts_with(UNSUPPORTED_PREFIX) {
                warn!(statement = %statement, "Skipping unsupported command");
                continue;
            }
            if self.dry_run {
                debug!(sql = %statement.raw_sql(self.builder.dialect()), "Dry run");
                continue;
            }
            statement.execute(&self.pool).await?;
        }

        info!(
            name = migration.name(),
            statements = statements.len(),
            "Migration finished"
        );
        Ok(statements)
    }
}
