//! SQLite dialect.

use super::Dialect;
use crate::builder::JsonExpressionBuilder;
use crate::expression::JsonExpression;
use crate::registry::BuilderRegistry;

/// SQLite dialect. JSON is stored as text, so no cast is applied.
#[derive(Debug, Default, Clone, Copy)]
pub struct SqliteDialect;

impl SqliteDialect {
    /// Creates a new SQLite dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for SqliteDialect {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn register_builders(&self, registry: &mut BuilderRegistry) {
        registry.register::<JsonExpression, _, _>(JsonExpressionBuilder::new);
    }
}
