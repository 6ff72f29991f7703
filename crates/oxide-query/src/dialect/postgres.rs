//! PostgreSQL dialect.

use super::Dialect;
use crate::builder::JsonExpressionBuilder;
use crate::expression::{JsonExpression, JsonType};
use crate::registry::BuilderRegistry;

/// PostgreSQL dialect: JSON parameters are cast to `json`/`jsonb`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PostgresDialect;

impl PostgresDialect {
    /// Creates a new PostgreSQL dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for PostgresDialect {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn json_cast(&self, json_type: JsonType) -> Option<&'static str> {
        Some(json_type.as_str())
    }

    fn register_builders(&self, registry: &mut BuilderRegistry) {
        registry.register::<JsonExpression, _, _>(JsonExpressionBuilder::new);
    }
}
