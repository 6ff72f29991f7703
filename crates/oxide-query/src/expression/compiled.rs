//! Already-compiled SQL handles.

use std::fmt;

use crate::impl_expression;

/// Opaque SQL that has already been through the compiler.
///
/// Produced by [`QueryBuilder::prepare`](crate::QueryBuilder::prepare). Its
/// bindings already live in the table of the pass that produced it, so
/// compiling it again yields the same text and binds nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compiled {
    sql: String,
}

impl Compiled {
    /// Wraps compiled SQL text.
    #[must_use]
    pub fn new(sql: impl Into<String>) -> Self {
        Self { sql: sql.into() }
    }

    /// Returns the SQL text.
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }
}

impl fmt::Display for Compiled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}

impl_expression!(Compiled);
