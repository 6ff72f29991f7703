//! Raw SQL fragments.

use std::fmt;

use crate::impl_expression;
use crate::params::{Param, ParameterTable};
use crate::value::ToSqlValue;

use super::TypedValue;

/// A SQL fragment inserted verbatim, plus the parameters its placeholders use.
///
/// The text is never escaped or quoted by the compiler.
///
/// ```rust
/// use oxide_query::expression::Expression;
///
/// let expr = Expression::new("x = :p1").bind(":p1", 5);
/// assert_eq!(expr.sql(), "x = :p1");
/// assert_eq!(expr.params().len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Expression {
    sql: String,
    params: ParameterTable,
}

impl Expression {
    /// Creates a fragment with no parameters.
    ///
    /// **Warning**: only use this for SQL that doesn't contain user input.
    #[must_use]
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: ParameterTable::new(),
        }
    }

    /// Creates a fragment with pre-built parameters.
    #[must_use]
    pub fn with_params(sql: impl Into<String>, params: ParameterTable) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }

    /// Binds a literal to one of the fragment's placeholders.
    #[must_use]
    pub fn bind<T: ToSqlValue>(mut self, name: impl Into<String>, value: T) -> Self {
        self.params.insert(name, Param::value(value));
        self
    }

    /// Binds a typed value to one of the fragment's placeholders.
    #[must_use]
    pub fn bind_typed(mut self, name: impl Into<String>, value: TypedValue) -> Self {
        self.params.insert(name, value);
        self
    }

    /// Returns the SQL text.
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Returns the attached parameters.
    #[must_use]
    pub const fn params(&self) -> &ParameterTable {
        &self.params
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}

impl_expression!(Expression);
