//! Column-first condition helpers.

use crate::expression::Operand;
use crate::value::SqlValue;

use super::condition::{
    BetweenCondition, ExistsCondition, InCondition, InValues, SimpleCondition,
};
use super::Query;

/// Creates a column reference.
#[must_use]
pub fn col(name: &str) -> Column {
    Column {
        name: String::from(name),
    }
}

/// A column reference that builds conditions.
///
/// ```rust
/// use oxide_query::query::col;
///
/// let active_adults = col("active").eq(true).and(col("age").gt_eq(18));
/// assert!(active_adults.is_expression());
/// ```
#[derive(Debug, Clone)]
pub struct Column {
    name: String,
}

impl Column {
    /// Creates a qualified column reference (`table.name`).
    #[must_use]
    pub fn qualified(table: &str, name: &str) -> Self {
        Self {
            name: format!("{table}.{name}"),
        }
    }

    /// Column name as written.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    fn compare(self, operator: &str, value: impl Into<Operand>) -> Operand {
        SimpleCondition::new(self.name, operator, value).into()
    }

    /// Creates an equality condition.
    #[must_use]
    pub fn eq(self, value: impl Into<Operand>) -> Operand {
        self.compare("=", value)
    }

    /// Creates an inequality condition.
    #[must_use]
    pub fn not_eq(self, value: impl Into<Operand>) -> Operand {
        self.compare("<>", value)
    }

    /// Creates a less-than condition.
    #[must_use]
    pub fn lt(self, value: impl Into<Operand>) -> Operand {
        self.compare("<", value)
    }

    /// Creates a less-than-or-equal condition.
    #[must_use]
    pub fn lt_eq(self, value: impl Into<Operand>) -> Operand {
        self.compare("<=", value)
    }

    /// Creates a greater-than condition.
    #[must_use]
    pub fn gt(self, value: impl Into<Operand>) -> Operand {
        self.compare(">", value)
    }

    /// Creates a greater-than-or-equal condition.
    #[must_use]
    pub fn gt_eq(self, value: impl Into<Operand>) -> Operand {
        self.compare(">=", value)
    }

    /// Creates a LIKE condition.
    #[must_use]
    pub fn like(self, pattern: impl Into<Operand>) -> Operand {
        self.compare("LIKE", pattern)
    }

    /// Creates a NOT LIKE condition.
    #[must_use]
    pub fn not_like(self, pattern: impl Into<Operand>) -> Operand {
        self.compare("NOT LIKE", pattern)
    }

    /// Creates an IS NULL condition.
    #[must_use]
    pub fn is_null(self) -> Operand {
        self.compare("IS", SqlValue::Null)
    }

    /// Creates an IS NOT NULL condition.
    #[must_use]
    pub fn is_not_null(self) -> Operand {
        self.compare("IS NOT", SqlValue::Null)
    }

    /// Creates a BETWEEN condition.
    #[must_use]
    pub fn between(self, low: impl Into<Operand>, high: impl Into<Operand>) -> Operand {
        BetweenCondition::new(self.name, low, high, false).into()
    }

    /// Creates a NOT BETWEEN condition.
    #[must_use]
    pub fn not_between(self, low: impl Into<Operand>, high: impl Into<Operand>) -> Operand {
        BetweenCondition::new(self.name, low, high, true).into()
    }

    /// Creates an IN condition over a list.
    #[must_use]
    pub fn in_list<T: Into<Operand>>(self, values: Vec<T>) -> Operand {
        let values = values.into_iter().map(Into::into).collect();
        InCondition::new(self.name, InValues::List(values), false).into()
    }

    /// Creates a NOT IN condition over a list.
    #[must_use]
    pub fn not_in_list<T: Into<Operand>>(self, values: Vec<T>) -> Operand {
        let values = values.into_iter().map(Into::into).collect();
        InCondition::new(self.name, InValues::List(values), true).into()
    }

    /// Creates an IN condition over a sub-query.
    #[must_use]
    pub fn in_query(self, query: Query) -> Operand {
        InCondition::new(self.name, InValues::Query(Box::new(query)), false).into()
    }

    /// Creates a NOT IN condition over a sub-query.
    #[must_use]
    pub fn not_in_query(self, query: Query) -> Operand {
        InCondition::new(self.name, InValues::Query(Box::new(query)), true).into()
    }
}

/// Creates an EXISTS condition.
#[must_use]
pub fn exists(query: Query) -> Operand {
    ExistsCondition::new(query, false).into()
}

/// Creates a NOT EXISTS condition.
#[must_use]
pub fn not_exists(query: Query) -> Operand {
    ExistsCondition::new(query, true).into()
}
