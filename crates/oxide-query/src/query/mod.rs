//! Query representation.
//!
//! A [`Query`] describes a SELECT statement without rendering it. It is itself
//! an expression: placed inside another query it compiles to a parenthesized
//! sub-query whose bindings join the outer statement's table.
//!
//! # Example
//!
//! ```rust
//! use oxide_query::query::{col, Query};
//! use oxide_query::{GenericDialect, ParameterTable, QueryBuilder};
//!
//! let recent = Query::new()
//!     .select(&["customer_id"])
//!     .from("orders")
//!     .where_clause(col("total").gt(100));
//!
//! let query = Query::new()
//!     .select(&["id", "name"])
//!     .from("customers")
//!     .where_clause(col("id").in_query(recent));
//!
//! let mut params = ParameterTable::new();
//! let sql = QueryBuilder::new(GenericDialect::new())
//!     .build(&query, &mut params)
//!     .unwrap();
//!
//! assert_eq!(
//!     sql,
//!     r#"SELECT "id", "name" FROM "customers" WHERE "id" IN (SELECT "customer_id" FROM "orders" WHERE "total" > :p0)"#
//! );
//! assert_eq!(params.len(), 1);
//! ```

mod active;
mod column;
mod condition;

pub use active::{ActiveQuery, ActiveRecord};
pub use column::{col, exists, not_exists, Column};
pub use condition::{
    BetweenCondition, ConjunctionCondition, ConjunctionOperator, ExistsCondition, InCondition,
    InValues, NotCondition, SimpleCondition,
};

use crate::expression::Operand;
use crate::impl_expression;
use crate::params::{Param, ParameterTable};
use crate::value::ToSqlValue;

/// An item of the select list.
#[derive(Debug, Clone)]
pub enum SelectItem {
    /// A column name, quoted when rendered.
    Column(String),
    /// An expression with an optional alias.
    Expr {
        /// The selected expression.
        expr: Operand,
        /// Alias (`AS ...`).
        alias: Option<String>,
    },
}

/// A FROM source.
#[derive(Debug, Clone)]
pub enum FromItem {
    /// A table with an optional alias.
    Table {
        /// Table name.
        name: String,
        /// Table alias.
        alias: Option<String>,
    },
    /// A sub-query, which must be aliased.
    Query {
        /// The sub-query.
        query: Box<Query>,
        /// Sub-query alias.
        alias: String,
    },
}

/// Join type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    /// INNER JOIN
    Inner,
    /// LEFT JOIN
    Left,
    /// RIGHT JOIN
    Right,
}

impl JoinKind {
    /// SQL keyword.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Inner => "INNER JOIN",
            Self::Left => "LEFT JOIN",
            Self::Right => "RIGHT JOIN",
        }
    }
}

/// A JOIN clause.
#[derive(Debug, Clone)]
pub struct Join {
    /// Join type.
    pub kind: JoinKind,
    /// Joined table.
    pub table: String,
    /// ON condition.
    pub on: Operand,
}

/// Order direction for sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderDirection {
    /// Ascending order (ASC)
    Asc,
    /// Descending order (DESC)
    Desc,
}

/// A not-yet-executed SELECT statement.
///
/// Builder methods consume and return the query, so they chain.
#[derive(Debug, Clone, Default)]
pub struct Query {
    pub(crate) distinct: bool,
    pub(crate) select: Vec<SelectItem>,
    pub(crate) from: Vec<FromItem>,
    pub(crate) joins: Vec<Join>,
    pub(crate) where_clause: Option<Operand>,
    pub(crate) group_by: Vec<String>,
    pub(crate) having: Option<Operand>,
    pub(crate) order_by: Vec<(String, OrderDirection)>,
    pub(crate) limit: Option<u64>,
    pub(crate) offset: Option<u64>,
    pub(crate) params: ParameterTable,
}

impl Query {
    /// Creates an empty query (`SELECT *`).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds columns to the select list.
    #[must_use]
    pub fn select(mut self, columns: &[&str]) -> Self {
        self.select
            .extend(columns.iter().map(|c| SelectItem::Column((*c).to_string())));
        self
    }

    /// Adds an expression to the select list.
    #[must_use]
    pub fn select_expr(mut self, expr: impl Into<Operand>, alias: Option<&str>) -> Self {
        self.select.push(SelectItem::Expr {
            expr: expr.into(),
            alias: alias.map(str::to_string),
        });
        self
    }

    /// Sets DISTINCT.
    #[must_use]
    pub const fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    /// Adds a table to select from.
    #[must_use]
    pub fn from(mut self, table: &str) -> Self {
        self.from.push(FromItem::Table {
            name: table.to_string(),
            alias: None,
        });
        self
    }

    /// Adds an aliased table to select from.
    #[must_use]
    pub fn from_as(mut self, table: &str, alias: &str) -> Self {
        self.from.push(FromItem::Table {
            name: table.to_string(),
            alias: Some(alias.to_string()),
        });
        self
    }

    /// Adds a sub-query to select from.
    #[must_use]
    pub fn from_query(mut self, query: Self, alias: &str) -> Self {
        self.from.push(FromItem::Query {
            query: Box::new(query),
            alias: alias.to_string(),
        });
        self
    }

    /// Adds an INNER JOIN.
    #[must_use]
    pub fn join(self, table: &str, on: impl Into<Operand>) -> Self {
        self.join_kind(JoinKind::Inner, table, on)
    }

    /// Adds a LEFT JOIN.
    #[must_use]
    pub fn left_join(self, table: &str, on: impl Into<Operand>) -> Self {
        self.join_kind(JoinKind::Left, table, on)
    }

    /// Adds a RIGHT JOIN.
    #[must_use]
    pub fn right_join(self, table: &str, on: impl Into<Operand>) -> Self {
        self.join_kind(JoinKind::Right, table, on)
    }

    fn join_kind(mut self, kind: JoinKind, table: &str, on: impl Into<Operand>) -> Self {
        self.joins.push(Join {
            kind,
            table: table.to_string(),
            on: on.into(),
        });
        self
    }

    /// Sets the WHERE condition, replacing any previous one.
    #[must_use]
    pub fn where_clause(mut self, condition: impl Into<Operand>) -> Self {
        self.where_clause = Some(condition.into());
        self
    }

    /// Adds a condition to WHERE with AND.
    #[must_use]
    pub fn and_where(mut self, condition: impl Into<Operand>) -> Self {
        self.where_clause = Some(match self.where_clause.take() {
            Some(existing) => existing.and(condition),
            None => condition.into(),
        });
        self
    }

    /// Adds a condition to WHERE with OR.
    #[must_use]
    pub fn or_where(mut self, condition: impl Into<Operand>) -> Self {
        self.where_clause = Some(match self.where_clause.take() {
            Some(existing) => existing.or(condition),
            None => condition.into(),
        });
        self
    }

    /// Adds a GROUP BY clause.
    #[must_use]
    pub fn group_by(mut self, columns: &[&str]) -> Self {
        self.group_by
            .extend(columns.iter().map(|c| (*c).to_string()));
        self
    }

    /// Adds a HAVING clause.
    #[must_use]
    pub fn having(mut self, condition: impl Into<Operand>) -> Self {
        self.having = Some(condition.into());
        self
    }

    /// Adds an ORDER BY column (ascending).
    #[must_use]
    pub fn order_by(mut self, column: &str) -> Self {
        self.order_by.push((column.to_string(), OrderDirection::Asc));
        self
    }

    /// Adds an ORDER BY column (descending).
    #[must_use]
    pub fn order_by_desc(mut self, column: &str) -> Self {
        self.order_by.push((column.to_string(), OrderDirection::Desc));
        self
    }

    /// Sets LIMIT.
    #[must_use]
    pub const fn limit(mut self, n: u64) -> Self {
        self.limit = Some(n);
        self
    }

    /// Sets OFFSET.
    #[must_use]
    pub const fn offset(mut self, n: u64) -> Self {
        self.offset = Some(n);
        self
    }

    /// Binds a named parameter referenced by raw fragments in this query.
    #[must_use]
    pub fn bind<T: ToSqlValue>(mut self, name: impl Into<String>, value: T) -> Self {
        self.params.insert(name, Param::value(value));
        self
    }

    /// Adds named parameters.
    #[must_use]
    pub fn add_params(mut self, params: ParameterTable) -> Self {
        self.params.merge(params);
        self
    }

    /// Parameters attached to this query.
    #[must_use]
    pub const fn params(&self) -> &ParameterTable {
        &self.params
    }
}

impl_expression!(Query);

impl From<Query> for Operand {
    fn from(query: Query) -> Self {
        Self::expression(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_and_where_accumulates() {
        let query = Query::new()
            .from("users")
            .and_where(col("a").eq(1))
            .and_where(col("b").eq(2));
        let conjunction = query
            .where_clause
            .as_ref()
            .and_then(Operand::downcast_ref::<ConjunctionCondition>);
        assert_eq!(conjunction.map(|c| c.parts().len()), Some(2));
    }

    #[test]
    fn test_bind_attaches_params() {
        let query = Query::new().bind(":status", "active");
        assert_eq!(query.params().len(), 1);
    }
}
