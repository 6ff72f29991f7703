//! ActiveRecord-style queries.
//!
//! An [`ActiveQuery`] is a [`Query`] bound to a model table. It registers no
//! builder of its own: the registry reaches the query builder through its
//! parent view.

use crate::expression::Operand;
use crate::impl_expression;

use super::{Column, Query};

/// A model backed by a database table.
pub trait ActiveRecord {
    /// Table name.
    const TABLE: &'static str;

    /// Starts a query over the model's table.
    #[must_use]
    fn find() -> ActiveQuery {
        ActiveQuery::new(Self::TABLE)
    }
}

/// A query scoped to one model table.
#[derive(Debug, Clone)]
pub struct ActiveQuery {
    table: String,
    query: Query,
}

impl ActiveQuery {
    /// Creates a query selecting from `table`.
    #[must_use]
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            query: Query::new().from(table),
        }
    }

    /// The model table.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// The underlying query.
    #[must_use]
    pub const fn query(&self) -> &Query {
        &self.query
    }

    /// Adds a condition with AND.
    #[must_use]
    pub fn filter(mut self, condition: impl Into<Operand>) -> Self {
        self.query = self.query.and_where(condition);
        self
    }

    /// Adds `table.column = value` with AND, qualified by the model table.
    #[must_use]
    pub fn filter_by(self, column: &str, value: impl Into<Operand>) -> Self {
        let condition = Column::qualified(&self.table, column).eq(value);
        self.filter(condition)
    }

    /// Applies arbitrary query changes.
    #[must_use]
    pub fn map(mut self, f: impl FnOnce(Query) -> Query) -> Self {
        self.query = f(self.query);
        self
    }

    /// Releases the underlying query.
    #[must_use]
    pub fn into_query(self) -> Query {
        self.query
    }
}

impl_expression!(ActiveQuery, parent = query);

impl From<ActiveQuery> for Operand {
    fn from(query: ActiveQuery) -> Self {
        Self::expression(query)
    }
}
