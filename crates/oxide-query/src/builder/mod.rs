//! Expression builders.
//!
//! A builder compiles one expression kind into SQL text. It may record
//! bindings in the shared [`ParameterTable`]; it never mutates the
//! expression. Builders recurse through the [`QueryBuilder`] they are handed,
//! so nested expressions land in the same table.

mod condition;
mod expression;
mod json;
mod pass_through;
mod query;
mod typed;

pub use condition::{
    BetweenConditionBuilder, ConjunctionConditionBuilder, ExistsConditionBuilder,
    InConditionBuilder, NotConditionBuilder, SimpleConditionBuilder,
};
pub use expression::RawExpressionBuilder;
pub use json::JsonExpressionBuilder;
pub use pass_through::PassThroughBuilder;
pub use query::QueryExpressionBuilder;
pub use typed::TypedValueBuilder;

use crate::error::{QueryError, Result};
use crate::expression::ExpressionInterface;
use crate::params::ParameterTable;
use crate::query_builder::QueryBuilder;

/// Compiles one expression kind into SQL.
pub trait ExpressionBuilder: Send + Sync {
    /// Builds `expression` into SQL text that can be embedded as is.
    ///
    /// # Errors
    ///
    /// Fails if the expression, or anything nested in it, cannot be compiled.
    fn build(
        &self,
        expression: &dyn ExpressionInterface,
        compiler: &QueryBuilder,
        params: &mut ParameterTable,
    ) -> Result<String>;
}

/// Downcasts the expression handed to a builder.
///
/// # Errors
///
/// Returns [`QueryError::UnexpectedExpression`] when the builder was
/// registered for a type it does not handle.
pub fn downcast<E: ExpressionInterface>(expression: &dyn ExpressionInterface) -> Result<&E> {
    expression
        .as_any()
        .downcast_ref::<E>()
        .ok_or_else(|| QueryError::UnexpectedExpression {
            expected: std::any::type_name::<E>(),
            found: expression.type_name(),
        })
}
