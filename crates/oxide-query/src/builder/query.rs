use std::sync::Arc;

use super::{downcast, ExpressionBuilder};
use crate::dialect::Dialect;
use crate::error::Result;
use crate::expression::ExpressionInterface;
use crate::params::ParameterTable;
use crate::query::Query;
use crate::query_builder::QueryBuilder;

/// Compiles a nested query in place and wraps it in parentheses.
///
/// The inner bindings go straight into the outer table.
#[derive(Debug, Default, Clone, Copy)]
pub struct QueryExpressionBuilder;

impl QueryExpressionBuilder {
    /// Factory used by the registry.
    #[must_use]
    pub fn new(_dialect: &Arc<dyn Dialect>) -> Self {
        Self
    }
}

impl ExpressionBuilder for QueryExpressionBuilder {
    fn build(
        &self,
        expression: &dyn ExpressionInterface,
        compiler: &QueryBuilder,
        params: &mut ParameterTable,
    ) -> Result<String> {
        let query = downcast::<Query>(expression)?;
        let sql = compiler.build(query, params)?;
        Ok(format!("({sql})"))
    }
}
