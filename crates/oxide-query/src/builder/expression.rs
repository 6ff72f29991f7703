use std::sync::Arc;

use super::{downcast, ExpressionBuilder};
use crate::dialect::Dialect;
use crate::error::Result;
use crate::expression::{Expression, ExpressionInterface};
use crate::params::ParameterTable;
use crate::query_builder::QueryBuilder;

/// Emits a raw fragment verbatim and merges its own parameters.
#[derive(Debug, Default, Clone, Copy)]
pub struct RawExpressionBuilder;

impl RawExpressionBuilder {
    /// Factory used by the registry.
    #[must_use]
    pub fn new(_dialect: &Arc<dyn Dialect>) -> Self {
        Self
    }
}

impl ExpressionBuilder for RawExpressionBuilder {
    fn build(
        &self,
        expression: &dyn ExpressionInterface,
        _compiler: &QueryBuilder,
        params: &mut ParameterTable,
    ) -> Result<String> {
        let expression = downcast::<Expression>(expression)?;
        params.merge(expression.params().clone());
        Ok(expression.sql().to_string())
    }
}
