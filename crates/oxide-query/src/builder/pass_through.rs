use std::sync::Arc;

use super::{downcast, ExpressionBuilder};
use crate::dialect::Dialect;
use crate::error::Result;
use crate::expression::{Compiled, ExpressionInterface};
use crate::params::ParameterTable;
use crate::query_builder::QueryBuilder;

/// Returns already-compiled SQL unchanged without touching the table.
#[derive(Debug, Default, Clone, Copy)]
pub struct PassThroughBuilder;

impl PassThroughBuilder {
    /// Factory used by the registry.
    #[must_use]
    pub fn new(_dialect: &Arc<dyn Dialect>) -> Self {
        Self
    }
}

impl ExpressionBuilder for PassThroughBuilder {
    fn build(
        &self,
        expression: &dyn ExpressionInterface,
        _compiler: &QueryBuilder,
        _params: &mut ParameterTable,
    ) -> Result<String> {
        Ok(downcast::<Compiled>(expression)?.sql().to_string())
    }
}
