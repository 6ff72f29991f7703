use std::sync::Arc;

use super::{downcast, ExpressionBuilder};
use crate::dialect::Dialect;
use crate::error::Result;
use crate::expression::{ExpressionInterface, TypedValue};
use crate::params::ParameterTable;
use crate::query_builder::QueryBuilder;

/// Binds a [`TypedValue`] under a fresh placeholder.
///
/// The table keeps the wrapper, not the bare value, so the binding type
/// survives until execution.
#[derive(Debug, Default, Clone, Copy)]
pub struct TypedValueBuilder;

impl TypedValueBuilder {
    /// Factory used by the registry.
    #[must_use]
    pub fn new(_dialect: &Arc<dyn Dialect>) -> Self {
        Self
    }
}

impl ExpressionBuilder for TypedValueBuilder {
    fn build(
        &self,
        expression: &dyn ExpressionInterface,
        _compiler: &QueryBuilder,
        params: &mut ParameterTable,
    ) -> Result<String> {
        let typed = downcast::<TypedValue>(expression)?;
        Ok(params.bind(typed.clone()))
    }
}
