use std::sync::Arc;

use super::{downcast, ExpressionBuilder};
use crate::dialect::Dialect;
use crate::error::Result;
use crate::expression::{ExpressionInterface, JsonExpression};
use crate::params::{Param, ParameterTable};
use crate::query_builder::QueryBuilder;

/// Encodes a [`JsonExpression`] and binds the text as a parameter.
///
/// Not part of the core registry; dialects that store JSON register it.
#[derive(Debug, Clone)]
pub struct JsonExpressionBuilder {
    dialect: Arc<dyn Dialect>,
}

impl JsonExpressionBuilder {
    /// Factory used by the registry.
    #[must_use]
    pub fn new(dialect: &Arc<dyn Dialect>) -> Self {
        Self {
            dialect: Arc::clone(dialect),
        }
    }
}

impl ExpressionBuilder for JsonExpressionBuilder {
    fn build(
        &self,
        expression: &dyn ExpressionInterface,
        _compiler: &QueryBuilder,
        params: &mut ParameterTable,
    ) -> Result<String> {
        let json = downcast::<JsonExpression>(expression)?;
        let encoded = serde_json::to_string(json.to_serializable()?)?;
        let placeholder = params.bind(Param::value(encoded));

        let cast = json
            .json_type()
            .and_then(|json_type| self.dialect.json_cast(json_type));
        Ok(match cast {
            Some(cast) => format!("{placeholder}::{cast}"),
            None => placeholder,
        })
    }
}
