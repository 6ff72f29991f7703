//! Builders for condition expressions.

use std::sync::Arc;

use super::{downcast, ExpressionBuilder};
use crate::dialect::Dialect;
use crate::error::Result;
use crate::expression::{ExpressionInterface, Operand};
use crate::params::ParameterTable;
use crate::query::{
    BetweenCondition, ConjunctionCondition, ExistsCondition, InCondition, InValues, NotCondition,
    SimpleCondition,
};
use crate::query_builder::QueryBuilder;
use crate::value::SqlValue;

/// Builds `"column" op value`.
///
/// A NULL literal is written inline, and `=` / `<>` against it become
/// `IS` / `IS NOT`.
#[derive(Debug, Clone)]
pub struct SimpleConditionBuilder {
    dialect: Arc<dyn Dialect>,
}

impl SimpleConditionBuilder {
    /// Factory used by the registry.
    #[must_use]
    pub fn new(dialect: &Arc<dyn Dialect>) -> Self {
        Self {
            dialect: Arc::clone(dialect),
        }
    }
}

impl ExpressionBuilder for SimpleConditionBuilder {
    fn build(
        &self,
        expression: &dyn ExpressionInterface,
        compiler: &QueryBuilder,
        params: &mut ParameterTable,
    ) -> Result<String> {
        let condition = downcast::<SimpleCondition>(expression)?;
        let column = self.dialect.quote_column_name(condition.column());
        match condition.value() {
            Operand::Value(SqlValue::Null) => {
                let operator = match condition.operator() {
                    "=" => "IS",
                    "<>" | "!=" => "IS NOT",
                    other => other,
                };
                Ok(format!("{column} {operator} NULL"))
            }
            operand => {
                let value = compiler.compile(operand, params)?;
                Ok(format!("{column} {} {value}", condition.operator()))
            }
        }
    }
}

/// Builds `"column" [NOT] IN (...)`.
#[derive(Debug, Clone)]
pub struct InConditionBuilder {
    dialect: Arc<dyn Dialect>,
}

impl InConditionBuilder {
    /// Factory used by the registry.
    #[must_use]
    pub fn new(dialect: &Arc<dyn Dialect>) -> Self {
        Self {
            dialect: Arc::clone(dialect),
        }
    }
}

impl ExpressionBuilder for InConditionBuilder {
    fn build(
        &self,
        expression: &dyn ExpressionInterface,
        compiler: &QueryBuilder,
        params: &mut ParameterTable,
    ) -> Result<String> {
        let condition = downcast::<InCondition>(expression)?;
        let keyword = if condition.is_negated() { "NOT IN" } else { "IN" };
        let column = self.dialect.quote_column_name(condition.column());

        match condition.values() {
            InValues::List(values) if values.is_empty() => Ok(String::from(if condition.is_negated() {
                "1=1"
            } else {
                "0=1"
            })),
            InValues::List(values) => {
                let items = compiler.compile_all(values, params)?;
                Ok(format!("{column} {keyword} ({})", items.join(", ")))
            }
            InValues::Query(query) => {
                // The query builder already parenthesizes sub-queries.
                let sub = compiler.build_expression(&**query, params)?;
                Ok(format!("{column} {keyword} {sub}"))
            }
        }
    }
}

/// Builds `"column" [NOT] BETWEEN low AND high`.
#[derive(Debug, Clone)]
pub struct BetweenConditionBuilder {
    dialect: Arc<dyn Dialect>,
}

impl BetweenConditionBuilder {
    /// Factory used by the registry.
    #[must_use]
    pub fn new(dialect: &Arc<dyn Dialect>) -> Self {
        Self {
            dialect: Arc::clone(dialect),
        }
    }
}

impl ExpressionBuilder for BetweenConditionBuilder {
    fn build(
        &self,
        expression: &dyn ExpressionInterface,
        compiler: &QueryBuilder,
        params: &mut ParameterTable,
    ) -> Result<String> {
        let condition = downcast::<BetweenCondition>(expression)?;
        let keyword = if condition.is_negated() {
            "NOT BETWEEN"
        } else {
            "BETWEEN"
        };
        let column = self.dialect.quote_column_name(condition.column());
        let low = compiler.compile(condition.low(), params)?;
        let high = compiler.compile(condition.high(), params)?;
        Ok(format!("{column} {keyword} {low} AND {high}"))
    }
}

/// Builds `(a) AND (b)` / `(a) OR (b)`; a single part is emitted bare.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConjunctionConditionBuilder;

impl ConjunctionConditionBuilder {
    /// Factory used by the registry.
    #[must_use]
    pub fn new(_dialect: &Arc<dyn Dialect>) -> Self {
        Self
    }
}

impl ExpressionBuilder for ConjunctionConditionBuilder {
    fn build(
        &self,
        expression: &dyn ExpressionInterface,
        compiler: &QueryBuilder,
        params: &mut ParameterTable,
    ) -> Result<String> {
        let condition = downcast::<ConjunctionCondition>(expression)?;
        let mut parts = compiler.compile_all(condition.parts(), params)?;
        parts.retain(|part| !part.is_empty());

        let separator = format!(" {} ", condition.operator());
        Ok(match parts.len() {
            0 => String::new(),
            1 => parts.remove(0),
            _ => parts
                .iter()
                .map(|part| format!("({part})"))
                .collect::<Vec<_>>()
                .join(separator.as_str()),
        })
    }
}

/// Builds `NOT (condition)`; an empty condition stays empty.
#[derive(Debug, Default, Clone, Copy)]
pub struct NotConditionBuilder;

impl NotConditionBuilder {
    /// Factory used by the registry.
    #[must_use]
    pub fn new(_dialect: &Arc<dyn Dialect>) -> Self {
        Self
    }
}

impl ExpressionBuilder for NotConditionBuilder {
    fn build(
        &self,
        expression: &dyn ExpressionInterface,
        compiler: &QueryBuilder,
        params: &mut ParameterTable,
    ) -> Result<String> {
        let condition = downcast::<NotCondition>(expression)?;
        let inner = compiler.compile(condition.condition(), params)?;
        if inner.is_empty() {
            return Ok(inner);
        }
        Ok(format!("NOT ({inner})"))
    }
}

/// Builds `[NOT] EXISTS (sub-query)`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExistsConditionBuilder;

impl ExistsConditionBuilder {
    /// Factory used by the registry.
    #[must_use]
    pub fn new(_dialect: &Arc<dyn Dialect>) -> Self {
        Self
    }
}

impl ExpressionBuilder for ExistsConditionBuilder {
    fn build(
        &self,
        expression: &dyn ExpressionInterface,
        compiler: &QueryBuilder,
        params: &mut ParameterTable,
    ) -> Result<String> {
        let condition = downcast::<ExistsCondition>(expression)?;
        let keyword = if condition.is_negated() {
            "NOT EXISTS"
        } else {
            "EXISTS"
        };
        let sub = compiler.build_expression(condition.query(), params)?;
        Ok(format!("{keyword} {sub}"))
    }
}
