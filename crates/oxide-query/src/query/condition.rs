//! Condition expressions.
//!
//! Each condition is its own expression kind with its own builder, so
//! host code can override how any one of them renders.

use std::fmt;

use crate::expression::Operand;
use crate::impl_expression;

use super::Query;

/// `column operator value`, e.g. `"age" > :p0`.
#[derive(Debug, Clone)]
pub struct SimpleCondition {
    column: String,
    operator: String,
    value: Operand,
}

impl SimpleCondition {
    /// Creates a comparison condition.
    pub fn new(column: impl Into<String>, operator: impl Into<String>, value: impl Into<Operand>) -> Self {
        Self {
            column: column.into(),
            operator: operator.into(),
            value: value.into(),
        }
    }

    /// Column on the left-hand side.
    #[must_use]
    pub fn column(&self) -> &str {
        &self.column
    }

    /// Comparison operator.
    #[must_use]
    pub fn operator(&self) -> &str {
        &self.operator
    }

    /// Right-hand side operand.
    #[must_use]
    pub const fn value(&self) -> &Operand {
        &self.value
    }
}

/// Values of an IN condition.
#[derive(Debug, Clone)]
pub enum InValues {
    /// Explicit list of operands.
    List(Vec<Operand>),
    /// Sub-query producing the values.
    Query(Box<Query>),
}

/// `column [NOT] IN (...)`.
///
/// An empty list can never match: it renders `0=1`, or `1=1` when negated.
#[derive(Debug, Clone)]
pub struct InCondition {
    column: String,
    values: InValues,
    negated: bool,
}

impl InCondition {
    /// Creates an IN condition.
    pub fn new(column: impl Into<String>, values: InValues, negated: bool) -> Self {
        Self {
            column: column.into(),
            values,
            negated,
        }
    }

    /// Column being tested.
    #[must_use]
    pub fn column(&self) -> &str {
        &self.column
    }

    /// Candidate values.
    #[must_use]
    pub const fn values(&self) -> &InValues {
        &self.values
    }

    /// True for NOT IN.
    #[must_use]
    pub const fn is_negated(&self) -> bool {
        self.negated
    }
}

/// `column [NOT] BETWEEN low AND high`.
#[derive(Debug, Clone)]
pub struct BetweenCondition {
    column: String,
    low: Operand,
    high: Operand,
    negated: bool,
}

impl BetweenCondition {
    /// Creates a BETWEEN condition.
    pub fn new(
        column: impl Into<String>,
        low: impl Into<Operand>,
        high: impl Into<Operand>,
        negated: bool,
    ) -> Self {
        Self {
            column: column.into(),
            low: low.into(),
            high: high.into(),
            negated,
        }
    }

    /// Column being tested.
    #[must_use]
    pub fn column(&self) -> &str {
        &self.column
    }

    /// Lower bound.
    #[must_use]
    pub const fn low(&self) -> &Operand {
        &self.low
    }

    /// Upper bound.
    #[must_use]
    pub const fn high(&self) -> &Operand {
        &self.high
    }

    /// True for NOT BETWEEN.
    #[must_use]
    pub const fn is_negated(&self) -> bool {
        self.negated
    }
}

/// Boolean connective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConjunctionOperator {
    /// AND
    And,
    /// OR
    Or,
}

impl fmt::Display for ConjunctionOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::And => write!(f, "AND"),
            Self::Or => write!(f, "OR"),
        }
    }
}

/// Parts joined by AND or OR. Parts that compile to nothing are skipped.
#[derive(Debug, Clone)]
pub struct ConjunctionCondition {
    operator: ConjunctionOperator,
    parts: Vec<Operand>,
}

impl ConjunctionCondition {
    /// Creates a conjunction.
    #[must_use]
    pub const fn new(operator: ConjunctionOperator, parts: Vec<Operand>) -> Self {
        Self { operator, parts }
    }

    /// Joins `parts` with AND.
    #[must_use]
    pub const fn and(parts: Vec<Operand>) -> Self {
        Self::new(ConjunctionOperator::And, parts)
    }

    /// Joins `parts` with OR.
    #[must_use]
    pub const fn or(parts: Vec<Operand>) -> Self {
        Self::new(ConjunctionOperator::Or, parts)
    }

    /// The connective.
    #[must_use]
    pub const fn operator(&self) -> ConjunctionOperator {
        self.operator
    }

    /// The joined parts.
    #[must_use]
    pub fn parts(&self) -> &[Operand] {
        &self.parts
    }
}

/// `NOT (condition)`.
#[derive(Debug, Clone)]
pub struct NotCondition {
    condition: Operand,
}

impl NotCondition {
    /// Negates `condition`.
    pub fn new(condition: impl Into<Operand>) -> Self {
        Self {
            condition: condition.into(),
        }
    }

    /// The negated condition.
    #[must_use]
    pub const fn condition(&self) -> &Operand {
        &self.condition
    }
}

/// `[NOT] EXISTS (sub-query)`.
#[derive(Debug, Clone)]
pub struct ExistsCondition {
    query: Box<Query>,
    negated: bool,
}

impl ExistsCondition {
    /// Creates an EXISTS condition.
    #[must_use]
    pub fn new(query: Query, negated: bool) -> Self {
        Self {
            query: Box::new(query),
            negated,
        }
    }

    /// The sub-query.
    #[must_use]
    pub fn query(&self) -> &Query {
        &self.query
    }

    /// True for NOT EXISTS.
    #[must_use]
    pub const fn is_negated(&self) -> bool {
        self.negated
    }
}

impl_expression!(SimpleCondition);
impl_expression!(InCondition);
impl_expression!(BetweenCondition);
impl_expression!(ConjunctionCondition);
impl_expression!(NotCondition);
impl_expression!(ExistsCondition);

macro_rules! operand_from_condition {
    ($($source:ty),+) => {
        $(
            impl From<$source> for Operand {
                fn from(condition: $source) -> Self {
                    Self::expression(condition)
                }
            }
        )+
    };
}

operand_from_condition!(
    SimpleCondition,
    InCondition,
    BetweenCondition,
    ConjunctionCondition,
    NotCondition,
    ExistsCondition
);
