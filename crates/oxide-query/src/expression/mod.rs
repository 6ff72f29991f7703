//! Compileable expression values.
//!
//! Anything implementing [`ExpressionInterface`] is eligible for dispatch to a
//! registered [`ExpressionBuilder`](crate::builder::ExpressionBuilder). Every
//! other value reaching the compiler is a literal and gets bound as a
//! parameter.

mod compiled;
mod json;
mod raw;
mod typed;

use std::any::Any;
use std::fmt;
use std::sync::Arc;

pub use compiled::Compiled;
pub use json::{JsonExpression, JsonPayload, JsonType};
pub use raw::Expression;
pub use typed::TypedValue;

use crate::query::{ConjunctionCondition, ConjunctionOperator, NotCondition};
use crate::value::{SqlValue, ToSqlValue};

/// Marker capability for values compiled by a builder rather than bound.
///
/// Specialized expressions expose the ancestor they extend through
/// [`parent`](Self::parent); the registry falls back along that chain when the
/// concrete type has no builder of its own.
pub trait ExpressionInterface: Any + fmt::Debug + Send + Sync {
    /// Returns `self` for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Returns the embedded ancestor view, if this type specializes another.
    fn parent(&self) -> Option<&dyn ExpressionInterface> {
        None
    }

    /// Concrete type name, used in diagnostics.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Implements [`ExpressionInterface`] for a type.
///
/// ```rust
/// use oxide_query::impl_expression;
/// use oxide_query::query::Query;
///
/// #[derive(Debug)]
/// struct Now;
/// impl_expression!(Now);
///
/// #[derive(Debug)]
/// struct Scoped {
///     base: Query,
/// }
/// impl_expression!(Scoped, parent = base);
/// ```
#[macro_export]
macro_rules! impl_expression {
    ($ty:ty) => {
        impl $crate::expression::ExpressionInterface for $ty {
            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }
        }
    };
    ($ty:ty, parent = $field:ident) => {
        impl $crate::expression::ExpressionInterface for $ty {
            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn parent(&self) -> Option<&dyn $crate::expression::ExpressionInterface> {
                Some(&self.$field)
            }
        }
    };
}

/// Anything the compiler accepts: a literal or an expression.
#[derive(Debug, Clone)]
pub enum Operand {
    /// Literal, bound under a fresh placeholder.
    Value(SqlValue),
    /// Expression, compiled by its builder.
    Expression(Arc<dyn ExpressionInterface>),
}

impl Operand {
    /// Creates a literal operand.
    pub fn value<T: ToSqlValue>(value: T) -> Self {
        Self::Value(value.to_sql_value())
    }

    /// Creates an expression operand.
    pub fn expression<E: ExpressionInterface>(expression: E) -> Self {
        Self::Expression(Arc::new(expression))
    }

    /// Returns true if this operand is an expression.
    #[must_use]
    pub const fn is_expression(&self) -> bool {
        matches!(self, Self::Expression(_))
    }

    /// Downcasts an expression operand to a concrete type.
    #[must_use]
    pub fn downcast_ref<E: ExpressionInterface>(&self) -> Option<&E> {
        match self {
            Self::Expression(expression) => expression.as_any().downcast_ref::<E>(),
            Self::Value(_) => None,
        }
    }

    /// Combines with `other` using AND.
    #[must_use]
    pub fn and(self, other: impl Into<Self>) -> Self {
        self.combine(ConjunctionOperator::And, other.into())
    }

    /// Combines with `other` using OR.
    #[must_use]
    pub fn or(self, other: impl Into<Self>) -> Self {
        self.combine(ConjunctionOperator::Or, other.into())
    }

    /// Negates the operand with NOT.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        Self::expression(NotCondition::new(self))
    }

    fn combine(self, operator: ConjunctionOperator, other: Self) -> Self {
        // Chains of the same operator stay flat: a AND b AND c.
        let mut parts = match self.downcast_ref::<ConjunctionCondition>() {
            Some(conjunction) if conjunction.operator() == operator => conjunction.parts().to_vec(),
            _ => vec![self],
        };
        parts.push(other);
        Self::expression(ConjunctionCondition::new(operator, parts))
    }
}

macro_rules! operand_from_value {
    ($($source:ty),+) => {
        $(
            impl From<$source> for Operand {
                fn from(value: $source) -> Self {
                    Self::Value(value.to_sql_value())
                }
            }
        )+
    };
}

operand_from_value!(SqlValue, bool, i64, i32, i16, i8, u32, u16, u8, f64, f32, String, &str, Vec<u8>);

macro_rules! operand_from_expression {
    ($($source:ty),+) => {
        $(
            impl From<$source> for Operand {
                fn from(expression: $source) -> Self {
                    Self::expression(expression)
                }
            }
        )+
    };
}

operand_from_expression!(Expression, TypedValue, JsonExpression, Compiled);

impl From<Arc<dyn ExpressionInterface>> for Operand {
    fn from(expression: Arc<dyn ExpressionInterface>) -> Self {
        Self::Expression(expression)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_is_not_expression() {
        assert!(!Operand::from(42).is_expression());
        assert!(Operand::from(Expression::new("NOW()")).is_expression());
    }

    #[test]
    fn test_downcast_ref() {
        let operand = Operand::from(Expression::new("NOW()"));
        let expression = operand.downcast_ref::<Expression>().map(Expression::sql);
        assert_eq!(expression, Some("NOW()"));
        assert!(operand.downcast_ref::<Compiled>().is_none());
    }

    #[test]
    fn test_and_chain_stays_flat() {
        let operand = Operand::from(Expression::new("a"))
            .and(Expression::new("b"))
            .and(Expression::new("c"));
        let conjunction = operand.downcast_ref::<ConjunctionCondition>();
        assert_eq!(conjunction.map(|c| c.parts().len()), Some(3));
    }

    #[test]
    fn test_type_name_is_concrete() {
        let expression: Arc<dyn ExpressionInterface> = Arc::new(Compiled::new(":p0"));
        assert!(expression.type_name().ends_with("Compiled"));
    }
}
