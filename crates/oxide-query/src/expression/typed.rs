//! Values bound with an explicit driver type.

use crate::impl_expression;
use crate::value::{BindingType, SqlValue, ToSqlValue};

/// Binds a value using an exact driver type, bypassing type inference.
///
/// The parameter table stores the wrapper itself, so the executor still
/// knows the intended type when it binds the value.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedValue {
    value: SqlValue,
    binding: BindingType,
}

impl TypedValue {
    /// Wraps `value` with the given binding type.
    pub fn new<T: ToSqlValue>(value: T, binding: BindingType) -> Self {
        Self {
            value: value.to_sql_value(),
            binding,
        }
    }

    /// Returns the wrapped value.
    #[must_use]
    pub const fn value(&self) -> &SqlValue {
        &self.value
    }

    /// Returns the binding type.
    #[must_use]
    pub const fn binding_type(&self) -> BindingType {
        self.binding
    }
}

impl_expression!(TypedValue);
