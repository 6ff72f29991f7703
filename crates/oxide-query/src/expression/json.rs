//! Structured (JSON) values.

use serde::ser::Error as _;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::{QueryError, Result};
use crate::impl_expression;
use crate::query::Query;

/// Database-side JSON type a value is cast to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonType {
    /// Textual JSON.
    Json,
    /// Binary JSON (PostgreSQL).
    Jsonb,
}

impl JsonType {
    /// SQL name of the type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Jsonb => "jsonb",
        }
    }
}

/// What a [`JsonExpression`] wraps.
#[derive(Debug, Clone)]
pub enum JsonPayload {
    /// Plain data, encoded when compiled.
    Data(serde_json::Value),
    /// A query that has not been executed yet. It has no static encoding.
    Query(Box<Query>),
}

impl From<serde_json::Value> for JsonPayload {
    fn from(value: serde_json::Value) -> Self {
        Self::Data(value)
    }
}

impl From<Query> for JsonPayload {
    fn from(query: Query) -> Self {
        Self::Query(Box::new(query))
    }
}

impl From<JsonExpression> for JsonPayload {
    /// Unwraps exactly one level, so wrapping a JSON expression again is a no-op.
    fn from(expression: JsonExpression) -> Self {
        expression.value
    }
}

/// A value serialized to JSON at compile time instead of bound as a scalar.
///
/// ```rust
/// use oxide_query::expression::{JsonExpression, JsonType};
/// use serde_json::json;
///
/// let inner = JsonExpression::new(json!({"a": 1}), None);
/// let outer = JsonExpression::new(inner, Some(JsonType::Jsonb));
/// assert_eq!(outer.to_serializable().unwrap(), &json!({"a": 1}));
/// ```
#[derive(Debug, Clone)]
pub struct JsonExpression {
    value: JsonPayload,
    json_type: Option<JsonType>,
}

impl JsonExpression {
    /// Wraps a value. Passing another `JsonExpression` takes over its payload.
    pub fn new(value: impl Into<JsonPayload>, json_type: Option<JsonType>) -> Self {
        Self {
            value: value.into(),
            json_type,
        }
    }

    /// Returns the wrapped payload.
    #[must_use]
    pub const fn value(&self) -> &JsonPayload {
        &self.value
    }

    /// Returns the requested database type, if any.
    #[must_use]
    pub const fn json_type(&self) -> Option<JsonType> {
        self.json_type
    }

    /// Returns the value to encode.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidStructuredValue`] when the payload is a
    /// pending query.
    pub fn to_serializable(&self) -> Result<&serde_json::Value> {
        match &self.value {
            JsonPayload::Data(value) => Ok(value),
            JsonPayload::Query(_) => Err(QueryError::InvalidStructuredValue(String::from(
                "a JSON expression wrapping a query cannot be serialized",
            ))),
        }
    }
}

impl Serialize for JsonExpression {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_serializable()
            .map_err(S::Error::custom)?
            .serialize(serializer)
    }
}

impl_expression!(JsonExpression);

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_rewrap_unwraps_one_level() {
        let inner = JsonExpression::new(json!([1, 2]), Some(JsonType::Json));
        let outer = JsonExpression::new(inner, Some(JsonType::Jsonb));
        assert!(matches!(outer.value(), JsonPayload::Data(v) if *v == json!([1, 2])));
        assert_eq!(outer.json_type(), Some(JsonType::Jsonb));
    }

    #[test]
    fn test_serialize_data() {
        let expression = JsonExpression::new(json!({"tags": ["a"]}), None);
        let encoded = serde_json::to_string(&expression).unwrap();
        assert_eq!(encoded, r#"{"tags":["a"]}"#);
    }

    #[test]
    fn test_pending_query_is_rejected() {
        let expression = JsonExpression::new(Query::new().from("users"), None);
        assert!(matches!(
            expression.to_serializable(),
            Err(QueryError::InvalidStructuredValue(_))
        ));
        assert!(serde_json::to_string(&expression).is_err());
    }
}
