//! Literal values and their driver binding types.

use serde::{Deserialize, Serialize};

/// Driver-level type used when binding a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BindingType {
    /// SQL NULL.
    Null,
    /// Boolean.
    Bool,
    /// Integer.
    Int,
    /// Character data.
    Str,
    /// Large object (binary data).
    Lob,
}

/// A literal SQL value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SqlValue {
    /// NULL value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Float value.
    Float(f64),
    /// Text value.
    Text(String),
    /// Binary blob value.
    Blob(Vec<u8>),
}

impl SqlValue {
    /// Returns the binding type a driver would infer for this value.
    ///
    /// Floats have no dedicated driver type and bind as strings.
    #[must_use]
    pub const fn binding_type(&self) -> BindingType {
        match self {
            Self::Null => BindingType::Null,
            Self::Bool(_) => BindingType::Bool,
            Self::Int(_) => BindingType::Int,
            Self::Float(_) | Self::Text(_) => BindingType::Str,
            Self::Blob(_) => BindingType::Lob,
        }
    }

    /// Converts the value to the representation a driver binds for `binding`.
    ///
    /// NULL always stays NULL. Text that does not parse as an integer is left
    /// as text under [`BindingType::Int`].
    #[must_use]
    pub fn coerce(self, binding: BindingType) -> Self {
        match (binding, self) {
            (BindingType::Null, _) | (_, Self::Null) => Self::Null,
            (BindingType::Bool, value) => Self::Bool(match value {
                Self::Bool(b) => b,
                Self::Int(n) => n != 0,
                Self::Float(f) => f.abs() > 0.0,
                Self::Text(s) => !(s.is_empty() || s == "0"),
                Self::Blob(b) => !b.is_empty(),
                Self::Null => false,
            }),
            (BindingType::Int, value) => match value {
                Self::Bool(b) => Self::Int(i64::from(b)),
                #[allow(clippy::cast_possible_truncation)]
                Self::Float(f) => Self::Int(f as i64),
                Self::Text(s) => match s.trim().parse::<i64>() {
                    Ok(n) => Self::Int(n),
                    Err(_) => Self::Text(s),
                },
                other => other,
            },
            (BindingType::Str, value) => Self::Text(value.text_form()),
            (BindingType::Lob, Self::Blob(b)) => Self::Blob(b),
            (BindingType::Lob, value) => Self::Blob(value.text_form().into_bytes()),
        }
    }

    fn text_form(self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Bool(b) => String::from(if b { "1" } else { "0" }),
            Self::Int(n) => n.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Text(s) => s,
            Self::Blob(b) => String::from_utf8_lossy(&b).into_owned(),
        }
    }

    /// Returns the SQL representation for inline use (escaped).
    ///
    /// **Warning**: only for logging and debugging; compiled statements
    /// always carry values as bound parameters.
    #[must_use]
    pub fn to_sql_inline(&self) -> String {
        match self {
            Self::Null => String::from("NULL"),
            Self::Bool(true) => String::from("TRUE"),
            Self::Bool(false) => String::from("FALSE"),
            Self::Int(n) => n.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Text(s) => format!("'{}'", s.replace('\'', "''")),
            Self::Blob(b) => {
                let hex: String = b.iter().map(|byte| format!("{byte:02X}")).collect();
                format!("X'{hex}'")
            }
        }
    }
}

/// Trait for types that can be converted to SQL values.
pub trait ToSqlValue {
    /// Converts the value to a `SqlValue`.
    fn to_sql_value(self) -> SqlValue;
}

impl ToSqlValue for SqlValue {
    fn to_sql_value(self) -> SqlValue {
        self
    }
}

macro_rules! impl_to_sql_value {
    ($variant:ident, $target:ty: $($source:ty),+) => {
        $(
            impl ToSqlValue for $source {
                fn to_sql_value(self) -> SqlValue {
                    SqlValue::$variant(<$target>::from(self))
                }
            }
        )+
    };
}

impl_to_sql_value!(Bool, bool: bool);
impl_to_sql_value!(Int, i64: i64, i32, i16, i8, u32, u16, u8);
impl_to_sql_value!(Float, f64: f64, f32);
impl_to_sql_value!(Text, String: String, &str);
impl_to_sql_value!(Blob, Vec<u8>: Vec<u8>, &[u8]);

impl<T: ToSqlValue> ToSqlValue for Option<T> {
    fn to_sql_value(self) -> SqlValue {
        self.map_or(SqlValue::Null, ToSqlValue::to_sql_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_rendering() {
        assert_eq!(SqlValue::Null.to_sql_inline(), "NULL");
        assert_eq!(SqlValue::Bool(true).to_sql_inline(), "TRUE");
        assert_eq!(SqlValue::Int(-100).to_sql_inline(), "-100");
        assert_eq!(SqlValue::Blob(vec![0x48, 0x49]).to_sql_inline(), "X'4849'");
    }

    #[test]
    fn test_inline_text_escaping() {
        let value = "'; DROP TABLE users; --".to_sql_value();
        assert_eq!(value.to_sql_inline(), "'''; DROP TABLE users; --'");
    }

    #[test]
    fn test_coerce_to_binding_type() {
        assert_eq!(
            "abc".to_sql_value().coerce(BindingType::Lob),
            SqlValue::Blob(b"abc".to_vec())
        );
        assert_eq!(
            5_i64.to_sql_value().coerce(BindingType::Str),
            SqlValue::Text(String::from("5"))
        );
        assert_eq!(" 42 ".to_sql_value().coerce(BindingType::Int), SqlValue::Int(42));
        assert_eq!(
            "x".to_sql_value().coerce(BindingType::Int),
            SqlValue::Text(String::from("x"))
        );
        assert_eq!(0_i64.to_sql_value().coerce(BindingType::Bool), SqlValue::Bool(false));
        assert_eq!(SqlValue::Null.coerce(BindingType::Lob), SqlValue::Null);
        assert_eq!(7_i64.to_sql_value().coerce(BindingType::Null), SqlValue::Null);
    }

    #[test]
    fn test_binding_type_inference() {
        assert_eq!(SqlValue::Null.binding_type(), BindingType::Null);
        assert_eq!(42_i32.to_sql_value().binding_type(), BindingType::Int);
        assert_eq!(2.5_f64.to_sql_value().binding_type(), BindingType::Str);
        assert_eq!("x".to_sql_value().binding_type(), BindingType::Str);
        assert_eq!(vec![1_u8].to_sql_value().binding_type(), BindingType::Lob);
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(None::<i32>.to_sql_value(), SqlValue::Null);
        assert_eq!(Some(7_u8).to_sql_value(), SqlValue::Int(7));
    }
}
