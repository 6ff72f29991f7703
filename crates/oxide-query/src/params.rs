//! Parameter table shared by every builder during one compilation pass.
//!
//! Placeholder names are unique across the whole pass. Auto-generated names
//! are derived from the table size, so every insertion for a pass must go
//! through the same table.
//!
//! Names are stored with their leading `:`; `p1` and `:p1` name the same
//! placeholder.

use std::borrow::Cow;

use indexmap::IndexMap;
use indexmap::map::Entry;
use tracing::warn;

use crate::expression::TypedValue;
use crate::value::{BindingType, SqlValue, ToSqlValue};

/// Prefix of auto-generated placeholder names.
pub const PARAM_PREFIX: &str = ":p";

/// A value bound to a placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    /// Plain literal; the driver infers the binding type.
    Value(SqlValue),
    /// Binding wrapper that carries an explicit driver type.
    Typed(TypedValue),
}

impl Param {
    /// Creates a plain literal parameter.
    pub fn value<T: ToSqlValue>(value: T) -> Self {
        Self::Value(value.to_sql_value())
    }

    /// Returns the underlying literal.
    #[must_use]
    pub const fn sql_value(&self) -> &SqlValue {
        match self {
            Self::Value(value) => value,
            Self::Typed(typed) => typed.value(),
        }
    }

    /// Returns the value as the driver should bind it.
    ///
    /// Plain literals bind as they are; typed values are converted to their
    /// binding type first.
    #[must_use]
    pub fn bound_value(&self) -> SqlValue {
        match self {
            Self::Value(value) => value.clone(),
            Self::Typed(typed) => typed.value().clone().coerce(typed.binding_type()),
        }
    }

    /// Returns the driver type used at execution time.
    #[must_use]
    pub const fn binding_type(&self) -> BindingType {
        match self {
            Self::Value(value) => value.binding_type(),
            Self::Typed(typed) => typed.binding_type(),
        }
    }
}

impl From<SqlValue> for Param {
    fn from(value: SqlValue) -> Self {
        Self::Value(value)
    }
}

impl From<TypedValue> for Param {
    fn from(typed: TypedValue) -> Self {
        Self::Typed(typed)
    }
}

/// Ordered placeholder to value bindings for one compilation pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterTable {
    entries: IndexMap<String, Param>,
}

impl ParameterTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bindings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up the value bound to `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Param> {
        self.entries.get(&*placeholder_name(name))
    }

    /// Returns true if `name` is bound.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&*placeholder_name(name))
    }

    /// Binds `name`, replacing and returning any previous value.
    pub fn insert(&mut self, name: impl Into<String>, param: impl Into<Param>) -> Option<Param> {
        let name = placeholder_name(name.into()).into_owned();
        self.entries.insert(name, param.into())
    }

    /// Returns the next free auto-generated placeholder name.
    ///
    /// Numbering starts at the current size; names already taken by
    /// explicitly named bindings are skipped.
    #[must_use]
    pub fn next_placeholder(&self) -> String {
        let mut n = self.entries.len();
        loop {
            let name = format!("{PARAM_PREFIX}{n}");
            if !self.entries.contains_key(&name) {
                return name;
            }
            n += 1;
        }
    }

    /// Binds `param` under a fresh placeholder and returns the placeholder.
    pub fn bind(&mut self, param: impl Into<Param>) -> String {
        let name = self.next_placeholder();
        self.entries.insert(name.clone(), param.into());
        name
    }

    /// Merges bindings into this table. Later entries win on name clashes.
    pub fn merge<I>(&mut self, params: I)
    where
        I: IntoIterator<Item = (String, Param)>,
    {
        for (name, param) in params {
            match self.entries.entry(placeholder_name(name).into_owned()) {
                Entry::Occupied(mut slot) => {
                    if *slot.get() != param {
                        warn!(placeholder = %slot.key(), "parameter overwritten by a later binding");
                    }
                    slot.insert(param);
                }
                Entry::Vacant(slot) => {
                    slot.insert(param);
                }
            }
        }
    }

    /// Iterates bindings in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Param)> {
        self.entries.iter().map(|(name, param)| (name.as_str(), param))
    }

    /// Placeholder names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

fn placeholder_name<'a>(name: impl Into<Cow<'a, str>>) -> Cow<'a, str> {
    let name = name.into();
    if name.starts_with(':') {
        name
    } else {
        Cow::Owned(format!(":{name}"))
    }
}

impl IntoIterator for ParameterTable {
    type Item = (String, Param);
    type IntoIter = indexmap::map::IntoIter<String, Param>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Extend<(String, Param)> for ParameterTable {
    fn extend<I: IntoIterator<Item = (String, Param)>>(&mut self, iter: I) {
        self.merge(iter);
    }
}

impl FromIterator<(String, Param)> for ParameterTable {
    fn from_iter<I: IntoIterator<Item = (String, Param)>>(iter: I) -> Self {
        let mut table = Self::new();
        table.merge(iter);
        table
    }
}
