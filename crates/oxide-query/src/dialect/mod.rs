//! SQL dialect support.
//!
//! A dialect supplies quoting rules to the builders that need them and may
//! register builders for expression kinds only it understands.

mod generic;
mod postgres;
mod sqlite;

use std::fmt;

pub use generic::GenericDialect;
pub use postgres::PostgresDialect;
pub use sqlite::SqliteDialect;

use crate::expression::JsonType;
use crate::registry::BuilderRegistry;
use crate::value::SqlValue;

/// Trait for SQL dialect-specific behavior.
pub trait Dialect: fmt::Debug + Send + Sync {
    /// Returns the name of the dialect.
    fn name(&self) -> &'static str;

    /// Returns the identifier quote character (e.g., `"` for standard SQL, `` ` `` for MySQL).
    fn identifier_quote(&self) -> char {
        '"'
    }

    /// Quotes a single identifier, doubling embedded quote characters.
    ///
    /// `*` and already quoted names are returned unchanged.
    fn quote_simple_name(&self, name: &str) -> String {
        let quote = self.identifier_quote();
        if name == "*" || (name.len() >= 2 && name.starts_with(quote) && name.ends_with(quote)) {
            return name.to_string();
        }
        let escaped = name.replace(quote, &format!("{quote}{quote}"));
        format!("{quote}{escaped}{quote}")
    }

    /// Quotes a possibly schema-qualified table name.
    ///
    /// Names containing `(` are treated as SQL and left alone.
    fn quote_table_name(&self, name: &str) -> String {
        if name.contains('(') {
            return name.to_string();
        }
        name.split('.')
            .map(|part| self.quote_simple_name(part))
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Quotes a possibly table-qualified column name.
    fn quote_column_name(&self, name: &str) -> String {
        self.quote_table_name(name)
    }

    /// Renders a literal inline. Only used for logging raw SQL.
    fn quote_value(&self, value: &SqlValue) -> String {
        value.to_sql_inline()
    }

    /// Cast applied to a bound JSON parameter, if the dialect has one.
    fn json_cast(&self, _json_type: JsonType) -> Option<&'static str> {
        None
    }

    /// Registers builders specific to this dialect.
    fn register_builders(&self, _registry: &mut BuilderRegistry) {}
}
