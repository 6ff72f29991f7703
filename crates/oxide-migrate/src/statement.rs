//! Rendered statements and their execution.

use std::fmt;
use std::sync::LazyLock;

use oxide_query::{Dialect, ParameterTable, SqlValue};
use regex::{Captures, Regex};
use sqlx::sqlite::{SqliteArguments, SqlitePool};
use sqlx::query::Query;
use sqlx::Sqlite;
use tracing::debug;

use crate::error::Result;

/// Quoted strings and quoted identifiers are matched first so placeholders
/// inside them are left alone. `::` casts are matched but never rewritten.
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"'(?:[^']|'')*'|"(?:[^"]|"")*"|::?[A-Za-z_][A-Za-z0-9_]*"#)
        .expect("Invalid placeholder pattern regex")
});

/// One SQL statement plus the bindings it references by name.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    sql: String,
    params: ParameterTable,
}

impl Statement {
    /// Creates a statement from compiled SQL and its parameter table.
    #[must_use]
    pub const fn new(sql: String, params: ParameterTable) -> Self {
        Self { sql, params }
    }

    /// SQL text with named placeholders.
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Bindings referenced by [`sql`](Self::sql).
    #[must_use]
    pub const fn params(&self) -> &ParameterTable {
        &self.params
    }

    /// Rewrites named placeholders to `?` and returns the values in the order
    /// they appear. A name used twice is bound twice.
    ///
    /// Names missing from the table are left in the text.
    #[must_use]
    pub fn positional(&self) -> (String, Vec<SqlValue>) {
        let mut values = Vec::new();
        let sql = PLACEHOLDER.replace_all(&self.sql, |caps: &Captures<'_>| {
            let token = &caps[0];
            match self.params.get(token) {
                Some(param) if token.starts_with(':') && !token.starts_with("::") => {
                    values.push(param.bound_value());
                    String::from("?")
                }
                _ => token.to_string(),
            }
        });
        (sql.into_owned(), values)
    }

    /// SQL text with every binding inlined. For logs and dry runs only.
    #[must_use]
    pub fn raw_sql(&self, dialect: &dyn Dialect) -> String {
        PLACEHOLDER
            .replace_all(&self.sql, |caps: &Captures<'_>| {
                let token = &caps[0];
                match self.params.get(token) {
                    Some(param) if !token.starts_with("::") => {
                        dialect.quote_value(&param.bound_value())
                    }
                    _ => token.to_string(),
                }
            })
            .into_owned()
    }

    /// Runs the statement, returning the number of affected rows.
    ///
    /// # Errors
    ///
    /// Returns the database error if execution fails.
    pub async fn execute(&self, pool: &SqlitePool) -> Result<u64> {
        let (sql, values) = self.positional();
        debug!(sql = %sql, bindings = values.len(), "executing statement");

        let mut query = sqlx::query(&sql);
        for value in values {
            query = bind_value(query, value);
        }
        let result = query.execute(pool).await?;
        Ok(result.rows_affected())
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}

fn bind_value<'q>(
    query: Query<'q, Sqlite, SqliteArguments<'q>>,
    value: SqlValue,
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    match value {
        SqlValue::Null => query.bind(None::<String>),
        SqlValue::Bool(b) => query.bind(b),
        SqlValue::Int(n) => query.bind(n),
        SqlValue::Float(f) => query.bind(f),
        SqlValue::Text(s) => query.bind(s),
        SqlValue::Blob(b) => query.bind(b),
    }
}
