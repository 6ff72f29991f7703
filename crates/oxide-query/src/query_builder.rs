//! Compilation entry point.
//!
//! [`QueryBuilder::compile`] takes any operand: expressions go to the builder
//! the registry resolves for them, literals are bound under a fresh
//! placeholder. Every call for one statement shares one [`ParameterTable`],
//! which the caller owns and may supply pre-populated.

use std::fmt;
use std::sync::Arc;

use tracing::trace;

use crate::builder::ExpressionBuilder;
use crate::dialect::Dialect;
use crate::error::Result;
use crate::expression::{Compiled, ExpressionInterface, Operand};
use crate::params::{Param, ParameterTable};
use crate::query::{FromItem, OrderDirection, Query, SelectItem};
use crate::registry::BuilderRegistry;

/// Compiles operands and queries into SQL text plus bindings.
///
/// Cloning is cheap and clones share the builder cache, so one instance can
/// serve many threads. Each statement needs its own [`ParameterTable`].
///
/// ```rust
/// use oxide_query::expression::{Expression, TypedValue};
/// use oxide_query::{BindingType, GenericDialect, Operand, ParameterTable, QueryBuilder};
///
/// let qb = QueryBuilder::new(GenericDialect::new());
/// let mut params = ParameterTable::new();
/// let parts = qb
///     .compile_all(
///         &[
///             Operand::from(42),
///             Operand::from(Expression::new("NOW()")),
///             Operand::from(TypedValue::new("abc", BindingType::Lob)),
///         ],
///         &mut params,
///     )
///     .unwrap();
///
/// assert_eq!(parts, vec![":p0", "NOW()", ":p1"]);
/// assert_eq!(params.len(), 2);
/// ```
#[derive(Clone)]
pub struct QueryBuilder {
    dialect: Arc<dyn Dialect>,
    registry: Arc<BuilderRegistry>,
}

impl fmt::Debug for QueryBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryBuilder")
            .field("dialect", &self.dialect.name())
            .field("registry", &self.registry)
            .finish()
    }
}

impl QueryBuilder {
    /// Creates a builder with the core builders plus the dialect's own.
    pub fn new<D: Dialect + 'static>(dialect: D) -> Self {
        let dialect: Arc<dyn Dialect> = Arc::new(dialect);
        let mut registry = BuilderRegistry::with_core_builders();
        dialect.register_builders(&mut registry);
        Self::with_registry(dialect, registry)
    }

    /// Creates a builder from an explicit registry.
    #[must_use]
    pub fn with_registry(dialect: Arc<dyn Dialect>, registry: BuilderRegistry) -> Self {
        Self {
            dialect,
            registry: Arc::new(registry),
        }
    }

    /// Registers a builder for expressions of type `E`.
    #[must_use]
    pub fn register<E, B, F>(mut self, factory: F) -> Self
    where
        E: ExpressionInterface,
        B: ExpressionBuilder + 'static,
        F: Fn(&Arc<dyn Dialect>) -> B + Send + Sync + 'static,
    {
        Arc::make_mut(&mut self.registry).register::<E, B, F>(factory);
        self
    }

    /// The dialect in use.
    #[must_use]
    pub fn dialect(&self) -> &dyn Dialect {
        self.dialect.as_ref()
    }

    /// The builder registry.
    #[must_use]
    pub fn registry(&self) -> &BuilderRegistry {
        &self.registry
    }

    /// Compiles one operand into SQL, recording bindings in `params`.
    ///
    /// # Errors
    ///
    /// Fails if an expression kind has no builder or a builder rejects its
    /// input.
    pub fn compile(&self, operand: &Operand, params: &mut ParameterTable) -> Result<String> {
        match operand {
            Operand::Expression(expression) => self.build_expression(expression.as_ref(), params),
            Operand::Value(value) => Ok(params.bind(Param::Value(value.clone()))),
        }
    }

    /// Compiles an expression through its registered builder.
    ///
    /// # Errors
    ///
    /// See [`compile`](Self::compile).
    pub fn build_expression(
        &self,
        expression: &dyn ExpressionInterface,
        params: &mut ParameterTable,
    ) -> Result<String> {
        trace!(type_name = expression.type_name(), "compiling expression");
        let (builder, view) = self.registry.resolve(expression, &self.dialect)?;
        builder.build(view, self, params)
    }

    /// Compiles each operand in order against the same table.
    ///
    /// # Errors
    ///
    /// See [`compile`](Self::compile).
    pub fn compile_all(&self, operands: &[Operand], params: &mut ParameterTable) -> Result<Vec<String>> {
        operands
            .iter()
            .map(|operand| self.compile(operand, params))
            .collect()
    }

    /// Compiles an operand against a fresh table and returns both.
    ///
    /// # Errors
    ///
    /// See [`compile`](Self::compile).
    pub fn to_sql(&self, operand: &Operand) -> Result<(String, ParameterTable)> {
        let mut params = ParameterTable::new();
        let sql = self.compile(operand, &mut params)?;
        Ok((sql, params))
    }

    /// Compiles an operand into an opaque handle.
    ///
    /// The handle's bindings stay in `params`; compiling the handle later
    /// returns the same text and binds nothing.
    ///
    /// # Errors
    ///
    /// See [`compile`](Self::compile).
    pub fn prepare(&self, operand: &Operand, params: &mut ParameterTable) -> Result<Compiled> {
        self.compile(operand, params).map(Compiled::new)
    }

    /// Renders a SELECT statement.
    ///
    /// The query's own parameters are merged into `params` first.
    ///
    /// # Errors
    ///
    /// See [`compile`](Self::compile).
    pub fn build(&self, query: &Query, params: &mut ParameterTable) -> Result<String> {
        params.merge(query.params.clone());

        let mut sql = String::from("SELECT ");
        if query.distinct {
            sql.push_str("DISTINCT ");
        }
        sql.push_str(&self.build_select(&query.select, params)?);

        if !query.from.is_empty() {
            sql.push_str(" FROM ");
            sql.push_str(&self.build_from(&query.from, params)?);
        }

        for join in &query.joins {
            let on = self.compile(&join.on, params)?;
            sql.push_str(&format!(
                " {} {} ON {on}",
                join.kind.as_sql(),
                self.dialect.quote_table_name(&join.table)
            ));
        }

        if let Some(condition) = &query.where_clause {
            let condition = self.compile(condition, params)?;
            if !condition.is_empty() {
                sql.push_str(" WHERE ");
                sql.push_str(&condition);
            }
        }

        if !query.group_by.is_empty() {
            sql.push_str(" GROUP BY ");
            sql.push_str(&self.quote_columns(query.group_by.iter().map(String::as_str)));
        }

        if let Some(condition) = &query.having {
            let condition = self.compile(condition, params)?;
            if !condition.is_empty() {
                sql.push_str(" HAVING ");
                sql.push_str(&condition);
            }
        }

        if !query.order_by.is_empty() {
            let order: Vec<String> = query
                .order_by
                .iter()
                .map(|(column, direction)| {
                    let direction = match direction {
                        OrderDirection::Asc => "ASC",
                        OrderDirection::Desc => "DESC",
                    };
                    format!("{} {direction}", self.dialect.quote_column_name(column))
                })
                .collect();
            sql.push_str(" ORDER BY ");
            sql.push_str(&order.join(", "));
        }

        if let Some(n) = query.limit {
            sql.push_str(&format!(" LIMIT {n}"));
        }

        if let Some(n) = query.offset {
            sql.push_str(&format!(" OFFSET {n}"));
        }

        Ok(sql)
    }

    fn build_select(&self, items: &[SelectItem], params: &mut ParameterTable) -> Result<String> {
        if items.is_empty() {
            return Ok(String::from("*"));
        }
        let mut columns = Vec::with_capacity(items.len());
        for item in items {
            columns.push(match item {
                SelectItem::Column(name) => self.dialect.quote_column_name(name),
                SelectItem::Expr { expr, alias } => {
                    let sql = self.compile(expr, params)?;
                    match alias {
                        Some(alias) => format!("{sql} AS {}", self.dialect.quote_simple_name(alias)),
                        None => sql,
                    }
                }
            });
        }
        Ok(columns.join(", "))
    }

    fn build_from(&self, items: &[FromItem], params: &mut ParameterTable) -> Result<String> {
        let mut sources = Vec::with_capacity(items.len());
        for item in items {
            sources.push(match item {
                FromItem::Table { name, alias: None } => self.dialect.quote_table_name(name),
                FromItem::Table {
                    name,
                    alias: Some(alias),
                } => format!(
                    "{} {}",
                    self.dialect.quote_table_name(name),
                    self.dialect.quote_simple_name(alias)
                ),
                FromItem::Query { query, alias } => format!(
                    "{} {}",
                    self.build_expression(&**query, params)?,
                    self.dialect.quote_simple_name(alias)
                ),
            });
        }
        Ok(sources.join(", "))
    }

    fn quote_columns<'a>(&self, columns: impl Iterator<Item = &'a str>) -> String {
        columns
            .map(|column| self.dialect.quote_column_name(column))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Renders `INSERT INTO table (cols) VALUES (...)`.
    ///
    /// # Errors
    ///
    /// See [`compile`](Self::compile).
    pub fn insert(
        &self,
        table: &str,
        columns: &[(&str, Operand)],
        params: &mut ParameterTable,
    ) -> Result<String> {
        let names = self.quote_columns(columns.iter().map(|(name, _)| *name));
        let mut values = Vec::with_capacity(columns.len());
        for (_, value) in columns {
            values.push(self.compile(value, params)?);
        }
        Ok(format!(
            "INSERT INTO {} ({names}) VALUES ({})",
            self.dialect.quote_table_name(table),
            values.join(", ")
        ))
    }

    /// Renders `UPDATE table SET col = value, ... [WHERE condition]`.
    ///
    /// # Errors
    ///
    /// See [`compile`](Self::compile).
    pub fn update(
        &self,
        table: &str,
        columns: &[(&str, Operand)],
        condition: Option<&Operand>,
        params: &mut ParameterTable,
    ) -> Result<String> {
        let mut sets = Vec::with_capacity(columns.len());
        for (name, value) in columns {
            let value = self.compile(value, params)?;
            sets.push(format!("{} = {value}", self.dialect.quote_column_name(name)));
        }
        let mut sql = format!(
            "UPDATE {} SET {}",
            self.dialect.quote_table_name(table),
            sets.join(", ")
        );
        self.push_where(&mut sql, condition, params)?;
        Ok(sql)
    }

    /// Renders `DELETE FROM table [WHERE condition]`.
    ///
    /// # Errors
    ///
    /// See [`compile`](Self::compile).
    pub fn delete(
        &self,
        table: &str,
        condition: Option<&Operand>,
        params: &mut ParameterTable,
    ) -> Result<String> {
        let mut sql = format!("DELETE FROM {}", self.dialect.quote_table_name(table));
        self.push_where(&mut sql, condition, params)?;
        Ok(sql)
    }

    fn push_where(
        &self,
        sql: &mut String,
        condition: Option<&Operand>,
        params: &mut ParameterTable,
    ) -> Result<()> {
        if let Some(condition) = condition {
            let condition = self.compile(condition, params)?;
            if !condition.is_empty() {
                sql.push_str(" WHERE ");
                sql.push_str(&condition);
            }
        }
        Ok(())
    }
}
