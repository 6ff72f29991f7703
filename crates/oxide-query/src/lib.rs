//! # oxide-query
//!
//! An expression compilation engine: typed SQL fragments in, SQL text plus
//! named bound parameters out.
//!
//! This crate provides:
//! - Raw fragments, typed values, JSON values and pre-compiled handles
//! - A builder registry resolving each expression kind to its builder,
//!   walking ancestor kinds on a miss and caching the result
//! - A placeholder allocator that never collides with names already bound
//! - Query and condition objects that compile recursively into one table
//!
//! ## Compiling operands
//!
//! Any operand can be compiled. Literals become fresh placeholders;
//! expressions go to their builder:
//!
//! ```rust
//! use oxide_query::expression::Expression;
//! use oxide_query::{GenericDialect, Operand, ParameterTable, QueryBuilder};
//!
//! let qb = QueryBuilder::new(GenericDialect::new());
//! let mut params = ParameterTable::new();
//!
//! let sql = qb.compile(&Operand::from("Alice"), &mut params).unwrap();
//! assert_eq!(sql, ":p0");
//!
//! let raw = Expression::new("created_at > :since").bind(":since", "2024-01-01");
//! let sql = qb.compile(&raw.into(), &mut params).unwrap();
//! assert_eq!(sql, "created_at > :since");
//! assert_eq!(params.len(), 2);
//! ```
//!
//! ## Custom expression kinds
//!
//! New kinds implement [`ExpressionInterface`](expression::ExpressionInterface)
//! and get a builder registered for them, or name a parent kind whose builder
//! they reuse:
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use oxide_query::builder::ExpressionBuilder;
//! use oxide_query::expression::ExpressionInterface;
//! use oxide_query::{impl_expression, Dialect, GenericDialect, Operand, ParameterTable, QueryBuilder, Result};
//!
//! #[derive(Debug)]
//! struct Now;
//! impl_expression!(Now);
//!
//! struct NowBuilder;
//!
//! impl ExpressionBuilder for NowBuilder {
//!     fn build(
//!         &self,
//!         _expression: &dyn ExpressionInterface,
//!         _compiler: &QueryBuilder,
//!         _params: &mut ParameterTable,
//!     ) -> Result<String> {
//!         Ok(String::from("CURRENT_TIMESTAMP"))
//!     }
//! }
//!
//! let qb = QueryBuilder::new(GenericDialect::new())
//!     .register::<Now, _, _>(|_: &Arc<dyn Dialect>| NowBuilder);
//! let (sql, params) = qb.to_sql(&Operand::expression(Now)).unwrap();
//! assert_eq!(sql, "CURRENT_TIMESTAMP");
//! assert!(params.is_empty());
//! ```

pub mod builder;
pub mod dialect;
pub mod error;
pub mod expression;
pub mod params;
pub mod query;
pub mod query_builder;
pub mod registry;
pub mod value;

pub use dialect::{Dialect, GenericDialect, PostgresDialect, SqliteDialect};
pub use error::{QueryError, Result};
pub use expression::{
    Compiled, Expression, ExpressionInterface, JsonExpression, JsonType, Operand, TypedValue,
};
pub use params::{Param, ParameterTable, PARAM_PREFIX};
pub use query::{col, Query};
pub use query_builder::QueryBuilder;
pub use registry::BuilderRegistry;
pub use value::{BindingType, SqlValue, ToSqlValue};
