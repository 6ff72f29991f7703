#![allow(dead_code)]

use oxide_query::{
    GenericDialect, Operand, ParameterTable, PostgresDialect, Query, QueryBuilder, SqliteDialect,
};

pub fn generic() -> QueryBuilder {
    QueryBuilder::new(GenericDialect::new())
}

pub fn postgres() -> QueryBuilder {
    QueryBuilder::new(PostgresDialect::new())
}

pub fn sqlite() -> QueryBuilder {
    QueryBuilder::new(SqliteDialect::new())
}

pub fn compile(qb: &QueryBuilder, operand: impl Into<Operand>) -> (String, ParameterTable) {
    let operand = operand.into();
    qb.to_sql(&operand)
        .unwrap_or_else(|e| panic!("Failed to compile {operand:?}\nError: {e}"))
}

pub fn build(qb: &QueryBuilder, query: &Query) -> (String, ParameterTable) {
    let mut params = ParameterTable::new();
    let sql = qb
        .build(query, &mut params)
        .unwrap_or_else(|e| panic!("Failed to build {query:?}\nError: {e}"));
    (sql, params)
}
