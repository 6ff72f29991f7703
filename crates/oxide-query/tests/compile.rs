//! Tests for operand compilation: literal binding, typed values, raw
//! fragments, nested queries, pre-compiled handles, JSON and custom kinds.

mod common;
use common::*;

use std::sync::Arc;
use std::thread;

use oxide_query::builder::ExpressionBuilder;
use oxide_query::expression::ExpressionInterface;
use oxide_query::query::ActiveQuery;
use oxide_query::{
    col, impl_expression, BindingType, Dialect, Expression, JsonExpression, JsonType, Operand,
    Param, ParameterTable, Query, QueryBuilder, QueryError, SqlValue, TypedValue,
};
use serde_json::json;

#[test]
fn literal_binds_fresh_placeholder() {
    let qb = generic();
    let mut params = ParameterTable::new();
    params.insert(":p0", Param::value("existing"));
    params.insert(":p1", Param::value("existing"));

    let sql = qb.compile(&Operand::from(3.5), &mut params).unwrap();
    assert_eq!(sql, ":p2");
    assert_eq!(params.get(":p2"), Some(&Param::Value(SqlValue::Float(3.5))));
    assert_eq!(params.len(), 3);
}

#[test]
fn literal_skips_names_bound_by_hand() {
    let qb = generic();
    let mut params = ParameterTable::new();
    params.insert(":p1", Param::value(1));

    // The table has one entry, so numbering starts at :p1, which is taken.
    let sql = qb.compile(&Operand::from(2), &mut params).unwrap();
    assert_eq!(sql, ":p2");
    assert_eq!(params.get(":p1"), Some(&Param::value(1)));
}

#[test]
fn typed_value_is_bound_on_every_compile() {
    let qb = generic();
    let typed = Operand::from(TypedValue::new(vec![0xde_u8, 0xad], BindingType::Lob));
    let mut params = ParameterTable::new();

    let first = qb.compile(&typed, &mut params).unwrap();
    let second = qb.compile(&typed, &mut params).unwrap();
    assert_eq!(first, ":p0");
    assert_eq!(second, ":p1");
    for name in [":p0", ":p1"] {
        assert_eq!(params.get(name).unwrap().binding_type(), BindingType::Lob);
    }
}

#[test]
fn raw_fragment_text_and_params_pass_through() {
    let (sql, params) = compile(&generic(), Expression::new("x = :p1").bind(":p1", 5));
    assert_eq!(sql, "x = :p1");
    assert_eq!(params.len(), 1);
    assert_eq!(params.get(":p1"), Some(&Param::value(5)));
}

#[test]
fn raw_fragment_params_overwrite_same_name() {
    let qb = generic();
    let mut params = ParameterTable::new();
    params.insert(":x", Param::value(1));

    qb.compile(&Expression::new(":x").bind(":x", 2).into(), &mut params)
        .unwrap();
    assert_eq!(params.get(":x"), Some(&Param::value(2)));
}

#[test]
fn nested_query_is_parenthesized() {
    let qb = generic();
    let inner = Query::new()
        .select(&["id"])
        .from("orders")
        .where_clause(col("total").gt(100));

    let (inner_sql, inner_params) = build(&qb, &inner);
    let (outer_sql, outer_params) = compile(&qb, inner);

    assert_eq!(outer_sql, format!("({inner_sql})"));
    for (name, param) in inner_params.iter() {
        assert_eq!(outer_params.get(name), Some(param));
    }
}

#[test]
fn nested_query_bindings_share_the_outer_table() {
    let qb = generic();
    let mut params = ParameterTable::new();
    let before = qb.compile(&Operand::from("first"), &mut params).unwrap();

    let inner = Query::new().from("t").where_clause(col("a").eq("second"));
    let sql = qb.compile(&inner.into(), &mut params).unwrap();

    assert_eq!(before, ":p0");
    assert_eq!(sql, "(SELECT * FROM \"t\" WHERE \"a\" = :p1)");
    assert_eq!(params.len(), 2);
}

#[test]
fn prepared_handle_compiles_to_same_text() {
    let qb = generic();
    let mut params = ParameterTable::new();
    let condition = col("name").eq("Alice").and(col("age").gt(30));

    let handle = qb.prepare(&condition, &mut params).unwrap();
    let bound = params.len();
    let again = qb.compile(&handle.clone().into(), &mut params).unwrap();

    assert_eq!(again, handle.sql());
    assert_eq!(params.len(), bound);
}

#[test]
fn mixed_list_compiles_in_order() {
    let qb = generic();
    let mut params = ParameterTable::new();
    let parts = qb
        .compile_all(
            &[
                Operand::from(42),
                Operand::from(Expression::new("NOW()")),
                Operand::from(TypedValue::new("abc", BindingType::Lob)),
            ],
            &mut params,
        )
        .unwrap();

    assert_eq!(parts, vec![":p0", "NOW()", ":p1"]);
    assert_eq!(params.get(":p0"), Some(&Param::value(42)));
    assert_eq!(
        params.get(":p1"),
        Some(&Param::Typed(TypedValue::new("abc", BindingType::Lob)))
    );
}

#[test]
fn json_wrapping_query_is_rejected() {
    let json = JsonExpression::new(Query::new().from("t"), None);
    let err = postgres().to_sql(&json.into()).unwrap_err();
    assert!(matches!(err, QueryError::InvalidStructuredValue(_)));
}

#[test]
fn json_is_encoded_and_cast_on_postgres() {
    let json = JsonExpression::new(json!({"tags": ["a", "b"]}), Some(JsonType::Jsonb));
    let (sql, params) = compile(&postgres(), json);
    assert_eq!(sql, ":p0::jsonb");
    assert_eq!(
        params.get(":p0"),
        Some(&Param::value(r#"{"tags":["a","b"]}"#))
    );
}

#[test]
fn json_is_not_cast_on_sqlite() {
    let json = JsonExpression::new(json!([1, 2, 3]), Some(JsonType::Json));
    let (sql, params) = compile(&sqlite(), json);
    assert_eq!(sql, ":p0");
    assert_eq!(params.get(":p0"), Some(&Param::value("[1,2,3]")));
}

#[test]
fn json_rewrap_keeps_payload() {
    let inner = JsonExpression::new(json!({"a": 1}), Some(JsonType::Json));
    let outer = JsonExpression::new(inner, Some(JsonType::Jsonb));
    let (sql, params) = compile(&postgres(), outer);
    assert_eq!(sql, ":p0::jsonb");
    assert_eq!(params.get(":p0"), Some(&Param::value(r#"{"a":1}"#)));
}

#[test]
fn json_is_unsupported_without_dialect_builder() {
    let json = JsonExpression::new(json!(null), None);
    let err = generic().to_sql(&json.into()).unwrap_err();
    assert!(matches!(err, QueryError::UnsupportedExpression { .. }));
}

#[derive(Debug)]
struct Unknown;
impl_expression!(Unknown);

#[test]
fn unknown_kind_is_unsupported() {
    let err = generic().to_sql(&Operand::expression(Unknown)).unwrap_err();
    match err {
        QueryError::UnsupportedExpression { type_name } => {
            assert!(type_name.ends_with("Unknown"));
        }
        other => panic!("Expected UnsupportedExpression, got {other:?}"),
    }
}

#[derive(Debug)]
struct Upper(String);
impl_expression!(Upper);

struct UpperBuilder;

impl ExpressionBuilder for UpperBuilder {
    fn build(
        &self,
        expression: &dyn ExpressionInterface,
        _compiler: &QueryBuilder,
        params: &mut ParameterTable,
    ) -> oxide_query::Result<String> {
        let upper = oxide_query::builder::downcast::<Upper>(expression)?;
        Ok(format!("UPPER({})", params.bind(Param::value(upper.0.as_str()))))
    }
}

#[derive(Debug)]
struct TrimmedUpper {
    upper: Upper,
}
impl_expression!(TrimmedUpper, parent = upper);

#[test]
fn registered_builder_handles_custom_kind_and_descendants() {
    let qb = generic().register::<Upper, _, _>(|_: &Arc<dyn Dialect>| UpperBuilder);

    let (sql, params) = compile(&qb, Operand::expression(Upper(String::from("abc"))));
    assert_eq!(sql, "UPPER(:p0)");
    assert_eq!(params.get(":p0"), Some(&Param::value("abc")));

    let trimmed = TrimmedUpper {
        upper: Upper(String::from("xyz")),
    };
    let (sql, _) = compile(&qb, Operand::expression(trimmed));
    assert_eq!(sql, "UPPER(:p0)");
}

#[test]
fn active_query_compiles_as_query() {
    let qb = generic();
    let active = ActiveQuery::new("customer").filter(col("status").eq("active"));
    let (sql, params) = compile(&qb, active);
    assert_eq!(sql, "(SELECT * FROM \"customer\" WHERE \"status\" = :p0)");
    assert_eq!(params.len(), 1);
}

#[test]
fn active_query_qualifies_model_columns() {
    let active = ActiveQuery::new("customer").filter_by("id", 7);
    assert_eq!(active.table(), "customer");

    let (sql, params) = compile(&generic(), active);
    assert_eq!(
        sql,
        "(SELECT * FROM \"customer\" WHERE \"customer\".\"id\" = :p0)"
    );
    assert_eq!(params.get(":p0"), Some(&Param::value(7)));
}

#[test]
fn builder_is_shared_across_threads() {
    let qb = generic();
    thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let qb = qb.clone();
                scope.spawn(move || {
                    let condition = col("id").eq(i).and(col("name").like("%a%"));
                    qb.to_sql(&condition).unwrap()
                })
            })
            .collect();

        for handle in handles {
            let (sql, params) = handle.join().unwrap();
            assert_eq!(sql, "(\"id\" = :p0) AND (\"name\" LIKE :p1)");
            assert_eq!(params.len(), 2);
        }
    });
}
