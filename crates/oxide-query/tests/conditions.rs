//! Tests for condition objects and SELECT rendering: comparisons, NULL
//! checks, IN/BETWEEN/EXISTS, conjunctions, negation and sub-queries.

mod common;
use common::*;

use oxide_query::query::{exists, not_exists, ActiveRecord, Column};
use oxide_query::{col, Expression, Operand, Param, Query, SqlValue};

#[test]
fn comparison_operators() {
    let qb = generic();
    let cases = [
        (col("a").eq(1), "\"a\" = :p0"),
        (col("a").not_eq(1), "\"a\" <> :p0"),
        (col("a").lt(1), "\"a\" < :p0"),
        (col("a").lt_eq(1), "\"a\" <= :p0"),
        (col("a").gt(1), "\"a\" > :p0"),
        (col("a").gt_eq(1), "\"a\" >= :p0"),
        (col("a").like("x%"), "\"a\" LIKE :p0"),
        (col("a").not_like("x%"), "\"a\" NOT LIKE :p0"),
    ];
    for (condition, expected) in cases {
        let (sql, params) = compile(&qb, condition);
        assert_eq!(sql, expected);
        assert_eq!(params.len(), 1);
    }
}

#[test]
fn null_checks_are_inline() {
    let qb = generic();
    let (sql, params) = compile(&qb, col("deleted_at").is_null());
    assert_eq!(sql, "\"deleted_at\" IS NULL");
    assert!(params.is_empty());

    let (sql, _) = compile(&qb, col("deleted_at").is_not_null());
    assert_eq!(sql, "\"deleted_at\" IS NOT NULL");

    let (sql, params) = compile(&qb, col("deleted_at").eq(SqlValue::Null));
    assert_eq!(sql, "\"deleted_at\" IS NULL");
    assert!(params.is_empty());

    let (sql, _) = compile(&qb, col("deleted_at").not_eq(SqlValue::Null));
    assert_eq!(sql, "\"deleted_at\" IS NOT NULL");
}

#[test]
fn column_compared_with_expression() {
    let (sql, params) = compile(
        &generic(),
        Column::qualified("o", "created_at").gt(Expression::new("NOW() - INTERVAL '1 day'")),
    );
    assert_eq!(sql, "\"o\".\"created_at\" > NOW() - INTERVAL '1 day'");
    assert!(params.is_empty());
}

#[test]
fn in_list_binds_each_value() {
    let (sql, params) = compile(&generic(), col("id").in_list(vec![1, 2, 3]));
    assert_eq!(sql, "\"id\" IN (:p0, :p1, :p2)");
    assert_eq!(params.get(":p2"), Some(&Param::value(3)));
}

#[test]
fn empty_in_list_is_constant() {
    let qb = generic();
    let (sql, params) = compile(&qb, col("id").in_list(Vec::<i64>::new()));
    assert_eq!(sql, "0=1");
    assert!(params.is_empty());

    let (sql, _) = compile(&qb, col("id").not_in_list(Vec::<i64>::new()));
    assert_eq!(sql, "1=1");
}

#[test]
fn in_sub_query() {
    let sub = Query::new()
        .select(&["user_id"])
        .from("bans")
        .where_clause(col("active").eq(true));
    let (sql, params) = compile(&generic(), col("id").not_in_query(sub));
    assert_eq!(
        sql,
        "\"id\" NOT IN (SELECT \"user_id\" FROM \"bans\" WHERE \"active\" = :p0)"
    );
    assert_eq!(params.len(), 1);
}

#[test]
fn between_conditions() {
    let qb = generic();
    let (sql, _) = compile(&qb, col("age").between(18, 65));
    assert_eq!(sql, "\"age\" BETWEEN :p0 AND :p1");

    let (sql, _) = compile(&qb, col("age").not_between(18, 65));
    assert_eq!(sql, "\"age\" NOT BETWEEN :p0 AND :p1");
}

#[test]
fn exists_conditions() {
    let qb = generic();
    let orders = || {
        Query::new()
            .select(&["1"])
            .from("orders")
            .where_clause(Expression::new("orders.user_id = users.id"))
    };

    let (sql, _) = compile(&qb, exists(orders()));
    assert_eq!(
        sql,
        "EXISTS (SELECT \"1\" FROM \"orders\" WHERE orders.user_id = users.id)"
    );

    let (sql, _) = compile(&qb, not_exists(orders()));
    assert!(sql.starts_with("NOT EXISTS (SELECT"));
}

#[test]
fn conjunctions_nest_and_flatten() {
    let qb = generic();
    let condition = col("a")
        .eq(1)
        .and(col("b").eq(2))
        .and(col("c").eq(3).or(col("d").eq(4)));

    let (sql, params) = compile(&qb, condition);
    assert_eq!(
        sql,
        "(\"a\" = :p0) AND (\"b\" = :p1) AND ((\"c\" = :p2) OR (\"d\" = :p3))"
    );
    assert_eq!(params.len(), 4);
}

#[test]
fn negation_wraps_condition() {
    let (sql, _) = compile(&generic(), col("a").eq(1).or(col("b").eq(2)).not());
    assert_eq!(sql, "NOT ((\"a\" = :p0) OR (\"b\" = :p1))");
}

#[test]
fn empty_condition_parts_are_dropped() {
    let qb = generic();
    let condition = Operand::from(Expression::new("")).and(col("a").eq(1));
    let (sql, _) = compile(&qb, condition);
    assert_eq!(sql, "\"a\" = :p0");

    let query = Query::new()
        .from("t")
        .where_clause(Operand::from(Expression::new("")).not());
    let (sql, _) = build(&qb, &query);
    assert_eq!(sql, "SELECT * FROM \"t\"");
}

#[test]
fn select_distinct_from_sub_query() {
    let inner = Query::new()
        .select(&["customer_id"])
        .from("orders")
        .where_clause(col("total").gt(100));
    let query = Query::new()
        .distinct()
        .select(&["big.customer_id"])
        .from_query(inner, "big")
        .order_by("big.customer_id");

    let (sql, params) = build(&generic(), &query);
    assert_eq!(
        sql,
        "SELECT DISTINCT \"big\".\"customer_id\" FROM \
         (SELECT \"customer_id\" FROM \"orders\" WHERE \"total\" > :p0) \"big\" \
         ORDER BY \"big\".\"customer_id\" ASC"
    );
    assert_eq!(params.len(), 1);
}

#[test]
fn query_params_are_merged() {
    let query = Query::new()
        .from("users")
        .where_clause(Expression::new("status = :status"))
        .bind(":status", "active")
        .and_where(col("age").gt(18));

    let (sql, params) = build(&generic(), &query);
    assert_eq!(
        sql,
        "SELECT * FROM \"users\" WHERE (status = :status) AND (\"age\" > :p1)"
    );
    assert_eq!(params.get(":status"), Some(&Param::value("active")));
    assert_eq!(params.get(":p1"), Some(&Param::value(18)));
}

struct Customer;

impl ActiveRecord for Customer {
    const TABLE: &'static str = "customer";
}

#[test]
fn active_record_find_as_sub_query() {
    let vip = Customer::find()
        .filter(col("tier").eq("gold"))
        .map(|q| q.select(&["id"]));
    let query = Query::new()
        .select_expr(vip, Some("vip_id"))
        .from("orders");

    let (sql, params) = build(&generic(), &query);
    assert_eq!(
        sql,
        "SELECT (SELECT \"id\" FROM \"customer\" WHERE \"tier\" = :p0) AS \"vip_id\" \
         FROM \"orders\""
    );
    assert_eq!(params.len(), 1);
}
