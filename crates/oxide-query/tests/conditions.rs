//! WHERE, HAVING, and ON rendering.

mod common;
use common::*;

use oxide_query::{
    agg_cond, and, between, cond, field_cmp, is_not_null, is_null, not_between, or, sub_exists,
    try_and, AggregateFunc, MySqlDialect, Operator, PostgresDialect, QueryBuilder, QueryError,
    SqliteDialect,
};

#[test]
fn comparison_operators() {
    for (op, text) in [
        (Operator::Eq, "="),
        (Operator::NotEq, "!="),
        (Operator::Gt, ">"),
        (Operator::GtEq, ">="),
        (Operator::Lt, "<"),
        (Operator::LtEq, "<="),
        (Operator::Like, "LIKE"),
        (Operator::NotLike, "NOT LIKE"),
    ] {
        let out = pg(QueryBuilder::select(t("users")).where_clause(cond(f("age"), op, p("v"))));
        assert_eq!(
            out.sql,
            format!(r#"SELECT * FROM "users" WHERE "age" {text} :v"#)
        );
    }
}

#[test]
fn membership_wraps_placeholder() {
    let out = pg(QueryBuilder::select(t("users")).where_clause(cond(f("id"), Operator::NotIn, p("ids"))));
    assert_eq!(out.sql, r#"SELECT * FROM "users" WHERE "id" NOT IN (:ids)"#);
}

#[test]
fn null_checks() {
    let out = pg(QueryBuilder::select(t("users"))
        .where_clause(is_null(f("nickname")))
        .where_clause(is_not_null(f("email"))));
    assert_eq!(
        out.sql,
        r#"SELECT * FROM "users" WHERE "nickname" IS NULL AND "email" IS NOT NULL"#
    );
    assert!(out.required_params.is_empty());
}

#[test]
fn between_and_not_between() {
    let out = pg(QueryBuilder::select(t("users"))
        .where_clause(between(f("age"), p("low"), p("high")))
        .where_clause(not_between(f("created_at"), p("since"), p("until"))));
    assert_eq!(
        out.sql,
        concat!(
            r#"SELECT * FROM "users" WHERE "age" BETWEEN :low AND :high"#,
            r#" AND "created_at" NOT BETWEEN :since AND :until"#
        )
    );
    assert_eq!(out.required_params, ["low", "high", "since", "until"]);
}

#[test]
fn deeply_nested_groups() {
    let inner = or(vec![
        cond(f("age"), Operator::Lt, p("young")).into(),
        cond(f("age"), Operator::Gt, p("old")).into(),
    ]);
    let middle = and(vec![inner.into(), cond(f("active"), Operator::Eq, p("active")).into()]);
    let outer = or(vec![middle.into(), is_null(f("email")).into()]);

    let out = pg(QueryBuilder::select(t("users")).where_clause(outer));
    assert_eq!(
        out.sql,
        concat!(
            r#"SELECT * FROM "users" WHERE (("age" < :young OR "age" > :old)"#,
            r#" AND "active" = :active) OR "email" IS NULL"#
        )
    );
}

#[test]
fn where_after_or_group_wraps_it() {
    let out = pg(QueryBuilder::select(t("users"))
        .where_clause(or(vec![
            cond(f("username"), Operator::Eq, p("a")).into(),
            cond(f("email"), Operator::Eq, p("b")).into(),
        ]))
        .where_clause(cond(f("active"), Operator::Eq, p("active"))));
    assert_eq!(
        out.sql,
        r#"SELECT * FROM "users" WHERE ("username" = :a OR "email" = :b) AND "active" = :active"#
    );
}

#[test]
fn where_after_and_group_wraps_it() {
    let out = pg(QueryBuilder::select(t("users"))
        .where_clause(and(vec![
            cond(f("username"), Operator::Eq, p("a")).into(),
            cond(f("email"), Operator::Eq, p("b")).into(),
        ]))
        .where_clause(cond(f("active"), Operator::Eq, p("active"))));
    assert_eq!(
        out.sql,
        r#"SELECT * FROM "users" WHERE ("username" = :a AND "email" = :b) AND "active" = :active"#
    );
}

#[test]
fn empty_groups_name_their_operator() {
    assert_eq!(
        try_and(vec![]).unwrap_err().to_string(),
        "structural error: AND requires at least one condition"
    );
}

#[test]
#[should_panic(expected = "AND requires at least one condition")]
fn empty_and_panics() {
    let _ = and(vec![]);
}

#[test]
fn not_exists_subquery() {
    let posts = QueryBuilder::select(t("posts"))
        .fields([f("id")])
        .where_clause(field_cmp(f("user_id"), Operator::Eq, f("id")))
        .must_build();
    let out = pg(QueryBuilder::select(t("users")).where_clause(sub_exists(Operator::NotExists, posts)));
    assert_eq!(
        out.sql,
        r#"SELECT * FROM "users" WHERE NOT EXISTS (SELECT "id" FROM "posts" WHERE "user_id" = "id")"#
    );
}

#[test]
fn qualified_join_condition() {
    let reg = registry();
    let users = reg.table("users");
    let posts = reg.table("posts");
    let on = field_cmp(
        reg.field_in(&users, "id").qualified(&users),
        Operator::Eq,
        reg.field_in(&posts, "user_id").qualified(&posts),
    );
    let out = pg(QueryBuilder::select(users.clone())
        .fields([reg.field_in(&users, "username").qualified(&users)])
        .left_join(posts, on));
    assert_eq!(
        out.sql,
        concat!(
            r#"SELECT "users"."username" FROM "users""#,
            r#" LEFT JOIN "posts" ON "users"."id" = "posts"."user_id""#
        )
    );
}

#[test]
fn group_by_with_having() {
    let out = pg(QueryBuilder::select(t("posts"))
        .fields([f("user_id")])
        .group_by([f("user_id")])
        .having(agg_cond(AggregateFunc::Count, None, Operator::Gt, p("min_posts")))
        .having(agg_cond(AggregateFunc::Avg, Some(f("score")), Operator::GtEq, p("min_avg"))));
    assert_eq!(
        out.sql,
        concat!(
            r#"SELECT "user_id" FROM "posts" GROUP BY "user_id""#,
            r#" HAVING COUNT(*) > :min_posts AND AVG("score") >= :min_avg"#
        )
    );
    assert_eq!(out.required_params, ["min_posts", "min_avg"]);
}

#[test]
fn having_without_group_by_is_structural() {
    let err = QueryBuilder::select(t("posts"))
        .having(agg_cond(AggregateFunc::Sum, Some(f("score")), Operator::Gt, p("n")))
        .render(&PostgresDialect::new())
        .unwrap_err();
    assert!(matches!(err, QueryError::Structural(_)));
}

#[test]
fn ilike_only_on_postgres() {
    let builder = || {
        QueryBuilder::select(t("users")).where_clause(cond(f("email"), Operator::ILike, p("pattern")))
    };
    assert_eq!(
        pg(builder()).sql,
        r#"SELECT * FROM "users" WHERE "email" ILIKE :pattern"#
    );
    assert!(builder().render(&SqliteDialect::new()).unwrap_err().is_render());
    assert!(builder().render(&MySqlDialect::new()).unwrap_err().is_render());
}
