//! Projection expressions rendered through full queries.

mod common;
use common::*;

use oxide_query::{
    cond, AggregateFunc, BinaryOp, CaseExpr, CastType, DatePart, Expression, FieldExpression,
    MathFunc, MySqlDialect, Operator, OrderBy, QueryBuilder, QueryError, SqlServerDialect,
    SqliteDialect, StringFunc, WindowExpr, WindowFunc,
};

#[test]
fn aliased_expressions_follow_fields() {
    let out = pg(QueryBuilder::select(t("posts"))
        .fields([f("user_id")])
        .select_expr(FieldExpression::aggregate(AggregateFunc::Max, f("score")).alias("best"))
        .select_expr(FieldExpression::count_all().alias("total"))
        .group_by([f("user_id")]));
    assert_eq!(
        out.sql,
        r#"SELECT "user_id", MAX("score") AS "best", COUNT(*) AS "total" FROM "posts" GROUP BY "user_id""#
    );
}

#[test]
fn count_distinct() {
    let out = pg(QueryBuilder::select(t("posts")).select_expr(FieldExpression::aggregate(
        AggregateFunc::CountDistinct,
        f("user_id"),
    )));
    assert_eq!(out.sql, r#"SELECT COUNT(DISTINCT "user_id") FROM "posts""#);
}

#[test]
fn math_functions() {
    let out = pg(QueryBuilder::select(t("posts"))
        .select_expr(FieldExpression::math(MathFunc::Abs, f("score"), None))
        .select_expr(FieldExpression::math(MathFunc::Power, f("score"), Some(p("exp")))));
    assert_eq!(
        out.sql,
        r#"SELECT ABS("score"), POWER("score", :exp) FROM "posts""#
    );
    assert_eq!(out.required_params, ["exp"]);
}

#[test]
fn case_params_follow_text_order() {
    let case = CaseExpr::new()
        .when(cond(f("age"), Operator::Lt, p("teen")), p("young"))
        .when(cond(f("age"), Operator::Lt, p("senior")), p("adult"))
        .otherwise(p("elder"));
    let out = pg(QueryBuilder::select(t("users"))
        .select_expr(FieldExpression::case(case).alias("bracket")));
    assert_eq!(
        out.sql,
        concat!(
            r#"SELECT CASE WHEN "age" < :teen THEN :young WHEN "age" < :senior THEN :adult"#,
            r#" ELSE :elder END AS "bracket" FROM "users""#
        )
    );
    assert_eq!(
        out.required_params,
        ["teen", "young", "senior", "adult", "elder"]
    );
}

#[test]
fn coalesce_built_by_hand_is_checked_at_render() {
    let expr = FieldExpression::new(Expression::Coalesce(vec![f("nickname").into()]));
    let err = QueryBuilder::select(t("users"))
        .select_expr(expr)
        .render(&SqliteDialect::new())
        .unwrap_err();
    assert!(matches!(err, QueryError::Structural(_)));
}

#[test]
fn math_built_by_hand_is_checked_at_render() {
    let power = FieldExpression::new(Expression::Math {
        func: MathFunc::Power,
        field: f("score"),
        arg: None,
    });
    let err = QueryBuilder::select(t("posts"))
        .select_expr(power)
        .render(&SqliteDialect::new())
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "structural error: POWER requires an exponent parameter"
    );

    let abs = FieldExpression::new(Expression::Math {
        func: MathFunc::Abs,
        field: f("score"),
        arg: Some(p("extra")),
    });
    let err = QueryBuilder::select(t("posts"))
        .select_expr(abs)
        .render(&SqliteDialect::new())
        .unwrap_err();
    assert!(matches!(err, QueryError::Structural(_)));
}

#[test]
fn string_functions_per_dialect() {
    let builder = || {
        QueryBuilder::select(t("users")).select_expr(
            FieldExpression::string(StringFunc::Length, vec![f("username").into()]).alias("len"),
        )
    };
    assert_eq!(
        pg(builder()).sql,
        r#"SELECT LENGTH("username") AS "len" FROM "users""#
    );
    assert_eq!(
        sql(builder(), &SqlServerDialect::new()),
        "SELECT LEN([username]) AS [len] FROM [users]"
    );
}

#[test]
fn substring_gets_length_on_sqlserver() {
    let expr = FieldExpression::string(
        StringFunc::Substring,
        vec![f("username").into(), p("start").into()],
    );
    let builder = || QueryBuilder::select(t("users")).select_expr(expr.clone());
    assert_eq!(
        pg(builder()).sql,
        r#"SELECT SUBSTRING("username", :start) FROM "users""#
    );
    assert_eq!(
        sql(builder(), &SqliteDialect::new()),
        r#"SELECT SUBSTR("username", :start) FROM "users""#
    );
    assert_eq!(
        sql(builder(), &SqlServerDialect::new()),
        "SELECT SUBSTRING([username], @start, LEN([username])) FROM [users]"
    );
}

#[test]
fn date_functions_per_dialect() {
    let builder = || {
        QueryBuilder::select(t("users"))
            .select_expr(FieldExpression::now())
            .select_expr(FieldExpression::extract(DatePart::Month, f("created_at")))
    };
    assert_eq!(
        pg(builder()).sql,
        r#"SELECT NOW(), EXTRACT(MONTH FROM "created_at") FROM "users""#
    );
    assert_eq!(
        sql(builder(), &SqliteDialect::new()),
        r#"SELECT datetime('now'), CAST(strftime('%m', "created_at") AS INTEGER) FROM "users""#
    );
    assert_eq!(
        sql(builder(), &MySqlDialect::new()),
        "SELECT NOW(), EXTRACT(MONTH FROM `created_at`) FROM `users`"
    );
    assert_eq!(
        sql(builder(), &SqlServerDialect::new()),
        "SELECT GETDATE(), DATEPART(month, [created_at]) FROM [users]"
    );
}

#[test]
fn date_trunc_unsupported_on_mysql() {
    let err = QueryBuilder::select(t("users"))
        .select_expr(FieldExpression::date_trunc(DatePart::Day, f("created_at")))
        .render(&MySqlDialect::new())
        .unwrap_err();
    assert!(err.is_render());
}

#[test]
fn cast_targets() {
    let builder =
        || QueryBuilder::select(t("users")).select_expr(FieldExpression::cast(f("age"), CastType::Text));
    assert_eq!(pg(builder()).sql, r#"SELECT CAST("age" AS TEXT) FROM "users""#);
    assert_eq!(
        sql(builder(), &SqlServerDialect::new()),
        "SELECT CAST([age] AS NVARCHAR(MAX)) FROM [users]"
    );
}

#[test]
fn vector_similarity_ordering() {
    let out = pg(QueryBuilder::select(t("posts"))
        .fields([f("id")])
        .select_expr(
            FieldExpression::binary(f("embedding"), BinaryOp::L2Distance, p("query_vec"))
                .alias("distance"),
        )
        .limit(5));
    assert_eq!(
        out.sql,
        r#"SELECT "id", "embedding" <-> :query_vec AS "distance" FROM "posts" LIMIT 5"#
    );

    let err = QueryBuilder::select(t("posts"))
        .select_expr(FieldExpression::binary(f("embedding"), BinaryOp::InnerProduct, p("q")))
        .render(&MySqlDialect::new())
        .unwrap_err();
    assert!(err.is_render());
}

#[test]
fn arithmetic_is_portable() {
    let builder = || {
        QueryBuilder::select(t("posts"))
            .select_expr(FieldExpression::binary(f("score"), BinaryOp::Mul, p("weight")))
    };
    for dialect in dialects() {
        assert!(builder().render(dialect.as_ref()).is_ok(), "{}", dialect.name());
    }
}

#[test]
fn window_with_partition_and_order() {
    let window = WindowExpr::new(WindowFunc::Aggregate(AggregateFunc::Sum, Some(f("score"))))
        .partition_by(f("user_id"))
        .order_by(OrderBy::asc(f("published_at")));
    let out = pg(QueryBuilder::select(t("posts"))
        .fields([f("id")])
        .select_expr(FieldExpression::window(window).alias("running_score")));
    assert_eq!(
        out.sql,
        concat!(
            r#"SELECT "id", SUM("score") OVER (PARTITION BY "user_id" ORDER BY "published_at" ASC)"#,
            r#" AS "running_score" FROM "posts""#
        )
    );
}

#[test]
fn ntile_takes_parameter() {
    let out = pg(QueryBuilder::select(t("posts"))
        .select_expr(FieldExpression::window(
            WindowExpr::new(WindowFunc::Ntile(p("buckets"))).order_by(OrderBy::desc(f("score"))),
        )));
    assert_eq!(
        out.sql,
        r#"SELECT NTILE(:buckets) OVER (ORDER BY "score" DESC) FROM "posts""#
    );
}
