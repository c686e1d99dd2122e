//! INSERT, UPDATE, and DELETE rendering.

mod common;
use common::*;

use std::collections::BTreeMap;

use oxide_query::{
    cond, ConflictAction, MySqlDialect, Operator, PostgresDialect, QueryBuilder, QueryError,
    SqlServerDialect, SqliteDialect,
};

#[test]
fn insert_single_row() {
    let out = pg(QueryBuilder::insert(t("users"))
        .values([(f("username"), p("username")), (f("email"), p("email"))]));
    // Columns render in a stable, sorted order.
    assert_eq!(
        out.sql,
        r#"INSERT INTO "users" ("email", "username") VALUES (:email, :username)"#
    );
    assert_eq!(out.required_params, ["email", "username"]);
}

#[test]
fn insert_multiple_rows() {
    let builder = || {
        QueryBuilder::insert(t("users"))
            .values([(f("username"), p("u1")), (f("email"), p("e1"))])
            .values([(f("username"), p("u2")), (f("email"), p("e2"))])
    };
    assert_eq!(
        pg(builder()).sql,
        r#"INSERT INTO "users" ("email", "username") VALUES (:e1, :u1), (:e2, :u2)"#
    );
    for dialect in dialects() {
        assert!(builder().render(dialect.as_ref()).is_ok(), "{}", dialect.name());
    }
}

#[test]
fn insert_rows_must_share_columns() {
    let err = QueryBuilder::insert(t("users"))
        .values([(f("username"), p("u1"))])
        .values([(f("email"), p("e2"))])
        .render(&PostgresDialect::new())
        .unwrap_err();
    assert!(matches!(err, QueryError::Structural(_)));
}

#[test]
fn insert_without_values_is_structural() {
    let err = QueryBuilder::insert(t("users"))
        .render(&PostgresDialect::new())
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "structural error: INSERT requires at least one row of values"
    );
}

#[test]
fn insert_returning() {
    let builder = || {
        QueryBuilder::insert(t("users"))
            .values([(f("username"), p("username"))])
            .returning([f("id")])
    };
    assert_eq!(
        pg(builder()).sql,
        r#"INSERT INTO "users" ("username") VALUES (:username) RETURNING "id""#
    );
    assert_eq!(
        sql(builder(), &SqliteDialect::new()),
        r#"INSERT INTO "users" ("username") VALUES (:username) RETURNING "id""#
    );
    assert!(builder().render(&MySqlDialect::new()).unwrap_err().is_render());
    assert!(builder().render(&SqlServerDialect::new()).unwrap_err().is_render());
}

#[test]
fn upsert_do_update() {
    let builder = || {
        QueryBuilder::insert(t("users"))
            .values([(f("email"), p("email")), (f("username"), p("username"))])
            .on_conflict(
                [f("email")],
                ConflictAction::DoUpdate(BTreeMap::from([(f("username"), p("username"))])),
            )
    };
    let out = pg(builder());
    assert_eq!(
        out.sql,
        concat!(
            r#"INSERT INTO "users" ("email", "username") VALUES (:email, :username)"#,
            r#" ON CONFLICT ("email") DO UPDATE SET "username" = :username"#
        )
    );
    assert_eq!(out.required_params, ["email", "username"]);
    assert_eq!(out.param_occurrences, ["email", "username", "username"]);
    assert!(builder().render(&SqliteDialect::new()).is_ok());
    assert!(builder().render(&MySqlDialect::new()).unwrap_err().is_render());
}

#[test]
fn upsert_do_nothing() {
    let out = pg(QueryBuilder::insert(t("users"))
        .values([(f("email"), p("email"))])
        .on_conflict([f("email")], ConflictAction::DoNothing));
    assert_eq!(
        out.sql,
        r#"INSERT INTO "users" ("email") VALUES (:email) ON CONFLICT ("email") DO NOTHING"#
    );
}

#[test]
fn update_set_where() {
    let builder = || {
        QueryBuilder::update(t("users"))
            .set(f("email"), p("email"))
            .where_clause(cond(f("id"), Operator::Eq, p("id")))
    };
    assert_eq!(
        pg(builder()).sql,
        r#"UPDATE "users" SET "email" = :email WHERE "id" = :id"#
    );
    assert_eq!(
        sql(builder(), &MySqlDialect::new()),
        "UPDATE `users` SET `email` = ? WHERE `id` = ?"
    );
    assert_eq!(
        sql(builder(), &SqlServerDialect::new()),
        "UPDATE [users] SET [email] = @email WHERE [id] = @id"
    );
    assert_eq!(
        sql(builder(), &PostgresDialect::numbered()),
        r#"UPDATE "users" SET "email" = $1 WHERE "id" = $2"#
    );
}

#[test]
fn update_targets_render_unqualified() {
    let reg = registry();
    let users = reg.table("users");
    let out = pg(QueryBuilder::update(users.clone())
        .set(reg.field_in(&users, "email").qualified(&users), p("email")));
    assert_eq!(out.sql, r#"UPDATE "users" SET "email" = :email"#);
}

#[test]
fn update_without_set_is_structural() {
    let err = QueryBuilder::update(t("users"))
        .where_clause(cond(f("id"), Operator::Eq, p("id")))
        .render(&PostgresDialect::new())
        .unwrap_err();
    assert!(matches!(err, QueryError::Structural(_)));
}

#[test]
fn delete_where_returning() {
    let out = pg(QueryBuilder::delete(t("posts"))
        .where_clause(cond(f("user_id"), Operator::Eq, p("user_id")))
        .returning([f("id"), f("title")]));
    assert_eq!(
        out.sql,
        r#"DELETE FROM "posts" WHERE "user_id" = :user_id RETURNING "id", "title""#
    );
}

#[test]
fn delete_everything() {
    for dialect in dialects() {
        let out = QueryBuilder::delete(t("posts")).must_render(dialect.as_ref());
        assert!(out.sql.starts_with("DELETE FROM "), "{}", out.sql);
        assert!(out.required_params.is_empty());
    }
}
