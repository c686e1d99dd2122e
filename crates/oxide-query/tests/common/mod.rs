#![allow(dead_code)]

use oxide_query::{
    Dialect, Field, MySqlDialect, Param, PostgresDialect, QueryBuilder, Registry, RenderResult,
    SqlServerDialect, SqliteDialect, Table,
};

pub const SCHEMA_JSON: &str = r#"{
    "tables": [
        {
            "name": "users",
            "columns": [
                {"name": "id", "type": "BIGINT"},
                {"name": "username", "type": "TEXT"},
                {"name": "email", "type": "TEXT"},
                {"name": "active", "type": "BOOLEAN"},
                {"name": "age", "type": "INTEGER"},
                {"name": "nickname", "type": "TEXT"},
                {"name": "created_at", "type": "TIMESTAMP"}
            ]
        },
        {
            "name": "posts",
            "columns": [
                {"name": "id", "type": "BIGINT"},
                {"name": "user_id", "type": "BIGINT"},
                {"name": "title", "type": "TEXT"},
                {"name": "score", "type": "INTEGER"},
                {"name": "embedding", "type": "VECTOR(3)"},
                {"name": "published_at", "type": "TIMESTAMP"}
            ]
        }
    ]
}"#;

pub fn registry() -> Registry {
    Registry::from_json(SCHEMA_JSON).unwrap_or_else(|e| panic!("fixture schema: {e}"))
}

pub fn t(name: &str) -> Table {
    registry().table(name)
}

pub fn f(name: &str) -> Field {
    registry().field(name)
}

pub fn p(name: &str) -> Param {
    registry().param(name)
}

pub fn pg(builder: QueryBuilder) -> RenderResult {
    builder.must_render(&PostgresDialect::new())
}

pub fn sql(builder: QueryBuilder, dialect: &dyn Dialect) -> String {
    builder.must_render(dialect).sql
}

/// All four providers, in a fixed order.
pub fn dialects() -> Vec<Box<dyn Dialect>> {
    vec![
        Box::new(PostgresDialect::new()),
        Box::new(SqliteDialect::new()),
        Box::new(MySqlDialect::new()),
        Box::new(SqlServerDialect::new()),
    ]
}
