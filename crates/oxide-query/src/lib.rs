//! # oxide-query
//!
//! Schema-validated SQL query trees rendered to parameterized SQL for
//! PostgreSQL, SQLite, MySQL, and SQL Server.
//!
//! This crate provides:
//! - A [`Registry`] built from a schema model, the only way to obtain
//!   [`Table`] and [`Field`] references
//! - A closed condition and expression algebra ([`ConditionItem`],
//!   [`FieldExpression`]) whose shape rules are checked on construction
//! - A sticky-error [`QueryBuilder`] that never panics mid-chain
//! - A render engine that quotes every identifier, emits only
//!   placeholders for values, and reports the parameters to bind
//!
//! ## SQL Injection Prevention
//!
//! Names that reach the SQL text either come from the schema or pass the
//! identifier rules in [`ident`]. Values never do: a [`Param`] carries a
//! name only.
//!
//! ```rust
//! use oxide_query::{Registry, SchemaModel, TableDef};
//!
//! let registry = Registry::from_schema(
//!     &SchemaModel::new().table(TableDef::new("users").column("name", "TEXT")),
//! )
//! .unwrap();
//!
//! let user_input = "users; DROP TABLE users; --";
//! assert!(registry.try_table(user_input).is_err());
//! assert!(registry.try_param("name'--").is_err());
//! ```
//!
//! ## Rendering
//!
//! ```rust
//! use oxide_query::{
//!     and, cond, or, Operator, PostgresDialect, QueryBuilder, Registry, SchemaModel, TableDef,
//! };
//!
//! let registry = Registry::from_schema(
//!     &SchemaModel::new().table(
//!         TableDef::new("users")
//!             .column("id", "BIGINT")
//!             .column("role", "TEXT")
//!             .column("active", "BOOLEAN"),
//!     ),
//! )
//! .unwrap();
//! let f = |name: &str| registry.field(name);
//! let p = |name: &str| registry.param(name);
//!
//! let out = QueryBuilder::select(registry.table("users"))
//!     .fields([f("id")])
//!     .where_clause(or(vec![
//!         and(vec![
//!             cond(f("role"), Operator::Eq, p("role")).into(),
//!             cond(f("active"), Operator::Eq, p("active")).into(),
//!         ])
//!         .into(),
//!         cond(f("role"), Operator::Eq, p("admin")).into(),
//!     ]))
//!     .render(&PostgresDialect::new())
//!     .unwrap();
//!
//! assert_eq!(
//!     out.sql,
//!     r#"SELECT "id" FROM "users" WHERE ("role" = :role AND "active" = :active) OR "role" = :admin"#
//! );
//! assert_eq!(out.required_params, ["role", "active", "admin"]);
//! ```

pub mod ast;
pub mod builder;
pub mod dialect;
pub mod error;
pub mod ident;
pub mod registry;
pub mod render;
pub mod schema;

pub use ast::{
    agg_cond, and, between, cond, field_cmp, is_not_null, is_null, not_between, or, sub_cond,
    sub_exists, try_agg_cond, try_and, try_field_cmp, try_or, try_sub_cond, try_sub_exists,
    AggregateCondition, AggregateFunc, BetweenCondition, BinaryOp, CaseExpr, CastType, Condition,
    ConditionGroup, ConditionItem, ConflictAction, DateFunc, DatePart, Expression, Field,
    FieldComparison, FieldExpression, JoinKind, Logic, MathFunc, NullOrdering, Operand, Operation,
    Operator, OrderBy, OrderDirection, Param, ParamKind, Query, StringFunc, Subquery,
    SubqueryCondition, Table, WindowExpr, WindowFunc,
};
pub use builder::QueryBuilder;
pub use dialect::{
    Dialect, DialectKind, Feature, MySqlDialect, PlaceholderStyle, PostgresDialect,
    SqlServerDialect, SqliteDialect,
};
pub use error::{QueryError, Result};
pub use registry::Registry;
pub use render::{render, RenderResult};
pub use schema::{ColumnDef, SchemaModel, TableDef};
