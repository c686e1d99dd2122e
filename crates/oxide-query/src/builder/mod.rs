//! Sticky-error query builder.
//!
//! A [`QueryBuilder`] accumulates one [`Query`]. Every chained method first
//! checks whether an earlier call already failed; if so it does nothing.
//! Otherwise it checks that the method is legal for the builder's
//! operation and records a [`QueryError::BuilderState`] if not. The chain
//! never panics; the first error surfaces from [`QueryBuilder::build`] or
//! [`QueryBuilder::render`].
//!
//! # Example
//!
//! ```rust
//! use oxide_query::{cond, DialectKind, Operator, QueryBuilder, Registry};
//!
//! let registry = Registry::from_json(
//!     r#"{"tables": [{"name": "users", "columns": [
//!         {"name": "id", "type": "BIGINT"},
//!         {"name": "active", "type": "BOOLEAN"}
//!     ]}]}"#,
//! )
//! .unwrap();
//!
//! let out = QueryBuilder::select(registry.table("users"))
//!     .fields([registry.field("id")])
//!     .where_clause(cond(registry.field("active"), Operator::Eq, registry.param("active")))
//!     .render(DialectKind::Postgres.provider().as_ref())
//!     .unwrap();
//!
//! assert_eq!(out.sql, r#"SELECT "id" FROM "users" WHERE "active" = :active"#);
//! assert_eq!(out.required_params, ["active"]);
//! ```

use std::collections::BTreeMap;

use tracing::debug;

use crate::ast::{
    AggregateCondition, ConditionGroup, ConditionItem, ConflictAction, Field, FieldComparison,
    FieldExpression, Join, JoinKind, NullOrdering, OnConflict, Operation, OrderBy,
    OrderDirection, Param, Query, RowLock, Table,
};
use crate::dialect::Dialect;
use crate::error::{QueryError, Result};
use crate::render::{render, RenderResult};

#[derive(Debug)]
enum State {
    Building(Query),
    Failed(Query, QueryError),
}

/// Fluent builder for one [`Query`].
///
/// Not meant to be shared between threads while it is being assembled;
/// the finished [`Query`] is.
#[derive(Debug)]
#[must_use = "a builder does nothing until build() or render() is called"]
pub struct QueryBuilder {
    state: State,
    owns_where_group: bool,
}

impl QueryBuilder {
    const fn new(operation: Operation, table: Table) -> Self {
        Self {
            state: State::Building(Query::new(operation, table)),
            owns_where_group: false,
        }
    }

    /// Starts a SELECT from `table`.
    pub const fn select(table: Table) -> Self {
        Self::new(Operation::Select, table)
    }

    /// Starts an INSERT into `table`.
    pub const fn insert(table: Table) -> Self {
        Self::new(Operation::Insert, table)
    }

    /// Starts an UPDATE of `table`.
    pub const fn update(table: Table) -> Self {
        Self::new(Operation::Update, table)
    }

    /// Starts a DELETE from `table`.
    pub const fn delete(table: Table) -> Self {
        Self::new(Operation::Delete, table)
    }

    /// Starts a `SELECT COUNT(*)` from `table`.
    pub const fn count(table: Table) -> Self {
        Self::new(Operation::Count, table)
    }

    /// Returns the operation this builder was created for.
    #[must_use]
    pub const fn operation(&self) -> Operation {
        match &self.state {
            State::Building(query) | State::Failed(query, _) => query.operation,
        }
    }

    /// Returns the recorded error, if any.
    #[must_use]
    pub const fn error(&self) -> Option<&QueryError> {
        match &self.state {
            State::Building(_) => None,
            State::Failed(_, error) => Some(error),
        }
    }

    fn apply(
        self,
        method: &'static str,
        allowed: impl FnOnce(Operation) -> bool,
        change: impl FnOnce(&mut Query),
    ) -> Self {
        let state = match self.state {
            State::Building(mut query) => {
                if allowed(query.operation) {
                    change(&mut query);
                    State::Building(query)
                } else {
                    let operation = query.operation.as_str();
                    debug!(method, operation, "Query builder recorded error");
                    State::Failed(query, QueryError::BuilderState { method, operation })
                }
            }
            failed @ State::Failed(..) => failed,
        };
        Self {
            state,
            owns_where_group: self.owns_where_group,
        }
    }

    /// Adds projected fields. SELECT and COUNT only.
    pub fn fields(self, fields: impl IntoIterator<Item = Field>) -> Self {
        self.apply("fields", |op| op.is_read(), |q| q.fields.extend(fields))
    }

    /// Adds a projected expression. SELECT and COUNT only.
    pub fn select_expr(self, expr: impl Into<FieldExpression>) -> Self {
        let expr = expr.into();
        self.apply("select_expr", |op| op.is_read(), |q| q.select_exprs.push(expr))
    }

    /// Adds a WHERE condition. Not available on INSERT.
    ///
    /// The first call sets the clause. The second wraps the clause and the
    /// new condition in an AND group; later calls append to that group, so
    /// repeated calls yield one top-level AND group in call order. A group
    /// passed in by the caller is never modified.
    pub fn where_clause(self, condition: impl Into<ConditionItem>) -> Self {
        let condition = condition.into();
        let had_clause = matches!(&self.state, State::Building(q) if q.where_clause.is_some());
        let owns_group = self.owns_where_group;
        let mut next = self.apply(
            "where_clause",
            |op| op != Operation::Insert,
            |q| {
                q.where_clause = Some(match q.where_clause.take() {
                    None => condition,
                    Some(ConditionItem::Group(mut group)) if owns_group => {
                        group.push(condition);
                        ConditionItem::Group(group)
                    }
                    Some(existing) => ConditionGroup::and_pair(existing, condition).into(),
                });
            },
        );
        next.owns_where_group |= had_clause;
        next
    }

    /// Assigns `field = :param`. UPDATE only.
    pub fn set(self, field: Field, param: Param) -> Self {
        self.apply(
            "set",
            |op| op == Operation::Update,
            |q| {
                q.updates.insert(field, param);
            },
        )
    }

    /// Adds one row of values. INSERT only.
    pub fn values(self, row: impl IntoIterator<Item = (Field, Param)>) -> Self {
        let row: BTreeMap<Field, Param> = row.into_iter().collect();
        self.apply("values", |op| op == Operation::Insert, |q| q.values.push(row))
    }

    fn add_join(self, method: &'static str, kind: JoinKind, table: Table, on: FieldComparison) -> Self {
        self.apply(method, |op| op.is_read(), |q| {
            q.joins.push(Join { kind, table, on });
        })
    }

    /// Adds an `INNER JOIN table ON ...`.
    pub fn join(self, table: Table, on: FieldComparison) -> Self {
        self.add_join("join", JoinKind::Inner, table, on)
    }

    /// Adds a `LEFT JOIN table ON ...`.
    pub fn left_join(self, table: Table, on: FieldComparison) -> Self {
        self.add_join("left_join", JoinKind::Left, table, on)
    }

    /// Adds a `RIGHT JOIN table ON ...`.
    pub fn right_join(self, table: Table, on: FieldComparison) -> Self {
        self.add_join("right_join", JoinKind::Right, table, on)
    }

    /// Adds a `FULL JOIN table ON ...`.
    pub fn full_join(self, table: Table, on: FieldComparison) -> Self {
        self.add_join("full_join", JoinKind::Full, table, on)
    }

    /// Adds an ORDER BY entry.
    pub fn order_by(self, field: Field, direction: OrderDirection) -> Self {
        self.apply("order_by", |op| op.is_read(), |q| {
            q.ordering.push(OrderBy {
                field,
                direction,
                nulls: None,
            });
        })
    }

    /// Adds an ORDER BY entry with explicit null placement.
    pub fn order_by_nulls(self, field: Field, direction: OrderDirection, nulls: NullOrdering) -> Self {
        self.apply("order_by", |op| op.is_read(), |q| {
            q.ordering.push(OrderBy {
                field,
                direction,
                nulls: Some(nulls),
            });
        })
    }

    /// Sets the LIMIT.
    pub fn limit(self, limit: u64) -> Self {
        self.apply("limit", |op| op.is_read(), |q| q.limit = Some(limit))
    }

    /// Sets the OFFSET.
    pub fn offset(self, offset: u64) -> Self {
        self.apply("offset", |op| op.is_read(), |q| q.offset = Some(offset))
    }

    /// Adds GROUP BY fields.
    pub fn group_by(self, fields: impl IntoIterator<Item = Field>) -> Self {
        self.apply("group_by", |op| op.is_read(), |q| q.group_by.extend(fields))
    }

    /// Adds a HAVING condition; several are combined with AND.
    pub fn having(self, condition: AggregateCondition) -> Self {
        self.apply("having", |op| op.is_read(), |q| q.having.push(condition))
    }

    /// Makes this a SELECT DISTINCT.
    pub fn distinct(self) -> Self {
        self.apply("distinct", |op| op.is_read(), |q| q.distinct = true)
    }

    /// Makes this a `SELECT DISTINCT ON (fields)`.
    pub fn distinct_on(self, fields: impl IntoIterator<Item = Field>) -> Self {
        self.apply("distinct_on", |op| op.is_read(), |q| q.distinct_on.extend(fields))
    }

    /// Appends `FOR UPDATE`.
    pub fn for_update(self) -> Self {
        self.apply("for_update", |op| op.is_read(), |q| q.lock = Some(RowLock::Update))
    }

    /// Appends `FOR SHARE`.
    pub fn for_share(self) -> Self {
        self.apply("for_share", |op| op.is_read(), |q| q.lock = Some(RowLock::Share))
    }

    /// Adds RETURNING fields. INSERT, UPDATE, and DELETE only.
    pub fn returning(self, fields: impl IntoIterator<Item = Field>) -> Self {
        self.apply("returning", |op| !op.is_read(), |q| q.returning.extend(fields))
    }

    /// Sets the upsert clause. INSERT only.
    pub fn on_conflict(self, columns: impl IntoIterator<Item = Field>, action: ConflictAction) -> Self {
        let columns: Vec<Field> = columns.into_iter().collect();
        self.apply(
            "on_conflict",
            |op| op == Operation::Insert,
            |q| q.on_conflict = Some(OnConflict { columns, action }),
        )
    }

    /// Finishes the query.
    ///
    /// # Errors
    ///
    /// Returns the first error recorded by a chained method.
    pub fn build(self) -> Result<Query> {
        match self.state {
            State::Building(query) => Ok(query),
            State::Failed(_, error) => Err(error),
        }
    }

    /// Finishes the query.
    ///
    /// # Panics
    ///
    /// Panics with the recorded error, if any.
    #[must_use]
    pub fn must_build(self) -> Query {
        self.build().unwrap_or_else(|e| panic!("{e}"))
    }

    /// Finishes the query and renders it for `dialect`.
    ///
    /// # Errors
    ///
    /// Returns the recorded builder error, or any render error.
    pub fn render(self, dialect: &dyn Dialect) -> Result<RenderResult> {
        render(&self.build()?, dialect)
    }

    /// Finishes the query and renders it for `dialect`.
    ///
    /// # Panics
    ///
    /// Panics with the recorded builder error or a render error.
    #[must_use]
    pub fn must_render(self, dialect: &dyn Dialect) -> RenderResult {
        self.render(dialect).unwrap_or_else(|e| panic!("{e}"))
    }
}
