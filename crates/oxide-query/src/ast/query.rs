//! The query root node.

use std::collections::BTreeMap;

use super::condition::{AggregateCondition, ConditionItem, FieldComparison};
use super::expression::FieldExpression;
use super::operator::{JoinKind, NullOrdering, Operation, OrderDirection};
use super::refs::{Field, Param, Table};

/// A JOIN clause. The ON condition always compares two fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Join {
    /// The join kind.
    pub kind: JoinKind,
    /// The joined table.
    pub table: Table,
    /// The ON condition.
    pub on: FieldComparison,
}

/// An ORDER BY entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    /// The ordered field.
    pub field: Field,
    /// The direction.
    pub direction: OrderDirection,
    /// Null ordering (optional).
    pub nulls: Option<NullOrdering>,
}

impl OrderBy {
    /// Ascending order on `field`.
    #[must_use]
    pub const fn asc(field: Field) -> Self {
        Self {
            field,
            direction: OrderDirection::Asc,
            nulls: None,
        }
    }

    /// Descending order on `field`.
    #[must_use]
    pub const fn desc(field: Field) -> Self {
        Self {
            field,
            direction: OrderDirection::Desc,
            nulls: None,
        }
    }

    /// Sets the null ordering.
    #[must_use]
    pub const fn nulls(mut self, nulls: NullOrdering) -> Self {
        self.nulls = Some(nulls);
        self
    }
}

/// What an upsert does when the conflict target is hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictAction {
    /// `DO NOTHING`.
    DoNothing,
    /// `DO UPDATE SET field = :param, ...`.
    DoUpdate(BTreeMap<Field, Param>),
}

/// `ON CONFLICT (columns) DO ...`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnConflict {
    /// The conflict target columns.
    pub columns: Vec<Field>,
    /// The action taken.
    pub action: ConflictAction,
}

/// Row locking for reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowLock {
    /// `FOR UPDATE`.
    Update,
    /// `FOR SHARE`.
    Share,
}

impl RowLock {
    /// Returns the SQL representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Update => "FOR UPDATE",
            Self::Share => "FOR SHARE",
        }
    }
}

/// A query tree. Only a [`QueryBuilder`](crate::QueryBuilder) can
/// assemble one; after `build()` it is read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub(crate) operation: Operation,
    pub(crate) target: Table,
    pub(crate) distinct: bool,
    pub(crate) distinct_on: Vec<Field>,
    pub(crate) fields: Vec<Field>,
    pub(crate) select_exprs: Vec<FieldExpression>,
    pub(crate) where_clause: Option<ConditionItem>,
    pub(crate) updates: BTreeMap<Field, Param>,
    pub(crate) values: Vec<BTreeMap<Field, Param>>,
    pub(crate) joins: Vec<Join>,
    pub(crate) group_by: Vec<Field>,
    pub(crate) having: Vec<AggregateCondition>,
    pub(crate) ordering: Vec<OrderBy>,
    pub(crate) limit: Option<u64>,
    pub(crate) offset: Option<u64>,
    pub(crate) returning: Vec<Field>,
    pub(crate) on_conflict: Option<OnConflict>,
    pub(crate) lock: Option<RowLock>,
}

impl Query {
    pub(crate) const fn new(operation: Operation, target: Table) -> Self {
        Self {
            operation,
            target,
            distinct: false,
            distinct_on: Vec::new(),
            fields: Vec::new(),
            select_exprs: Vec::new(),
            where_clause: None,
            updates: BTreeMap::new(),
            values: Vec::new(),
            joins: Vec::new(),
            group_by: Vec::new(),
            having: Vec::new(),
            ordering: Vec::new(),
            limit: None,
            offset: None,
            returning: Vec::new(),
            on_conflict: None,
            lock: None,
        }
    }

    /// Returns the statement kind.
    #[must_use]
    pub const fn operation(&self) -> Operation {
        self.operation
    }

    /// Returns the target table.
    #[must_use]
    pub const fn target(&self) -> &Table {
        &self.target
    }

    /// Returns `true` for SELECT DISTINCT.
    #[must_use]
    pub const fn is_distinct(&self) -> bool {
        self.distinct
    }

    /// Returns the DISTINCT ON fields.
    #[must_use]
    pub fn distinct_on(&self) -> &[Field] {
        &self.distinct_on
    }

    /// Returns the projected fields.
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Returns the projected expressions.
    #[must_use]
    pub fn select_exprs(&self) -> &[FieldExpression] {
        &self.select_exprs
    }

    /// Returns the WHERE condition.
    #[must_use]
    pub const fn where_clause(&self) -> Option<&ConditionItem> {
        self.where_clause.as_ref()
    }

    /// Returns the UPDATE assignments.
    #[must_use]
    pub const fn updates(&self) -> &BTreeMap<Field, Param> {
        &self.updates
    }

    /// Returns the INSERT rows.
    #[must_use]
    pub fn values(&self) -> &[BTreeMap<Field, Param>] {
        &self.values
    }

    /// Returns the joins in declaration order.
    #[must_use]
    pub fn joins(&self) -> &[Join] {
        &self.joins
    }

    /// Returns the GROUP BY fields.
    #[must_use]
    pub fn group_by(&self) -> &[Field] {
        &self.group_by
    }

    /// Returns the HAVING conditions, combined with AND.
    #[must_use]
    pub fn having(&self) -> &[AggregateCondition] {
        &self.having
    }

    /// Returns the ORDER BY entries.
    #[must_use]
    pub fn ordering(&self) -> &[OrderBy] {
        &self.ordering
    }

    /// Returns the LIMIT.
    #[must_use]
    pub const fn limit(&self) -> Option<u64> {
        self.limit
    }

    /// Returns the OFFSET.
    #[must_use]
    pub const fn offset(&self) -> Option<u64> {
        self.offset
    }

    /// Returns the RETURNING fields.
    #[must_use]
    pub fn returning(&self) -> &[Field] {
        &self.returning
    }

    /// Returns the upsert clause.
    #[must_use]
    pub const fn on_conflict(&self) -> Option<&OnConflict> {
        self.on_conflict.as_ref()
    }

    /// Returns the row lock.
    #[must_use]
    pub const fn lock(&self) -> Option<RowLock> {
        self.lock
    }
}
