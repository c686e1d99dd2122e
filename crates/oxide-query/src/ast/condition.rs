//! The condition tree used by WHERE, ON, CASE, and HAVING.
//!
//! Shape invariants are enforced here, when nodes are created, so the
//! renderer never sees an empty group or a subquery condition whose
//! field does not match its operator. Each fallible constructor has a
//! `try_*` form for untrusted input and a panicking form for literals.

use super::operator::{AggregateFunc, Logic, Operator};
use super::query::Query;
use super::refs::{Field, Param};
use crate::error::{QueryError, Result};

/// `field <op> :param`, or `field IS [NOT] NULL`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    /// The compared field.
    pub field: Field,
    /// The operator.
    pub operator: Operator,
    /// The bound parameter; unused by operators that take none.
    pub param: Option<Param>,
}

/// Items combined with AND or OR. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionGroup {
    logic: Logic,
    items: Vec<ConditionItem>,
}

impl ConditionGroup {
    /// Creates a group.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Structural`] if `items` is empty.
    pub fn try_new(logic: Logic, items: impl IntoIterator<Item = ConditionItem>) -> Result<Self> {
        let items: Vec<ConditionItem> = items.into_iter().collect();
        if items.is_empty() {
            return Err(QueryError::structural(format!(
                "{} requires at least one condition",
                logic.as_str()
            )));
        }
        Ok(Self { logic, items })
    }

    /// Returns how the items are combined.
    #[must_use]
    pub const fn logic(&self) -> Logic {
        self.logic
    }

    /// Returns the items in the order they were supplied.
    #[must_use]
    pub fn items(&self) -> &[ConditionItem] {
        &self.items
    }

    /// `first AND second`; never empty, so it cannot fail.
    pub(crate) fn and_pair(first: ConditionItem, second: ConditionItem) -> Self {
        Self {
            logic: Logic::And,
            items: vec![first, second],
        }
    }

    pub(crate) fn push(&mut self, item: ConditionItem) {
        self.items.push(item);
    }
}

/// `left <op> right`, comparing two fields. Used for JOIN ... ON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldComparison {
    left: Field,
    operator: Operator,
    right: Field,
}

impl FieldComparison {
    /// Returns the left field.
    #[must_use]
    pub const fn left(&self) -> &Field {
        &self.left
    }

    /// Returns the operator.
    #[must_use]
    pub const fn operator(&self) -> Operator {
        self.operator
    }

    /// Returns the right field.
    #[must_use]
    pub const fn right(&self) -> &Field {
        &self.right
    }
}

/// An already-built query embedded in another one.
///
/// Wraps a finished [`Query`] by value, so a subquery can never refer
/// back to a builder that is still being assembled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subquery(Box<Query>);

impl Subquery {
    /// Wraps a built query.
    #[must_use]
    pub fn new(query: Query) -> Self {
        Self(Box::new(query))
    }

    /// Returns the wrapped query.
    #[must_use]
    pub fn query(&self) -> &Query {
        &self.0
    }
}

impl From<Query> for Subquery {
    fn from(query: Query) -> Self {
        Self::new(query)
    }
}

/// `field [NOT] IN (subquery)` or `[NOT] EXISTS (subquery)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubqueryCondition {
    field: Option<Field>,
    operator: Operator,
    subquery: Subquery,
}

impl SubqueryCondition {
    /// Returns the field; present exactly for `IN` / `NOT IN`.
    #[must_use]
    pub const fn field(&self) -> Option<&Field> {
        self.field.as_ref()
    }

    /// Returns the operator.
    #[must_use]
    pub const fn operator(&self) -> Operator {
        self.operator
    }

    /// Returns the subquery.
    #[must_use]
    pub const fn subquery(&self) -> &Subquery {
        &self.subquery
    }
}

/// `field [NOT] BETWEEN :low AND :high`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BetweenCondition {
    /// The tested field.
    pub field: Field,
    /// Lower bound parameter.
    pub low: Param,
    /// Upper bound parameter.
    pub high: Param,
    /// Whether this is NOT BETWEEN.
    pub negated: bool,
}

/// `AGG(field | *) <op> :param`, for HAVING.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateCondition {
    func: AggregateFunc,
    field: Option<Field>,
    operator: Operator,
    param: Param,
}

impl AggregateCondition {
    /// Returns the aggregate function.
    #[must_use]
    pub const fn func(&self) -> AggregateFunc {
        self.func
    }

    /// Returns the aggregated field; `None` means `*`.
    #[must_use]
    pub const fn field(&self) -> Option<&Field> {
        self.field.as_ref()
    }

    /// Returns the comparison operator.
    #[must_use]
    pub const fn operator(&self) -> Operator {
        self.operator
    }

    /// Returns the compared parameter.
    #[must_use]
    pub const fn param(&self) -> &Param {
        &self.param
    }
}

/// Any boolean-valued node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConditionItem {
    Condition(Condition),
    Group(ConditionGroup),
    FieldComparison(FieldComparison),
    Subquery(SubqueryCondition),
    Between(BetweenCondition),
}

impl From<Condition> for ConditionItem {
    fn from(c: Condition) -> Self {
        Self::Condition(c)
    }
}

impl From<ConditionGroup> for ConditionItem {
    fn from(g: ConditionGroup) -> Self {
        Self::Group(g)
    }
}

impl From<FieldComparison> for ConditionItem {
    fn from(c: FieldComparison) -> Self {
        Self::FieldComparison(c)
    }
}

impl From<SubqueryCondition> for ConditionItem {
    fn from(c: SubqueryCondition) -> Self {
        Self::Subquery(c)
    }
}

impl From<BetweenCondition> for ConditionItem {
    fn from(c: BetweenCondition) -> Self {
        Self::Between(c)
    }
}

/// Creates `field <op> :param`. Cannot fail: the pieces were validated
/// when they were created.
#[must_use]
pub fn cond(field: Field, operator: Operator, param: Param) -> Condition {
    Condition {
        field,
        operator,
        param: Some(param),
    }
}

/// Creates `field IS NULL`.
#[must_use]
pub const fn is_null(field: Field) -> Condition {
    Condition {
        field,
        operator: Operator::IsNull,
        param: None,
    }
}

/// Creates `field IS NOT NULL`.
#[must_use]
pub const fn is_not_null(field: Field) -> Condition {
    Condition {
        field,
        operator: Operator::IsNotNull,
        param: None,
    }
}

/// Combines items with AND.
///
/// # Errors
///
/// Returns [`QueryError::Structural`] if `items` is empty.
pub fn try_and(items: impl IntoIterator<Item = ConditionItem>) -> Result<ConditionGroup> {
    ConditionGroup::try_new(Logic::And, items)
}

/// Combines items with OR.
///
/// # Errors
///
/// Returns [`QueryError::Structural`] if `items` is empty.
pub fn try_or(items: impl IntoIterator<Item = ConditionItem>) -> Result<ConditionGroup> {
    ConditionGroup::try_new(Logic::Or, items)
}

/// Combines items with AND.
///
/// # Panics
///
/// Panics if `items` is empty.
#[must_use]
pub fn and(items: impl IntoIterator<Item = ConditionItem>) -> ConditionGroup {
    try_and(items).unwrap_or_else(|e| panic!("{e}"))
}

/// Combines items with OR.
///
/// # Panics
///
/// Panics if `items` is empty.
#[must_use]
pub fn or(items: impl IntoIterator<Item = ConditionItem>) -> ConditionGroup {
    try_or(items).unwrap_or_else(|e| panic!("{e}"))
}

/// Creates `left <op> right` between two fields.
///
/// # Errors
///
/// Returns [`QueryError::OperatorMismatch`] unless `operator` is one of
/// `=`, `!=`, `<`, `<=`, `>`, `>=`.
pub fn try_field_cmp(left: Field, operator: Operator, right: Field) -> Result<FieldComparison> {
    if !operator.is_comparison() {
        return Err(QueryError::OperatorMismatch {
            operator: operator.as_str(),
            context: "a field comparison",
        });
    }
    Ok(FieldComparison {
        left,
        operator,
        right,
    })
}

/// Creates `left <op> right` between two fields.
///
/// # Panics
///
/// Panics unless `operator` is a plain comparison.
#[must_use]
pub fn field_cmp(left: Field, operator: Operator, right: Field) -> FieldComparison {
    try_field_cmp(left, operator, right).unwrap_or_else(|e| panic!("{e}"))
}

/// Creates `field [NOT] IN (subquery)`.
///
/// # Errors
///
/// Returns [`QueryError::OperatorMismatch`] unless `operator` is `IN` or
/// `NOT IN`; existence checks take no field, use [`try_sub_exists`].
pub fn try_sub_cond(
    field: Field,
    operator: Operator,
    subquery: impl Into<Subquery>,
) -> Result<SubqueryCondition> {
    if !operator.is_membership() {
        return Err(QueryError::OperatorMismatch {
            operator: operator.as_str(),
            context: "a field subquery condition (use IN or NOT IN)",
        });
    }
    Ok(SubqueryCondition {
        field: Some(field),
        operator,
        subquery: subquery.into(),
    })
}

/// Creates `field [NOT] IN (subquery)`.
///
/// # Panics
///
/// Panics unless `operator` is `IN` or `NOT IN`.
#[must_use]
pub fn sub_cond(field: Field, operator: Operator, subquery: impl Into<Subquery>) -> SubqueryCondition {
    try_sub_cond(field, operator, subquery).unwrap_or_else(|e| panic!("{e}"))
}

/// Creates `[NOT] EXISTS (subquery)`.
///
/// # Errors
///
/// Returns [`QueryError::OperatorMismatch`] unless `operator` is `EXISTS`
/// or `NOT EXISTS`.
pub fn try_sub_exists(operator: Operator, subquery: impl Into<Subquery>) -> Result<SubqueryCondition> {
    if !operator.is_existence() {
        return Err(QueryError::OperatorMismatch {
            operator: operator.as_str(),
            context: "an existence subquery condition (use EXISTS or NOT EXISTS)",
        });
    }
    Ok(SubqueryCondition {
        field: None,
        operator,
        subquery: subquery.into(),
    })
}

/// Creates `[NOT] EXISTS (subquery)`.
///
/// # Panics
///
/// Panics unless `operator` is `EXISTS` or `NOT EXISTS`.
#[must_use]
pub fn sub_exists(operator: Operator, subquery: impl Into<Subquery>) -> SubqueryCondition {
    try_sub_exists(operator, subquery).unwrap_or_else(|e| panic!("{e}"))
}

/// Creates `field BETWEEN :low AND :high`.
#[must_use]
pub const fn between(field: Field, low: Param, high: Param) -> BetweenCondition {
    BetweenCondition {
        field,
        low,
        high,
        negated: false,
    }
}

/// Creates `field NOT BETWEEN :low AND :high`.
#[must_use]
pub const fn not_between(field: Field, low: Param, high: Param) -> BetweenCondition {
    BetweenCondition {
        field,
        low,
        high,
        negated: true,
    }
}

/// Creates `AGG(field | *) <op> :param`.
///
/// # Errors
///
/// Returns [`QueryError::OperatorMismatch`] unless `operator` is a plain
/// comparison.
pub fn try_agg_cond(
    func: AggregateFunc,
    field: Option<Field>,
    operator: Operator,
    param: Param,
) -> Result<AggregateCondition> {
    if !operator.is_comparison() {
        return Err(QueryError::OperatorMismatch {
            operator: operator.as_str(),
            context: "an aggregate condition",
        });
    }
    Ok(AggregateCondition {
        func,
        field,
        operator,
        param,
    })
}

/// Creates `AGG(field | *) <op> :param`.
///
/// # Panics
///
/// Panics unless `operator` is a plain comparison.
#[must_use]
pub fn agg_cond(
    func: AggregateFunc,
    field: Option<Field>,
    operator: Operator,
    param: Param,
) -> AggregateCondition {
    try_agg_cond(func, field, operator, param).unwrap_or_else(|e| panic!("{e}"))
}
