//! Abstract Syntax Tree (AST) types for queries.

mod condition;
mod expression;
mod operator;
mod query;
mod refs;

pub use condition::{
    agg_cond, and, between, cond, field_cmp, is_not_null, is_null, not_between, or, sub_cond,
    sub_exists, try_agg_cond, try_and, try_field_cmp, try_or, try_sub_cond, try_sub_exists,
    AggregateCondition, BetweenCondition, Condition, ConditionGroup, ConditionItem,
    FieldComparison, Subquery, SubqueryCondition,
};
pub use expression::{
    CaseExpr, CastType, DateFunc, DatePart, Expression, FieldExpression, MathFunc, Operand,
    StringFunc, WindowExpr, WindowFunc,
};
pub use operator::{
    AggregateFunc, BinaryOp, JoinKind, Logic, NullOrdering, Operation, Operator, OrderDirection,
};
pub use query::{ConflictAction, Join, OnConflict, OrderBy, Query, RowLock};
pub use refs::{Field, Param, ParamKind, Table};
