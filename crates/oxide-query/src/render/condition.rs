//! Recursive descent over the condition tree.

use super::Renderer;
use crate::ast::{
    AggregateCondition, AggregateFunc, BetweenCondition, Condition, ConditionGroup,
    ConditionItem, Field, FieldComparison, SubqueryCondition,
};
use crate::dialect::{require, Feature};
use crate::error::{QueryError, Result};

impl Renderer<'_> {
    /// Renders a condition. Groups are parenthesized only when `nested`.
    pub(super) fn condition(&mut self, item: &ConditionItem, nested: bool) -> Result<String> {
        match item {
            ConditionItem::Condition(c) => self.simple_condition(c),
            ConditionItem::Group(g) => self.group(g, nested),
            ConditionItem::FieldComparison(c) => Ok(self.field_comparison(c)),
            ConditionItem::Subquery(c) => self.subquery_condition(c),
            ConditionItem::Between(c) => Ok(self.between(c)),
        }
    }

    fn group(&mut self, group: &ConditionGroup, nested: bool) -> Result<String> {
        let mut parts = Vec::with_capacity(group.items().len());
        for item in group.items() {
            parts.push(self.condition(item, true)?);
        }
        let joined = parts.join(&format!(" {} ", group.logic().as_str()));
        if nested {
            Ok(format!("({joined})"))
        } else {
            Ok(joined)
        }
    }

    fn simple_condition(&mut self, condition: &Condition) -> Result<String> {
        let operator = condition.operator;
        if operator.is_existence() {
            return Err(QueryError::OperatorMismatch {
                operator: operator.as_str(),
                context: "a field condition (use an existence subquery condition)",
            });
        }
        if operator.is_case_insensitive_like() {
            require(self.dialect, Feature::CaseInsensitiveLike)?;
        }

        let field = self.field(&condition.field);
        if !operator.takes_param() {
            return Ok(format!("{field} {}", operator.as_str()));
        }
        let Some(param) = &condition.param else {
            return Err(QueryError::structural(format!(
                "operator {} requires a parameter",
                operator.as_str()
            )));
        };
        let placeholder = self.placeholder(param);
        if operator.is_membership() {
            Ok(format!("{field} {} ({placeholder})", operator.as_str()))
        } else {
            Ok(format!("{field} {} {placeholder}", operator.as_str()))
        }
    }

    pub(super) fn field_comparison(&self, comparison: &FieldComparison) -> String {
        format!(
            "{} {} {}",
            self.field(comparison.left()),
            comparison.operator().as_str(),
            self.field(comparison.right())
        )
    }

    fn between(&mut self, between: &BetweenCondition) -> String {
        let field = self.field(&between.field);
        let low = self.placeholder(&between.low);
        let high = self.placeholder(&between.high);
        let keyword = if between.negated {
            "NOT BETWEEN"
        } else {
            "BETWEEN"
        };
        format!("{field} {keyword} {low} AND {high}")
    }

    fn subquery_condition(&mut self, condition: &SubqueryCondition) -> Result<String> {
        let operator = condition.operator().as_str();
        let field = condition.field().map(|f| self.field(f));
        let inner = self.subquery(condition.subquery().query())?;
        Ok(match field {
            Some(field) => format!("{field} {operator} ({inner})"),
            None => format!("{operator} ({inner})"),
        })
    }

    pub(super) fn aggregate_condition(&mut self, condition: &AggregateCondition) -> Result<String> {
        let aggregate = self.aggregate(condition.func(), condition.field())?;
        let placeholder = self.placeholder(condition.param());
        Ok(format!(
            "{aggregate} {} {placeholder}",
            condition.operator().as_str()
        ))
    }

    /// `AGG(field)`, `COUNT(DISTINCT field)`, or `COUNT(*)`.
    pub(super) fn aggregate(&self, func: AggregateFunc, field: Option<&Field>) -> Result<String> {
        match (func, field) {
            (AggregateFunc::CountDistinct, Some(f)) => {
                Ok(format!("COUNT(DISTINCT {})", self.field(f)))
            }
            (AggregateFunc::Count, None) => Ok(String::from("COUNT(*)")),
            (_, Some(f)) => Ok(format!("{}({})", func.as_str(), self.field(f))),
            (AggregateFunc::CountDistinct, None) => Err(QueryError::structural(
                "COUNT(DISTINCT) requires a field",
            )),
            (_, None) => Err(QueryError::structural(format!(
                "{} requires a field",
                func.as_str()
            ))),
        }
    }
}
