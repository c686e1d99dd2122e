//! Projection expressions.

use super::Renderer;
use crate::ast::{
    CaseExpr, Expression, Field, FieldExpression, Operand, Param, WindowExpr, WindowFunc,
};
use crate::dialect::{require, Feature};
use crate::error::{QueryError, Result};

impl Renderer<'_> {
    /// Renders an expression and its `AS "alias"`, if any.
    pub(super) fn field_expression(&mut self, expr: &FieldExpression) -> Result<String> {
        let mut sql = self.expression(expr.expr())?;
        if let Some(alias) = expr.alias_name() {
            sql.push_str(" AS ");
            sql.push_str(&self.ident(alias));
        }
        Ok(sql)
    }

    fn expression(&mut self, expr: &Expression) -> Result<String> {
        match expr {
            Expression::Field(field) => Ok(self.field(field)),
            Expression::Aggregate { func, field } => self.aggregate(*func, field.as_ref()),
            Expression::Math { func, field, arg } => {
                func.check_arity(arg.is_some())?;
                let field = self.field(field);
                Ok(match arg {
                    Some(arg) => {
                        let arg = self.placeholder(arg);
                        format!("{}({field}, {arg})", func.as_str())
                    }
                    None => format!("{}({field})", func.as_str()),
                })
            }
            Expression::String { func, args } => {
                let args = self.operands(args);
                Ok(self.dialect.string_function(*func, &args))
            }
            Expression::Date { func, field } => {
                let field = field.as_ref().map(|f| self.field(f));
                self.dialect.date_function(*func, field.as_deref())
            }
            Expression::Case(case) => self.case(case),
            Expression::Coalesce(operands) => {
                if operands.len() < 2 {
                    return Err(QueryError::structural(
                        "COALESCE requires at least two operands",
                    ));
                }
                Ok(format!("COALESCE({})", self.operands(operands).join(", ")))
            }
            Expression::NullIf(a, b) => {
                let a = self.operand(a);
                let b = self.operand(b);
                Ok(format!("NULLIF({a}, {b})"))
            }
            Expression::Cast { field, target } => Ok(format!(
                "CAST({} AS {})",
                self.field(field),
                self.dialect.cast_type(*target)
            )),
            Expression::Binary { field, op, param } => {
                if op.is_vector() {
                    require(self.dialect, Feature::VectorOperators)?;
                }
                let field = self.field(field);
                let placeholder = self.placeholder(param);
                Ok(format!("{field} {} {placeholder}", op.as_str()))
            }
            Expression::Window(window) => self.window(window),
        }
    }

    fn operand(&mut self, operand: &Operand) -> String {
        match operand {
            Operand::Field(field) => self.field(field),
            Operand::Param(param) => self.placeholder(param),
        }
    }

    fn operands(&mut self, operands: &[Operand]) -> Vec<String> {
        operands.iter().map(|o| self.operand(o)).collect()
    }

    fn case(&mut self, case: &CaseExpr) -> Result<String> {
        if case.whens.is_empty() {
            return Err(QueryError::structural(
                "CASE requires at least one WHEN arm",
            ));
        }
        let mut sql = String::from("CASE");
        for (condition, result) in &case.whens {
            let condition = self.condition(condition, false)?;
            let result = self.operand(result);
            sql.push_str(&format!(" WHEN {condition} THEN {result}"));
        }
        if let Some(otherwise) = &case.otherwise {
            let otherwise = self.operand(otherwise);
            sql.push_str(&format!(" ELSE {otherwise}"));
        }
        sql.push_str(" END");
        Ok(sql)
    }

    fn window(&mut self, window: &WindowExpr) -> Result<String> {
        require(self.dialect, Feature::WindowFunctions)?;
        let func = match &window.func {
            WindowFunc::RowNumber => String::from("ROW_NUMBER()"),
            WindowFunc::Rank => String::from("RANK()"),
            WindowFunc::DenseRank => String::from("DENSE_RANK()"),
            WindowFunc::Ntile(buckets) => format!("NTILE({})", self.placeholder(buckets)),
            WindowFunc::Lag { field, offset } => self.offset_window("LAG", field, offset.as_ref()),
            WindowFunc::Lead { field, offset } => {
                self.offset_window("LEAD", field, offset.as_ref())
            }
            WindowFunc::FirstValue(field) => format!("FIRST_VALUE({})", self.field(field)),
            WindowFunc::LastValue(field) => format!("LAST_VALUE({})", self.field(field)),
            WindowFunc::Aggregate(func, field) => self.aggregate(*func, field.as_ref())?,
        };

        let mut over = Vec::new();
        if !window.partition_by.is_empty() {
            over.push(format!("PARTITION BY {}", self.field_list(&window.partition_by)));
        }
        if !window.order_by.is_empty() {
            over.push(format!("ORDER BY {}", self.ordering(&window.order_by)?));
        }
        Ok(format!("{func} OVER ({})", over.join(" ")))
    }

    fn offset_window(&mut self, name: &str, field: &Field, offset: Option<&Param>) -> String {
        let field = self.field(field);
        match offset {
            Some(offset) => {
                let offset = self.placeholder(offset);
                format!("{name}({field}, {offset})")
            }
            None => format!("{name}({field})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{
        cond, AggregateFunc, BinaryOp, CastType, DatePart, MathFunc, Operator, OrderBy,
        StringFunc,
    };
    use crate::dialect::{MySqlDialect, PostgresDialect, SqliteDialect};

    fn f(name: &str) -> Field {
        Field::new(name)
    }

    fn p(name: &str) -> Param {
        Param::try_named(name).unwrap()
    }

    fn pg(expr: &FieldExpression) -> String {
        let dialect = PostgresDialect::new();
        Renderer::new(&dialect).field_expression(expr).unwrap()
    }

    #[test]
    fn aliased_aggregate() {
        let expr = FieldExpression::aggregate(AggregateFunc::Sum, f("score")).alias("total");
        assert_eq!(pg(&expr), "SUM(\"score\") AS \"total\"");
    }

    #[test]
    fn math_with_argument() {
        let expr = FieldExpression::math(MathFunc::Round, f("price"), Some(p("digits")));
        assert_eq!(pg(&expr), "ROUND(\"price\", :digits)");
    }

    #[test]
    fn case_expression() {
        let case = CaseExpr::new()
            .when(cond(f("age"), Operator::Lt, p("adult")), p("minor_label"))
            .otherwise(p("adult_label"));
        assert_eq!(
            pg(&FieldExpression::case(case)),
            "CASE WHEN \"age\" < :adult THEN :minor_label ELSE :adult_label END"
        );
    }

    #[test]
    fn empty_case_is_structural() {
        let dialect = PostgresDialect::new();
        let err = Renderer::new(&dialect)
            .field_expression(&FieldExpression::case(CaseExpr::new()))
            .unwrap_err();
        assert!(matches!(err, QueryError::Structural(_)));
    }

    #[test]
    fn coalesce_and_nullif() {
        let expr = FieldExpression::coalesce(vec![f("nickname").into(), p("fallback").into()]);
        assert_eq!(pg(&expr), "COALESCE(\"nickname\", :fallback)");
        let expr = FieldExpression::null_if(f("score"), p("zero"));
        assert_eq!(pg(&expr), "NULLIF(\"score\", :zero)");
    }

    #[test]
    fn cast_uses_dialect_type_names() {
        let expr = FieldExpression::cast(f("age"), CastType::Text);
        assert_eq!(pg(&expr), "CAST(\"age\" AS TEXT)");
        let mysql = MySqlDialect::new();
        assert_eq!(
            Renderer::new(&mysql).field_expression(&expr).unwrap(),
            "CAST(`age` AS CHAR)"
        );
    }

    #[test]
    fn vector_distance_is_postgres_only() {
        let expr = FieldExpression::binary(f("embedding"), BinaryOp::CosineDistance, p("query"));
        assert_eq!(pg(&expr), "\"embedding\" <=> :query");
        let sqlite = SqliteDialect::new();
        assert!(Renderer::new(&sqlite).field_expression(&expr).unwrap_err().is_render());
    }

    #[test]
    fn string_functions_follow_dialect() {
        let expr = FieldExpression::string(StringFunc::Concat, vec![f("a").into(), f("b").into()]);
        assert_eq!(pg(&expr), "CONCAT(\"a\", \"b\")");
        let sqlite = SqliteDialect::new();
        assert_eq!(
            Renderer::new(&sqlite).field_expression(&expr).unwrap(),
            "(\"a\" || \"b\")"
        );
    }

    #[test]
    fn date_extract() {
        let expr = FieldExpression::extract(DatePart::Year, f("created_at"));
        assert_eq!(pg(&expr), "EXTRACT(YEAR FROM \"created_at\")");
    }

    #[test]
    fn window_function() {
        let window = WindowExpr::new(WindowFunc::RowNumber)
            .partition_by(f("user_id"))
            .order_by(OrderBy::desc(f("score")));
        assert_eq!(
            pg(&FieldExpression::window(window).alias("rank_in_user")),
            "ROW_NUMBER() OVER (PARTITION BY \"user_id\" ORDER BY \"score\" DESC) AS \"rank_in_user\""
        );
    }

    #[test]
    fn lag_with_offset() {
        let window = WindowExpr::new(WindowFunc::Lag {
            field: f("score"),
            offset: Some(p("step")),
        });
        assert_eq!(
            pg(&FieldExpression::window(window)),
            "LAG(\"score\", :step) OVER ()"
        );
    }
}
