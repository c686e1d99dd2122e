//! Render Engine.
//!
//! Walks a [`Query`] tree and emits parameterized SQL for one [`Dialect`],
//! together with the ordered list of parameter names the caller must bind.
//! The engine never inspects which dialect it holds; everything that
//! differs between databases goes through the [`Dialect`] trait.
//!
//! Rendering is a pure function of the query and the dialect, so a built
//! query may be rendered from many threads at once.

mod condition;
mod expression;
mod params;

use std::collections::BTreeMap;

use tracing::{debug, trace};

use crate::ast::{
    ConflictAction, Field, Join, JoinKind, OnConflict, Operation, OrderBy, Param, Query,
};
use crate::dialect::{require, Dialect, Feature};
use crate::error::{QueryError, Result};
use params::ParamCollector;

/// The SQL text and parameter names produced by a render pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderResult {
    /// The parameterized SQL statement.
    pub sql: String,
    /// Each parameter name exactly once, in first-occurrence order.
    pub required_params: Vec<String>,
    /// Every placeholder emission in statement order, repeats included.
    ///
    /// Drivers binding `?` placeholders by position bind in this order.
    pub param_occurrences: Vec<String>,
}

/// Renders `query` for `dialect`.
///
/// # Errors
///
/// Returns [`QueryError::Render`] if the query uses a construct the dialect
/// cannot express, [`QueryError::Structural`] if the query is missing a
/// clause its operation requires, or [`QueryError::OperatorMismatch`] for
/// an operator placed where it cannot render.
pub fn render(query: &Query, dialect: &dyn Dialect) -> Result<RenderResult> {
    let mut renderer = Renderer::new(dialect);
    let sql = renderer.statement(query)?;
    let (required_params, param_occurrences) = renderer.params.finish()?;

    debug!(
        dialect = dialect.name(),
        operation = query.operation().as_str(),
        params = required_params.len(),
        "Rendered query"
    );
    Ok(RenderResult {
        sql,
        required_params,
        param_occurrences,
    })
}

impl Query {
    /// Renders this query for `dialect`. See [`render`].
    ///
    /// # Errors
    ///
    /// Same as [`render`].
    pub fn render(&self, dialect: &dyn Dialect) -> Result<RenderResult> {
        render(self, dialect)
    }
}

/// State of one render pass. Subqueries reuse the same renderer so their
/// parameters land in the same collector.
pub(crate) struct Renderer<'d> {
    dialect: &'d dyn Dialect,
    params: ParamCollector,
    depth: usize,
}

impl<'d> Renderer<'d> {
    fn new(dialect: &'d dyn Dialect) -> Self {
        Self {
            dialect,
            params: ParamCollector::new(),
            depth: 0,
        }
    }

    fn statement(&mut self, query: &Query) -> Result<String> {
        match query.operation() {
            Operation::Select | Operation::Count => self.select(query),
            Operation::Insert => self.insert(query),
            Operation::Update => self.update(query),
            Operation::Delete => self.delete(query),
        }
    }

    fn subquery(&mut self, query: &Query) -> Result<String> {
        self.depth += 1;
        trace!(
            depth = self.depth,
            operation = query.operation().as_str(),
            table = query.target().name(),
            "Rendering subquery"
        );
        let sql = self.statement(query);
        self.depth -= 1;
        sql
    }

    fn ident(&self, name: &str) -> String {
        self.dialect.quote_identifier(name)
    }

    /// A field as a value, qualified when it carries a table.
    fn field(&self, field: &Field) -> String {
        match field.table() {
            Some(table) => format!("{}.{}", self.ident(table), self.ident(field.name())),
            None => self.ident(field.name()),
        }
    }

    /// A field as an assignment target, never qualified.
    fn column(&self, field: &Field) -> String {
        self.ident(field.name())
    }

    fn field_list(&self, fields: &[Field]) -> String {
        fields
            .iter()
            .map(|f| self.field(f))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn placeholder(&mut self, param: &Param) -> String {
        self.params.placeholder(self.dialect, param)
    }

    fn select(&mut self, query: &Query) -> Result<String> {
        let mut sql = String::from("SELECT ");

        if !query.distinct_on().is_empty() {
            require(self.dialect, Feature::DistinctOn)?;
            sql.push_str("DISTINCT ON (");
            sql.push_str(&self.field_list(query.distinct_on()));
            sql.push_str(") ");
        } else if query.is_distinct() {
            sql.push_str("DISTINCT ");
        }

        if let Some(top) = self.dialect.top_clause(query.limit(), query.offset()) {
            sql.push_str(&top);
            sql.push(' ');
        }

        sql.push_str(&self.projection(query)?);
        sql.push_str(" FROM ");
        sql.push_str(&self.ident(query.target().name()));

        for join in query.joins() {
            sql.push(' ');
            sql.push_str(&self.join(join)?);
        }

        self.where_clause(&mut sql, query)?;

        if !query.group_by().is_empty() {
            sql.push_str(" GROUP BY ");
            sql.push_str(&self.field_list(query.group_by()));
        }

        if !query.having().is_empty() {
            if query.group_by().is_empty() {
                return Err(QueryError::structural("HAVING requires GROUP BY"));
            }
            let mut conditions = Vec::with_capacity(query.having().len());
            for condition in query.having() {
                conditions.push(self.aggregate_condition(condition)?);
            }
            sql.push_str(" HAVING ");
            sql.push_str(&conditions.join(" AND "));
        }

        let pagination = self.dialect.pagination_clause(query.limit(), query.offset());
        if !query.ordering().is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&self.ordering(query.ordering())?);
        } else if !pagination.is_empty()
            && !self.dialect.supports_feature(Feature::OffsetWithoutOrderBy)
        {
            sql.push_str(" ORDER BY (SELECT NULL)");
        }
        if !pagination.is_empty() {
            sql.push(' ');
            sql.push_str(&pagination);
        }

        if let Some(lock) = query.lock() {
            require(self.dialect, Feature::RowLocking)?;
            sql.push(' ');
            sql.push_str(lock.as_str());
        }

        Ok(sql)
    }

    fn projection(&mut self, query: &Query) -> Result<String> {
        let mut items: Vec<String> = query.fields().iter().map(|f| self.field(f)).collect();
        for expr in query.select_exprs() {
            items.push(self.field_expression(expr)?);
        }
        if query.operation() == Operation::Count {
            items.push(String::from("COUNT(*)"));
        }
        if items.is_empty() {
            return Ok(String::from("*"));
        }
        Ok(items.join(", "))
    }

    fn join(&self, join: &Join) -> Result<String> {
        if join.kind == JoinKind::Full {
            require(self.dialect, Feature::FullOuterJoin)?;
        }
        Ok(format!(
            "{} {} ON {}",
            join.kind.as_str(),
            self.ident(join.table.name()),
            self.field_comparison(&join.on)
        ))
    }

    fn where_clause(&mut self, sql: &mut String, query: &Query) -> Result<()> {
        if let Some(item) = query.where_clause() {
            let rendered = self.condition(item, false)?;
            sql.push_str(" WHERE ");
            sql.push_str(&rendered);
        }
        Ok(())
    }

    fn ordering(&self, entries: &[OrderBy]) -> Result<String> {
        let mut parts = Vec::with_capacity(entries.len());
        for entry in entries {
            let mut part = format!("{} {}", self.field(&entry.field), entry.direction.as_str());
            if let Some(nulls) = entry.nulls {
                require(self.dialect, Feature::NullsOrdering)?;
                part.push(' ');
                part.push_str(nulls.as_str());
            }
            parts.push(part);
        }
        Ok(parts.join(", "))
    }

    fn insert(&mut self, query: &Query) -> Result<String> {
        let rows = query.values();
        let Some(first) = rows.first() else {
            return Err(QueryError::structural(
                "INSERT requires at least one row of values",
            ));
        };
        if first.is_empty() {
            return Err(QueryError::structural("INSERT row assigns no columns"));
        }
        if rows.iter().any(|row| !row.keys().eq(first.keys())) {
            return Err(QueryError::structural(
                "INSERT rows must assign the same columns",
            ));
        }
        if rows.len() > 1 {
            require(self.dialect, Feature::MultiRowInsert)?;
        }

        let columns = first
            .keys()
            .map(|f| self.column(f))
            .collect::<Vec<_>>()
            .join(", ");
        let mut tuples = Vec::with_capacity(rows.len());
        for row in rows {
            let placeholders: Vec<String> = row.values().map(|p| self.placeholder(p)).collect();
            tuples.push(format!("({})", placeholders.join(", ")));
        }

        let mut sql = format!(
            "INSERT INTO {} ({columns}) VALUES {}",
            self.ident(query.target().name()),
            tuples.join(", ")
        );
        if let Some(clause) = query.on_conflict() {
            let rendered = self.on_conflict(clause)?;
            sql.push(' ');
            sql.push_str(&rendered);
        }
        self.returning(&mut sql, query.returning())?;
        Ok(sql)
    }

    fn on_conflict(&mut self, clause: &OnConflict) -> Result<String> {
        require(self.dialect, Feature::Upsert)?;
        let mut sql = String::from("ON CONFLICT");
        if !clause.columns.is_empty() {
            let columns: Vec<String> = clause.columns.iter().map(|f| self.column(f)).collect();
            sql.push_str(" (");
            sql.push_str(&columns.join(", "));
            sql.push(')');
        }
        match &clause.action {
            ConflictAction::DoNothing => sql.push_str(" DO NOTHING"),
            ConflictAction::DoUpdate(assignments) => {
                if clause.columns.is_empty() {
                    return Err(QueryError::structural(
                        "ON CONFLICT DO UPDATE requires conflict columns",
                    ));
                }
                if assignments.is_empty() {
                    return Err(QueryError::structural(
                        "ON CONFLICT DO UPDATE requires at least one assignment",
                    ));
                }
                sql.push_str(" DO UPDATE SET ");
                sql.push_str(&self.assignments(assignments));
            }
        }
        Ok(sql)
    }

    fn assignments(&mut self, assignments: &BTreeMap<Field, Param>) -> String {
        let mut parts = Vec::with_capacity(assignments.len());
        for (field, param) in assignments {
            let column = self.column(field);
            let placeholder = self.placeholder(param);
            parts.push(format!("{column} = {placeholder}"));
        }
        parts.join(", ")
    }

    fn update(&mut self, query: &Query) -> Result<String> {
        if query.updates().is_empty() {
            return Err(QueryError::structural(
                "UPDATE requires at least one SET assignment",
            ));
        }
        let mut sql = format!("UPDATE {} SET ", self.ident(query.target().name()));
        sql.push_str(&self.assignments(query.updates()));
        self.where_clause(&mut sql, query)?;
        self.returning(&mut sql, query.returning())?;
        Ok(sql)
    }

    fn delete(&mut self, query: &Query) -> Result<String> {
        let mut sql = format!("DELETE FROM {}", self.ident(query.target().name()));
        self.where_clause(&mut sql, query)?;
        self.returning(&mut sql, query.returning())?;
        Ok(sql)
    }

    fn returning(&self, sql: &mut String, fields: &[Field]) -> Result<()> {
        if !fields.is_empty() {
            require(self.dialect, Feature::Returning)?;
            sql.push_str(" RETURNING ");
            sql.push_str(&self.field_list(fields));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{cond, Operator, Table};
    use crate::dialect::{PostgresDialect, SqlServerDialect};

    fn f(name: &str) -> Field {
        Field::new(name)
    }

    fn p(name: &str) -> Param {
        Param::try_named(name).unwrap()
    }

    #[test]
    fn select_without_fields_renders_star() {
        let query = Query::new(Operation::Select, Table::new("users"));
        let out = render(&query, &PostgresDialect::new()).unwrap();
        assert_eq!(out.sql, "SELECT * FROM \"users\"");
        assert!(out.required_params.is_empty());
    }

    #[test]
    fn count_without_fields() {
        let query = Query::new(Operation::Count, Table::new("users"));
        let out = query.render(&PostgresDialect::new()).unwrap();
        assert_eq!(out.sql, "SELECT COUNT(*) FROM \"users\"");
    }

    #[test]
    fn qualified_fields_quote_both_parts() {
        let users = Table::new("users");
        let mut query = Query::new(Operation::Select, users.clone());
        query.fields.push(f("id").qualified(&users));
        let out = render(&query, &SqlServerDialect::new()).unwrap();
        assert_eq!(out.sql, "SELECT [users].[id] FROM [users]");
    }

    #[test]
    fn update_requires_assignments() {
        let query = Query::new(Operation::Update, Table::new("users"));
        let err = render(&query, &PostgresDialect::new()).unwrap_err();
        assert!(matches!(err, QueryError::Structural(_)));
    }

    #[test]
    fn insert_requires_rows() {
        let query = Query::new(Operation::Insert, Table::new("users"));
        assert!(render(&query, &PostgresDialect::new()).is_err());
    }

    #[test]
    fn insert_rows_must_match() {
        let mut query = Query::new(Operation::Insert, Table::new("users"));
        query.values.push(BTreeMap::from([(f("a"), p("a"))]));
        query.values.push(BTreeMap::from([(f("b"), p("b"))]));
        let err = render(&query, &PostgresDialect::new()).unwrap_err();
        assert!(err.to_string().contains("same columns"));
    }

    #[test]
    fn delete_with_where() {
        let mut query = Query::new(Operation::Delete, Table::new("users"));
        query.where_clause = Some(cond(f("id"), Operator::Eq, p("id")).into());
        let out = render(&query, &PostgresDialect::new()).unwrap();
        assert_eq!(out.sql, "DELETE FROM \"users\" WHERE \"id\" = :id");
        assert_eq!(out.required_params, ["id"]);
    }
}
