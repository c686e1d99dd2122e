//! SQLite dialect.

use super::{date_operand, Dialect, Feature, PlaceholderStyle};
use crate::ast::{CastType, DateFunc, DatePart, StringFunc};
use crate::error::{QueryError, Result};

/// SQLite dialect.
///
/// SQLite has no date types, so date functions go through `strftime`, and
/// OFFSET is only valid after a LIMIT (`LIMIT -1` means unbounded).
#[derive(Debug, Default, Clone, Copy)]
pub struct SqliteDialect;

impl SqliteDialect {
    /// Creates a new SQLite dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for SqliteDialect {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn placeholder_style(&self) -> PlaceholderStyle {
        PlaceholderStyle::Named
    }

    fn pagination_clause(&self, limit: Option<u64>, offset: Option<u64>) -> String {
        match (limit, offset) {
            (Some(l), Some(o)) => format!("LIMIT {l} OFFSET {o}"),
            (Some(l), None) => format!("LIMIT {l}"),
            (None, Some(o)) => format!("LIMIT -1 OFFSET {o}"),
            (None, None) => String::new(),
        }
    }

    fn supports_feature(&self, feature: Feature) -> bool {
        match feature {
            // NULLS FIRST/LAST since 3.30.0, RETURNING since 3.35.0,
            // FULL JOIN since 3.39.0.
            Feature::NullsOrdering
            | Feature::MultiRowInsert
            | Feature::Upsert
            | Feature::Returning
            | Feature::FullOuterJoin
            | Feature::OffsetWithoutOrderBy
            | Feature::WindowFunctions => true,
            Feature::DistinctOn
            | Feature::RowLocking
            | Feature::CaseInsensitiveLike
            | Feature::VectorOperators => false,
        }
    }

    fn string_function(&self, func: StringFunc, args: &[String]) -> String {
        match func {
            StringFunc::Concat => format!("({})", args.join(" || ")),
            StringFunc::Substring => format!("SUBSTR({})", args.join(", ")),
            StringFunc::Upper => format!("UPPER({})", args.join(", ")),
            StringFunc::Lower => format!("LOWER({})", args.join(", ")),
            StringFunc::Trim => format!("TRIM({})", args.join(", ")),
            StringFunc::Length => format!("LENGTH({})", args.join(", ")),
        }
    }

    fn date_function(&self, func: DateFunc, field: Option<&str>) -> Result<String> {
        match func {
            DateFunc::Now => Ok(String::from("datetime('now')")),
            DateFunc::CurrentDate => Ok(String::from("date('now')")),
            DateFunc::Extract(part) => {
                let fmt = match part {
                    DatePart::Year => "%Y",
                    DatePart::Month => "%m",
                    DatePart::Week => "%W",
                    DatePart::Day => "%d",
                    DatePart::Hour => "%H",
                    DatePart::Minute => "%M",
                    DatePart::Second => "%S",
                    DatePart::Quarter => {
                        return Err(QueryError::unsupported(self.name(), "EXTRACT(QUARTER)"));
                    }
                };
                Ok(format!(
                    "CAST(strftime('{fmt}', {}) AS INTEGER)",
                    date_operand(func, field)?
                ))
            }
            DateFunc::Trunc(part) => {
                let operand = date_operand(func, field)?;
                match part {
                    DatePart::Year => Ok(format!("strftime('%Y-01-01', {operand})")),
                    DatePart::Month => Ok(format!("strftime('%Y-%m-01', {operand})")),
                    DatePart::Day => Ok(format!("date({operand})")),
                    DatePart::Hour => Ok(format!("strftime('%Y-%m-%d %H:00:00', {operand})")),
                    DatePart::Minute => Ok(format!("strftime('%Y-%m-%d %H:%M:00', {operand})")),
                    DatePart::Second => Ok(format!("strftime('%Y-%m-%d %H:%M:%S', {operand})")),
                    DatePart::Week | DatePart::Quarter => Err(QueryError::unsupported(
                        self.name(),
                        format!("DATE_TRUNC({})", part.as_str()),
                    )),
                }
            }
        }
    }

    fn cast_type(&self, target: CastType) -> &'static str {
        match target {
            CastType::Text | CastType::Date | CastType::Timestamp => "TEXT",
            CastType::Integer | CastType::BigInt | CastType::Boolean => "INTEGER",
            CastType::Real | CastType::Double => "REAL",
            CastType::Numeric => "NUMERIC",
        }
    }
}
