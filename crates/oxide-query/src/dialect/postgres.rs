//! PostgreSQL dialect.

use super::{date_operand, Dialect, Feature, PlaceholderStyle};
use crate::ast::{CastType, DateFunc, DatePart};
use crate::error::Result;

/// PostgreSQL dialect.
///
/// Placeholders default to `:name`; use [`PostgresDialect::numbered`] for
/// the native `$1` form.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresDialect {
    style: PlaceholderStyle,
}

impl PostgresDialect {
    /// Creates a PostgreSQL dialect with `:name` placeholders.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            style: PlaceholderStyle::Named,
        }
    }

    /// Creates a PostgreSQL dialect with `$n` placeholders.
    #[must_use]
    pub const fn numbered() -> Self {
        Self {
            style: PlaceholderStyle::Numbered,
        }
    }
}

impl Dialect for PostgresDialect {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn placeholder_style(&self) -> PlaceholderStyle {
        self.style
    }

    fn supports_feature(&self, feature: Feature) -> bool {
        match feature {
            Feature::NullsOrdering
            | Feature::MultiRowInsert
            | Feature::Upsert
            | Feature::Returning
            | Feature::DistinctOn
            | Feature::RowLocking
            | Feature::CaseInsensitiveLike
            | Feature::VectorOperators
            | Feature::FullOuterJoin
            | Feature::OffsetWithoutOrderBy
            | Feature::WindowFunctions => true,
        }
    }

    fn date_function(&self, func: DateFunc, field: Option<&str>) -> Result<String> {
        Ok(match func {
            DateFunc::Now => String::from("NOW()"),
            DateFunc::CurrentDate => String::from("CURRENT_DATE"),
            DateFunc::Extract(part) => {
                format!("EXTRACT({} FROM {})", part.as_str(), date_operand(func, field)?)
            }
            DateFunc::Trunc(part) => format!(
                "DATE_TRUNC('{}', {})",
                trunc_unit(part),
                date_operand(func, field)?
            ),
        })
    }

    fn cast_type(&self, target: CastType) -> &'static str {
        match target {
            CastType::Text => "TEXT",
            CastType::Integer => "INTEGER",
            CastType::BigInt => "BIGINT",
            CastType::Real => "REAL",
            CastType::Double => "DOUBLE PRECISION",
            CastType::Numeric => "NUMERIC",
            CastType::Boolean => "BOOLEAN",
            CastType::Date => "DATE",
            CastType::Timestamp => "TIMESTAMP",
        }
    }
}

const fn trunc_unit(part: DatePart) -> &'static str {
    match part {
        DatePart::Year => "year",
        DatePart::Quarter => "quarter",
        DatePart::Month => "month",
        DatePart::Week => "week",
        DatePart::Day => "day",
        DatePart::Hour => "hour",
        DatePart::Minute => "minute",
        DatePart::Second => "second",
    }
}
