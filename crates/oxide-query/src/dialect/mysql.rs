//! MySQL dialect.

use super::{date_operand, Dialect, Feature, PlaceholderStyle};
use crate::ast::{CastType, DateFunc};
use crate::error::{QueryError, Result};

/// MySQL rejects OFFSET without LIMIT; this is the documented "all rows" cap.
const UNBOUNDED_LIMIT: u64 = u64::MAX;

/// MySQL dialect.
#[derive(Debug, Default, Clone, Copy)]
pub struct MySqlDialect;

impl MySqlDialect {
    /// Creates a new MySQL dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for MySqlDialect {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn identifier_quotes(&self) -> (char, char) {
        ('`', '`')
    }

    fn placeholder_style(&self) -> PlaceholderStyle {
        PlaceholderStyle::Question
    }

    fn pagination_clause(&self, limit: Option<u64>, offset: Option<u64>) -> String {
        match (limit, offset) {
            (Some(l), Some(o)) => format!("LIMIT {l} OFFSET {o}"),
            (Some(l), None) => format!("LIMIT {l}"),
            (None, Some(o)) => format!("LIMIT {UNBOUNDED_LIMIT} OFFSET {o}"),
            (None, None) => String::new(),
        }
    }

    fn supports_feature(&self, feature: Feature) -> bool {
        match feature {
            Feature::MultiRowInsert
            | Feature::RowLocking
            | Feature::OffsetWithoutOrderBy
            | Feature::WindowFunctions => true,
            Feature::NullsOrdering
            | Feature::Upsert
            | Feature::Returning
            | Feature::DistinctOn
            | Feature::CaseInsensitiveLike
            | Feature::VectorOperators
            | Feature::FullOuterJoin => false,
        }
    }

    fn date_function(&self, func: DateFunc, field: Option<&str>) -> Result<String> {
        match func {
            DateFunc::Now => Ok(String::from("NOW()")),
            DateFunc::CurrentDate => Ok(String::from("CURDATE()")),
            DateFunc::Extract(part) => Ok(format!(
                "EXTRACT({} FROM {})",
                part.as_str(),
                date_operand(func, field)?
            )),
            DateFunc::Trunc(part) => Err(QueryError::unsupported(
                self.name(),
                format!("DATE_TRUNC({})", part.as_str()),
            )),
        }
    }

    fn cast_type(&self, target: CastType) -> &'static str {
        match target {
            CastType::Text => "CHAR",
            CastType::Integer | CastType::BigInt => "SIGNED",
            CastType::Real => "FLOAT",
            CastType::Double => "DOUBLE",
            CastType::Numeric => "DECIMAL",
            CastType::Boolean => "UNSIGNED",
            CastType::Date => "DATE",
            CastType::Timestamp => "DATETIME",
        }
    }
}
