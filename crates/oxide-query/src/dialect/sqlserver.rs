//! SQL Server (T-SQL) dialect.

use super::{date_operand, Dialect, Feature, PlaceholderStyle};
use crate::ast::{CastType, DateFunc, DatePart, StringFunc};
use crate::error::Result;

/// SQL Server dialect.
///
/// T-SQL has no LIMIT. A bare limit becomes `SELECT TOP (n)`; any offset
/// uses `OFFSET m ROWS [FETCH NEXT n ROWS ONLY]`, which requires an
/// ORDER BY clause.
#[derive(Debug, Default, Clone, Copy)]
pub struct SqlServerDialect;

impl SqlServerDialect {
    /// Creates a new SQL Server dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for SqlServerDialect {
    fn name(&self) -> &'static str {
        "sqlserver"
    }

    fn identifier_quotes(&self) -> (char, char) {
        ('[', ']')
    }

    fn placeholder_style(&self) -> PlaceholderStyle {
        PlaceholderStyle::At
    }

    fn pagination_clause(&self, limit: Option<u64>, offset: Option<u64>) -> String {
        match (limit, offset) {
            (Some(l), Some(o)) => format!("OFFSET {o} ROWS FETCH NEXT {l} ROWS ONLY"),
            (None, Some(o)) => format!("OFFSET {o} ROWS"),
            (Some(_) | None, None) => String::new(),
        }
    }

    fn top_clause(&self, limit: Option<u64>, offset: Option<u64>) -> Option<String> {
        match (limit, offset) {
            (Some(l), None) => Some(format!("TOP ({l})")),
            _ => None,
        }
    }

    fn supports_feature(&self, feature: Feature) -> bool {
        match feature {
            Feature::MultiRowInsert | Feature::FullOuterJoin | Feature::WindowFunctions => true,
            Feature::NullsOrdering
            | Feature::Upsert
            | Feature::Returning
            | Feature::DistinctOn
            | Feature::RowLocking
            | Feature::CaseInsensitiveLike
            | Feature::VectorOperators
            | Feature::OffsetWithoutOrderBy => false,
        }
    }

    fn string_function(&self, func: StringFunc, args: &[String]) -> String {
        let joined = args.join(", ");
        match func {
            StringFunc::Length => format!("LEN({joined})"),
            // T-SQL SUBSTRING always takes a length.
            StringFunc::Substring if args.len() == 2 => {
                format!("SUBSTRING({joined}, LEN({}))", args[0])
            }
            StringFunc::Substring => format!("SUBSTRING({joined})"),
            StringFunc::Upper => format!("UPPER({joined})"),
            StringFunc::Lower => format!("LOWER({joined})"),
            StringFunc::Trim => format!("TRIM({joined})"),
            StringFunc::Concat => format!("CONCAT({joined})"),
        }
    }

    fn date_function(&self, func: DateFunc, field: Option<&str>) -> Result<String> {
        Ok(match func {
            DateFunc::Now => String::from("GETDATE()"),
            DateFunc::CurrentDate => String::from("CAST(GETDATE() AS DATE)"),
            DateFunc::Extract(part) => {
                format!("DATEPART({}, {})", datepart(part), date_operand(func, field)?)
            }
            DateFunc::Trunc(part) => {
                format!("DATETRUNC({}, {})", datepart(part), date_operand(func, field)?)
            }
        })
    }

    fn cast_type(&self, target: CastType) -> &'static str {
        match target {
            CastType::Text => "NVARCHAR(MAX)",
            CastType::Integer => "INT",
            CastType::BigInt => "BIGINT",
            CastType::Real => "REAL",
            CastType::Double => "FLOAT",
            CastType::Numeric => "DECIMAL",
            CastType::Boolean => "BIT",
            CastType::Date => "DATE",
            CastType::Timestamp => "DATETIME2",
        }
    }
}

const fn datepart(part: DatePart) -> &'static str {
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
