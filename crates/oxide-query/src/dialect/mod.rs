//! SQL Dialect support.
//!
//! Different databases have slightly different SQL syntax. A [`Dialect`]
//! supplies identifier quoting, placeholder syntax, pagination, and the
//! few function spellings that differ; the render engine walks the tree
//! and never asks which dialect it holds.
//!
//! | dialect    | quoting  | placeholder        | pagination                         |
//! |------------|----------|--------------------|------------------------------------|
//! | PostgreSQL | `"x"`    | `:name` (or `$n`)  | `LIMIT n OFFSET m`                 |
//! | SQLite     | `"x"`    | `:name`            | `LIMIT n OFFSET m`                 |
//! | MySQL      | `` `x` ``| `?`                | `LIMIT n OFFSET m`                 |
//! | SQL Server | `[x]`    | `@name`            | `TOP (n)` / `OFFSET m ROWS FETCH…` |

mod mysql;
mod postgres;
mod sqlite;
mod sqlserver;

use std::fmt;
use std::str::FromStr;

pub use mysql::MySqlDialect;
pub use postgres::PostgresDialect;
pub use sqlite::SqliteDialect;
pub use sqlserver::SqlServerDialect;

use crate::ast::{CastType, DateFunc, StringFunc};
use crate::error::{QueryError, Result};

/// Optional constructs a dialect may or may not be able to express.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    /// `NULLS FIRST` / `NULLS LAST` in ORDER BY.
    NullsOrdering,
    /// More than one VALUES tuple in one INSERT.
    MultiRowInsert,
    /// `ON CONFLICT ... DO ...`.
    Upsert,
    /// `RETURNING` on INSERT/UPDATE/DELETE.
    Returning,
    /// `SELECT DISTINCT ON (...)`.
    DistinctOn,
    /// `FOR UPDATE` / `FOR SHARE`.
    RowLocking,
    /// `ILIKE` / `NOT ILIKE`.
    CaseInsensitiveLike,
    /// pgvector distance operators.
    VectorOperators,
    /// `FULL JOIN`.
    FullOuterJoin,
    /// OFFSET without an ORDER BY clause.
    OffsetWithoutOrderBy,
    /// `... OVER (...)`.
    WindowFunctions,
}

impl Feature {
    /// Returns a human-readable name for error messages.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NullsOrdering => "NULLS FIRST/LAST ordering",
            Self::MultiRowInsert => "multi-row INSERT",
            Self::Upsert => "ON CONFLICT upsert",
            Self::Returning => "RETURNING",
            Self::DistinctOn => "DISTINCT ON",
            Self::RowLocking => "row locking",
            Self::CaseInsensitiveLike => "ILIKE",
            Self::VectorOperators => "vector operators",
            Self::FullOuterJoin => "FULL JOIN",
            Self::OffsetWithoutOrderBy => "OFFSET without ORDER BY",
            Self::WindowFunctions => "window functions",
        }
    }
}

/// Placeholder syntax for bound parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaceholderStyle {
    /// `:name`
    #[default]
    Named,
    /// `$1`, `$2`, ...
    Numbered,
    /// `?`
    Question,
    /// `@name`
    At,
}

impl PlaceholderStyle {
    /// Formats a placeholder for the parameter `name` at 1-based `position`.
    #[must_use]
    pub fn format(&self, name: &str, position: usize) -> String {
        match self {
            Self::Named => format!(":{name}"),
            Self::Numbered => format!("${position}"),
            Self::Question => String::from("?"),
            Self::At => format!("@{name}"),
        }
    }
}

/// Trait for SQL dialect-specific behavior.
///
/// Implementations are stateless beyond their construction-time options,
/// so one instance may serve any number of concurrent renders.
pub trait Dialect: Send + Sync {
    /// Returns the name of the dialect.
    fn name(&self) -> &'static str;

    /// Returns the opening and closing identifier quote characters.
    fn identifier_quotes(&self) -> (char, char) {
        ('"', '"')
    }

    /// Quotes an identifier, doubling any embedded closing quote.
    fn quote_identifier(&self, name: &str) -> String {
        let (open, close) = self.identifier_quotes();
        let mut out = String::with_capacity(name.len() + 2);
        out.push(open);
        for ch in name.chars() {
            if ch == close {
                out.push(close);
            }
            out.push(ch);
        }
        out.push(close);
        out
    }

    /// Returns the placeholder syntax used for bound parameters.
    fn placeholder_style(&self) -> PlaceholderStyle;

    /// Formats the placeholder for parameter `name` bound at 1-based
    /// `position`.
    fn placeholder(&self, name: &str, position: usize) -> String {
        self.placeholder_style().format(name, position)
    }

    /// Returns the trailing pagination clause, or an empty string.
    fn pagination_clause(&self, limit: Option<u64>, offset: Option<u64>) -> String {
        match (limit, offset) {
            (Some(l), Some(o)) => format!("LIMIT {l} OFFSET {o}"),
            (Some(l), None) => format!("LIMIT {l}"),
            (None, Some(o)) => format!("OFFSET {o}"),
            (None, None) => String::new(),
        }
    }

    /// Returns a row cap placed right after `SELECT`, for dialects whose
    /// pagination clause cannot express a bare limit.
    fn top_clause(&self, _limit: Option<u64>, _offset: Option<u64>) -> Option<String> {
        None
    }

    /// Returns whether the dialect can express `feature`.
    fn supports_feature(&self, feature: Feature) -> bool;

    /// Renders a string function over already-rendered arguments.
    fn string_function(&self, func: StringFunc, args: &[String]) -> String {
        let joined = args.join(", ");
        match func {
            StringFunc::Upper => format!("UPPER({joined})"),
            StringFunc::Lower => format!("LOWER({joined})"),
            StringFunc::Trim => format!("TRIM({joined})"),
            StringFunc::Length => format!("LENGTH({joined})"),
            StringFunc::Concat => format!("CONCAT({joined})"),
            StringFunc::Substring => format!("SUBSTRING({joined})"),
        }
    }

    /// Renders a date function. `field` is the rendered operand for
    /// EXTRACT and truncation.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Render`] if the dialect has no form for it.
    fn date_function(&self, func: DateFunc, field: Option<&str>) -> Result<String>;

    /// Returns the dialect's name for a CAST target.
    fn cast_type(&self, target: CastType) -> &'static str;
}

/// Fails with a render error unless `dialect` supports `feature`.
pub(crate) fn require(dialect: &dyn Dialect, feature: Feature) -> Result<()> {
    if dialect.supports_feature(feature) {
        Ok(())
    } else {
        Err(QueryError::unsupported(dialect.name(), feature.as_str()))
    }
}

/// Returns the operand a date function needs, or a structural error.
pub(crate) fn date_operand<'a>(func: DateFunc, field: Option<&'a str>) -> Result<&'a str> {
    field.ok_or_else(|| QueryError::structural(format!("{} requires a field", func.as_str())))
}

/// The four shipped dialects, selectable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DialectKind {
    Postgres,
    Sqlite,
    MySql,
    SqlServer,
}

impl DialectKind {
    /// Returns the default provider for this dialect.
    #[must_use]
    pub fn provider(self) -> Box<dyn Dialect> {
        match self {
            Self::Postgres => Box::new(PostgresDialect::new()),
            Self::Sqlite => Box::new(SqliteDialect::new()),
            Self::MySql => Box::new(MySqlDialect::new()),
            Self::SqlServer => Box::new(SqlServerDialect::new()),
        }
    }

    /// Returns the canonical name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Postgres => "postgres",
            Self::Sqlite => "sqlite",
            Self::MySql => "mysql",
            Self::SqlServer => "sqlserver",
        }
    }
}

impl fmt::Display for DialectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DialectKind {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(Self::Postgres),
            "sqlite" | "sqlite3" => Ok(Self::Sqlite),
            "mysql" | "mariadb" => Ok(Self::MySql),
            "sqlserver" | "mssql" | "tsql" => Ok(Self::SqlServer),
            other => Err(QueryError::unsupported("unknown", format!("dialect '{other}'"))),
        }
    }
}
