//! Scalar field expressions usable in projections.

use super::condition::ConditionItem;
use super::operator::{AggregateFunc, BinaryOp};
use super::query::OrderBy;
use super::refs::{Field, Param};
use crate::error::{QueryError, Result};
use crate::ident;

/// A value position: either a field or a bound parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Field(Field),
    Param(Param),
}

impl From<Field> for Operand {
    fn from(f: Field) -> Self {
        Self::Field(f)
    }
}

impl From<Param> for Operand {
    fn from(p: Param) -> Self {
        Self::Param(p)
    }
}

/// Numeric functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MathFunc {
    Abs,
    Ceil,
    Floor,
    /// `ROUND(x)` or `ROUND(x, :precision)`.
    Round,
    Sqrt,
    /// `POWER(x, :exponent)`.
    Power,
}

impl MathFunc {
    /// Returns the SQL function name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Abs => "ABS",
            Self::Ceil => "CEIL",
            Self::Floor => "FLOOR",
            Self::Round => "ROUND",
            Self::Sqrt => "SQRT",
            Self::Power => "POWER",
        }
    }

    /// Checks the extra argument against the function's arity.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Structural`] if `POWER` has no argument or a
    /// single-operand function was given one.
    pub fn check_arity(self, has_arg: bool) -> Result<()> {
        match (self, has_arg) {
            (Self::Power, false) => {
                Err(QueryError::structural("POWER requires an exponent parameter"))
            }
            (Self::Abs | Self::Ceil | Self::Floor | Self::Sqrt, true) => Err(
                QueryError::structural(format!("{} takes no extra argument", self.as_str())),
            ),
            _ => Ok(()),
        }
    }
}

/// String functions. Names differ between dialects, so the dialect
/// renders them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StringFunc {
    Upper,
    Lower,
    Trim,
    Length,
    Concat,
    Substring,
}

impl StringFunc {
    /// Returns the portable SQL function name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Upper => "UPPER",
            Self::Lower => "LOWER",
            Self::Trim => "TRIM",
            Self::Length => "LENGTH",
            Self::Concat => "CONCAT",
            Self::Substring => "SUBSTRING",
        }
    }
}

/// Date part used by EXTRACT and truncation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatePart {
    Year,
    Quarter,
    Month,
    Week,
    Day,
    Hour,
    Minute,
    Second,
}

impl DatePart {
    /// Returns the SQL keyword for the part.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Year => "YEAR",
            Self::Quarter => "QUARTER",
            Self::Month => "MONTH",
            Self::Week => "WEEK",
            Self::Day => "DAY",
            Self::Hour => "HOUR",
            Self::Minute => "MINUTE",
            Self::Second => "SECOND",
        }
    }
}

/// Date functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateFunc {
    /// Current timestamp.
    Now,
    /// Current date.
    CurrentDate,
    /// Extract a part of a date/time field.
    Extract(DatePart),
    /// Truncate a date/time field to a part.
    Trunc(DatePart),
}

impl DateFunc {
    /// Returns the portable SQL function name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Now => "NOW",
            Self::CurrentDate => "CURRENT_DATE",
            Self::Extract(_) => "EXTRACT",
            Self::Trunc(_) => "DATE_TRUNC",
        }
    }
}

/// Portable CAST target types; each dialect maps them to its own names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastType {
    Text,
    Integer,
    BigInt,
    Real,
    Double,
    Numeric,
    Boolean,
    Date,
    Timestamp,
}

/// Window functions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowFunc {
    RowNumber,
    Rank,
    DenseRank,
    Ntile(Param),
    Lag {
        field: Field,
        offset: Option<Param>,
    },
    Lead {
        field: Field,
        offset: Option<Param>,
    },
    FirstValue(Field),
    LastValue(Field),
    /// An aggregate evaluated over the window; `None` field means `*`.
    Aggregate(AggregateFunc, Option<Field>),
}

/// `func OVER (PARTITION BY ... ORDER BY ...)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowExpr {
    /// The window function.
    pub func: WindowFunc,
    /// PARTITION BY fields.
    pub partition_by: Vec<Field>,
    /// ORDER BY entries inside the window.
    pub order_by: Vec<OrderBy>,
}

impl WindowExpr {
    /// Creates a window with no partitioning or ordering.
    #[must_use]
    pub const fn new(func: WindowFunc) -> Self {
        Self {
            func,
            partition_by: Vec::new(),
            order_by: Vec::new(),
        }
    }

    /// Adds a PARTITION BY field.
    #[must_use]
    pub fn partition_by(mut self, field: Field) -> Self {
        self.partition_by.push(field);
        self
    }

    /// Adds an ORDER BY entry.
    #[must_use]
    pub fn order_by(mut self, order: OrderBy) -> Self {
        self.order_by.push(order);
        self
    }
}

/// A searched CASE expression.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CaseExpr {
    /// WHEN condition THEN result arms, in order.
    pub whens: Vec<(ConditionItem, Operand)>,
    /// ELSE result.
    pub otherwise: Option<Operand>,
}

impl CaseExpr {
    /// Creates a CASE with no arms.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            whens: Vec::new(),
            otherwise: None,
        }
    }

    /// Adds a WHEN arm.
    #[must_use]
    pub fn when(mut self, condition: impl Into<ConditionItem>, result: impl Into<Operand>) -> Self {
        self.whens.push((condition.into(), result.into()));
        self
    }

    /// Sets the ELSE result.
    #[must_use]
    pub fn otherwise(mut self, result: impl Into<Operand>) -> Self {
        self.otherwise = Some(result.into());
        self
    }
}

/// The scalar expression variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {
    /// A plain field.
    Field(Field),
    /// `AGG(field)`; a `None` field means `*`.
    Aggregate {
        func: AggregateFunc,
        field: Option<Field>,
    },
    /// `FUNC(field[, :arg])`.
    Math {
        func: MathFunc,
        field: Field,
        arg: Option<Param>,
    },
    /// A string function over its operands.
    String { func: StringFunc, args: Vec<Operand> },
    /// A date function; `field` is absent for NOW / CURRENT_DATE.
    Date { func: DateFunc, field: Option<Field> },
    /// `CASE WHEN ... END`.
    Case(CaseExpr),
    /// `COALESCE(a, b, ...)`, at least two operands.
    Coalesce(Vec<Operand>),
    /// `NULLIF(a, b)`.
    NullIf(Operand, Operand),
    /// `CAST(field AS type)`.
    Cast { field: Field, target: CastType },
    /// `field <op> :param`.
    Binary {
        field: Field,
        op: BinaryOp,
        param: Param,
    },
    /// A window function call.
    Window(WindowExpr),
}

/// A projected expression with an optional validated alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldExpression {
    expr: Expression,
    alias: Option<String>,
}

impl FieldExpression {
    /// Wraps an expression without an alias.
    #[must_use]
    pub const fn new(expr: Expression) -> Self {
        Self { expr, alias: None }
    }

    /// Returns the expression.
    #[must_use]
    pub const fn expr(&self) -> &Expression {
        &self.expr
    }

    /// Returns the alias, if any.
    #[must_use]
    pub fn alias_name(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// Sets the alias.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::IdentifierValidation`] if `alias` fails
    /// [`ident::validate_identifier`].
    pub fn try_alias(mut self, alias: &str) -> Result<Self> {
        ident::validate_identifier(alias)?;
        self.alias = Some(alias.to_string());
        Ok(self)
    }

    /// Sets the alias.
    ///
    /// # Panics
    ///
    /// Panics if `alias` is not a valid identifier.
    #[must_use]
    pub fn alias(self, alias: &str) -> Self {
        self.try_alias(alias).unwrap_or_else(|e| panic!("{e}"))
    }

    /// A plain field.
    #[must_use]
    pub const fn field(field: Field) -> Self {
        Self::new(Expression::Field(field))
    }

    /// `AGG(field)`.
    #[must_use]
    pub const fn aggregate(func: AggregateFunc, field: Field) -> Self {
        Self::new(Expression::Aggregate {
            func,
            field: Some(field),
        })
    }

    /// `COUNT(*)`.
    #[must_use]
    pub const fn count_all() -> Self {
        Self::new(Expression::Aggregate {
            func: AggregateFunc::Count,
            field: None,
        })
    }

    /// A math function.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Structural`] if `POWER` has no argument or
    /// a single-operand function was given one.
    pub fn try_math(func: MathFunc, field: Field, arg: Option<Param>) -> Result<Self> {
        func.check_arity(arg.is_some())?;
        Ok(Self::new(Expression::Math { func, field, arg }))
    }

    /// A math function.
    ///
    /// # Panics
    ///
    /// Panics on an arity mismatch, see [`Self::try_math`].
    #[must_use]
    pub fn math(func: MathFunc, field: Field, arg: Option<Param>) -> Self {
        Self::try_math(func, field, arg).unwrap_or_else(|e| panic!("{e}"))
    }

    /// A string function.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Structural`] if the operand count does not
    /// fit `func`: one for UPPER/LOWER/TRIM/LENGTH, two or more for
    /// CONCAT, two or three for SUBSTRING.
    pub fn try_string(func: StringFunc, args: Vec<Operand>) -> Result<Self> {
        let ok = match func {
            StringFunc::Upper | StringFunc::Lower | StringFunc::Trim | StringFunc::Length => {
                args.len() == 1
            }
            StringFunc::Concat => args.len() >= 2,
            StringFunc::Substring => (2..=3).contains(&args.len()),
        };
        if !ok {
            return Err(QueryError::structural(format!(
                "{} cannot take {} operand(s)",
                func.as_str(),
                args.len()
            )));
        }
        Ok(Self::new(Expression::String { func, args }))
    }

    /// A string function.
    ///
    /// # Panics
    ///
    /// Panics on an arity mismatch, see [`Self::try_string`].
    #[must_use]
    pub fn string(func: StringFunc, args: Vec<Operand>) -> Self {
        Self::try_string(func, args).unwrap_or_else(|e| panic!("{e}"))
    }

    /// The current timestamp.
    #[must_use]
    pub const fn now() -> Self {
        Self::new(Expression::Date {
            func: DateFunc::Now,
            field: None,
        })
    }

    /// The current date.
    #[must_use]
    pub const fn current_date() -> Self {
        Self::new(Expression::Date {
            func: DateFunc::CurrentDate,
            field: None,
        })
    }

    /// Extracts `part` from `field`.
    #[must_use]
    pub const fn extract(part: DatePart, field: Field) -> Self {
        Self::new(Expression::Date {
            func: DateFunc::Extract(part),
            field: Some(field),
        })
    }

    /// Truncates `field` to `part`.
    #[must_use]
    pub const fn date_trunc(part: DatePart, field: Field) -> Self {
        Self::new(Expression::Date {
            func: DateFunc::Trunc(part),
            field: Some(field),
        })
    }

    /// A CASE expression.
    #[must_use]
    pub const fn case(case: CaseExpr) -> Self {
        Self::new(Expression::Case(case))
    }

    /// `COALESCE(...)`.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Structural`] with fewer than two operands.
    pub fn try_coalesce(operands: Vec<Operand>) -> Result<Self> {
        if operands.len() < 2 {
            return Err(QueryError::structural("COALESCE requires at least two operands"));
        }
        Ok(Self::new(Expression::Coalesce(operands)))
    }

    /// `COALESCE(...)`.
    ///
    /// # Panics
    ///
    /// Panics with fewer than two operands.
    #[must_use]
    pub fn coalesce(operands: Vec<Operand>) -> Self {
        Self::try_coalesce(operands).unwrap_or_else(|e| panic!("{e}"))
    }

    /// `NULLIF(a, b)`.
    #[must_use]
    pub fn null_if(a: impl Into<Operand>, b: impl Into<Operand>) -> Self {
        Self::new(Expression::NullIf(a.into(), b.into()))
    }

    /// `CAST(field AS target)`.
    #[must_use]
    pub const fn cast(field: Field, target: CastType) -> Self {
        Self::new(Expression::Cast { field, target })
    }

    /// `field <op> :param`.
    #[must_use]
    pub const fn binary(field: Field, op: BinaryOp, param: Param) -> Self {
        Self::new(Expression::Binary { field, op, param })
    }

    /// A window function.
    #[must_use]
    pub const fn window(window: WindowExpr) -> Self {
        Self::new(Expression::Window(window))
    }
}

impl From<Field> for FieldExpression {
    fn from(field: Field) -> Self {
        Self::field(field)
    }
}
