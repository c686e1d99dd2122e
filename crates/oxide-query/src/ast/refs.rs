//! Validated references: tables, fields, and parameters.
//!
//! `Table` and `Field` can only be obtained from a
//! [`Registry`](crate::Registry), so holding one proves the name exists in
//! the schema. `Param` only needs to pass the lexical rules in
//! [`ident`](crate::ident).

use std::fmt;

use crate::error::{QueryError, Result};
use crate::ident;

/// A table known to the schema.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Table {
    name: String,
}

impl Table {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Returns the table name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A field (column) known to the schema, optionally qualified by a table.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Field {
    name: String,
    table: Option<String>,
}

impl Field {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table: None,
        }
    }

    /// Returns the field name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the qualifying table name, if any.
    #[must_use]
    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }

    /// Qualifies the field with `table`, rendering as `"table"."field"`.
    ///
    /// Assignment targets (INSERT columns, UPDATE SET) always render
    /// unqualified.
    #[must_use]
    pub fn qualified(mut self, table: &Table) -> Self {
        self.table = Some(table.name.clone());
        self
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.table {
            Some(t) => write!(f, "{t}.{}", self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// How a parameter is addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ParamKind {
    /// Addressed by name; numbered by first appearance where a dialect needs numbers.
    Named,
    /// Addressed by a fixed 1-based position.
    Positional,
}

/// A bind-parameter reference. Only the name ever enters the tree.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Param {
    name: String,
    kind: ParamKind,
    index: usize,
}

impl Param {
    /// Creates a named parameter.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::IdentifierValidation`] if `name` fails
    /// [`ident::validate_param_name`].
    pub fn try_named(name: &str) -> Result<Self> {
        ident::validate_param_name(name)?;
        Ok(Self {
            name: name.to_string(),
            kind: ParamKind::Named,
            index: 0,
        })
    }

    /// Creates a positional parameter named `p{index}`.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::IdentifierValidation`] if `index` is zero.
    pub fn try_positional(index: usize) -> Result<Self> {
        if index == 0 {
            return Err(QueryError::IdentifierValidation {
                kind: "parameter",
                name: String::from("p0"),
                reason: String::from("positional index starts at 1"),
            });
        }
        Ok(Self {
            name: format!("p{index}"),
            kind: ParamKind::Positional,
            index,
        })
    }

    /// Returns the parameter name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns how the parameter is addressed.
    #[must_use]
    pub const fn kind(&self) -> ParamKind {
        self.kind
    }

    /// Returns the fixed position of a positional parameter, zero for named ones.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":{}", self.name)
    }
}
