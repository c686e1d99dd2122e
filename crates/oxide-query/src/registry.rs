//! Schema registry: the only source of [`Table`] and [`Field`] values.
//!
//! A [`Registry`] is built once from a [`SchemaModel`] and exposes no
//! mutating methods afterwards, so it can be shared across threads by
//! reference.
//!
//! # Field scoping
//!
//! [`Registry::try_field`] accepts any column of any table (one global
//! field namespace). [`Registry::try_field_in`] accepts only columns of
//! the given table.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::ast::{Field, Param, Table};
use crate::error::{QueryError, Result};
use crate::schema::SchemaModel;

/// Validated table and field names.
#[derive(Debug, Clone)]
pub struct Registry {
    tables: BTreeMap<String, BTreeSet<String>>,
    fields: BTreeSet<String>,
}

impl Registry {
    /// Builds a registry from a parsed schema.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Schema`] if the model has no tables, or a
    /// table or column is unnamed, duplicated, or a table has no columns.
    pub fn from_schema(model: &SchemaModel) -> Result<Self> {
        if model.tables.is_empty() {
            return Err(QueryError::schema("schema defines no tables"));
        }

        let mut tables: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        let mut fields = BTreeSet::new();

        for table in &model.tables {
            if table.name.is_empty() {
                return Err(QueryError::schema("table with empty name"));
            }
            if tables.contains_key(&table.name) {
                return Err(QueryError::schema(format!(
                    "duplicate table '{}'",
                    table.name
                )));
            }
            if table.columns.is_empty() {
                return Err(QueryError::schema(format!(
                    "table '{}' has no columns",
                    table.name
                )));
            }

            let mut columns = BTreeSet::new();
            for column in &table.columns {
                if column.name.is_empty() {
                    return Err(QueryError::schema(format!(
                        "table '{}' has a column with empty name",
                        table.name
                    )));
                }
                if !columns.insert(column.name.clone()) {
                    return Err(QueryError::schema(format!(
                        "duplicate column '{}' in table '{}'",
                        column.name, table.name
                    )));
                }
                fields.insert(column.name.clone());
            }
            tables.insert(table.name.clone(), columns);
        }

        debug!(
            tables = tables.len(),
            fields = fields.len(),
            "Built schema registry"
        );
        Ok(Self { tables, fields })
    }

    /// Decodes a JSON schema model and builds a registry from it.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Json`] for undecodable input, otherwise the
    /// errors of [`Self::from_schema`].
    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_schema(&SchemaModel::from_json(json)?)
    }

    /// Looks up a table.
    ///
    /// Use this whenever `name` comes from untrusted input.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::SchemaValidation`] if the table is unknown.
    pub fn try_table(&self, name: &str) -> Result<Table> {
        if self.tables.contains_key(name) {
            Ok(Table::new(name))
        } else {
            Err(QueryError::SchemaValidation {
                kind: "table",
                name: name.to_string(),
            })
        }
    }

    /// Looks up a table whose name is a developer-controlled literal.
    ///
    /// # Panics
    ///
    /// Panics if the table is unknown.
    #[must_use]
    pub fn table(&self, name: &str) -> Table {
        self.try_table(name).unwrap_or_else(|e| panic!("{e}"))
    }

    /// Looks up a field in the global field namespace.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::SchemaValidation`] if no table has the column.
    pub fn try_field(&self, name: &str) -> Result<Field> {
        if self.fields.contains(name) {
            Ok(Field::new(name))
        } else {
            Err(QueryError::SchemaValidation {
                kind: "field",
                name: name.to_string(),
            })
        }
    }

    /// Looks up a field whose name is a developer-controlled literal.
    ///
    /// # Panics
    ///
    /// Panics if no table has the column.
    #[must_use]
    pub fn field(&self, name: &str) -> Field {
        self.try_field(name).unwrap_or_else(|e| panic!("{e}"))
    }

    /// Looks up a field among the columns of `table`.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::SchemaValidation`] if `table` has no such column.
    pub fn try_field_in(&self, table: &Table, name: &str) -> Result<Field> {
        let known = self
            .tables
            .get(table.name())
            .is_some_and(|columns| columns.contains(name));
        if known {
            Ok(Field::new(name))
        } else {
            Err(QueryError::SchemaValidation {
                kind: "field",
                name: format!("{}.{name}", table.name()),
            })
        }
    }

    /// Looks up a field of `table` whose name is a developer-controlled literal.
    ///
    /// # Panics
    ///
    /// Panics if `table` has no such column.
    #[must_use]
    pub fn field_in(&self, table: &Table, name: &str) -> Field {
        self.try_field_in(table, name)
            .unwrap_or_else(|e| panic!("{e}"))
    }

    /// Creates a named parameter. Never consults the schema.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::IdentifierValidation`] if `name` is not a
    /// valid parameter name.
    pub fn try_param(&self, name: &str) -> Result<Param> {
        Param::try_named(name)
    }

    /// Creates a named parameter from a developer-controlled literal.
    ///
    /// # Panics
    ///
    /// Panics if `name` is not a valid parameter name.
    #[must_use]
    pub fn param(&self, name: &str) -> Param {
        self.try_param(name).unwrap_or_else(|e| panic!("{e}"))
    }

    /// Returns `true` if the table exists.
    #[must_use]
    pub fn has_table(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// Returns `true` if any table has the column.
    #[must_use]
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains(name)
    }

    /// Returns the table names in sorted order.
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    /// Returns the column names of `table` in sorted order.
    pub fn columns_of<'a>(&'a self, table: &Table) -> impl Iterator<Item = &'a str> {
        self.tables
            .get(table.name())
            .into_iter()
            .flat_map(|columns| columns.iter().map(String::as_str))
    }
}
