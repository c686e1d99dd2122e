//! Schema model consumed by the registry.
//!
//! This is the already-parsed shape produced by an external schema
//! parser. Only the `name` fields take part in validation; column types
//! are carried along for callers that want them.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A parsed schema: a list of tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaModel {
    /// Table definitions.
    #[serde(default)]
    pub tables: Vec<TableDef>,
}

/// A table definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDef {
    /// Table name.
    pub name: String,
    /// Column definitions.
    #[serde(default)]
    pub columns: Vec<ColumnDef>,
}

/// A column definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
    /// Column name.
    pub name: String,
    /// Declared SQL type, as written in the schema source.
    #[serde(rename = "type", default)]
    pub data_type: String,
}

impl SchemaModel {
    /// Creates an empty model.
    #[must_use]
    pub const fn new() -> Self {
        Self { tables: Vec::new() }
    }

    /// Adds a table.
    #[must_use]
    pub fn table(mut self, table: TableDef) -> Self {
        self.tables.push(table);
        self
    }

    /// Decodes a model from JSON of the form
    /// `{"tables": [{"name": ..., "columns": [{"name": ..., "type": ...}]}]}`.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Json`](crate::QueryError::Json) if the input
    /// does not match that shape.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl TableDef {
    /// Creates a table definition with no columns.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    /// Adds a column.
    #[must_use]
    pub fn column(mut self, name: impl Into<String>, data_type: impl Into<String>) -> Self {
        self.columns.push(ColumnDef {
            name: name.into(),
            data_type: data_type.into(),
        });
        self
    }
}
