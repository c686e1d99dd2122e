//! Error types for query construction and rendering.

use thiserror::Error;

/// Errors raised while validating, building, or rendering a query.
#[derive(Debug, Error)]
pub enum QueryError {
    /// A table or field name is not present in the registry.
    #[error("unknown {kind} '{name}': not present in schema")]
    SchemaValidation {
        /// What was looked up (`table` or `field`).
        kind: &'static str,
        /// The rejected name.
        name: String,
    },

    /// A parameter name or alias failed the lexical rules.
    #[error("invalid {kind} '{name}': {reason}")]
    IdentifierValidation {
        /// What was validated (`parameter` or `alias`).
        kind: &'static str,
        /// The rejected name.
        name: String,
        /// The rule that was broken.
        reason: String,
    },

    /// An operator was used with a construct that cannot carry it.
    #[error("operator {operator} cannot be used in {context}")]
    OperatorMismatch {
        /// SQL text of the operator.
        operator: &'static str,
        /// The construct it was used with.
        context: &'static str,
    },

    /// A builder method is illegal for the builder's operation.
    #[error("{method}() is not allowed on {operation} queries")]
    BuilderState {
        /// The method that was called.
        method: &'static str,
        /// The operation the builder was created for.
        operation: &'static str,
    },

    /// The tree is missing something its shape requires.
    #[error("structural error: {0}")]
    Structural(String),

    /// The chosen dialect has no way to express a construct.
    #[error("{construct} is not supported by the {dialect} dialect")]
    Render {
        /// Name of the dialect.
        dialect: &'static str,
        /// The construct that cannot be rendered.
        construct: String,
    },

    /// The schema model handed to the registry is empty or malformed.
    #[error("schema error: {0}")]
    Schema(String),

    /// A schema model could not be decoded from JSON.
    #[error("schema decode error: {0}")]
    Json(#[from] serde_json::Error),
}

impl QueryError {
    /// Creates a structural error.
    pub fn structural(message: impl Into<String>) -> Self {
        Self::Structural(message.into())
    }

    /// Creates a schema error.
    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema(message.into())
    }

    /// Creates a render error for `dialect`.
    pub fn unsupported(dialect: &'static str, construct: impl Into<String>) -> Self {
        Self::Render {
            dialect,
            construct: construct.into(),
        }
    }

    /// Returns `true` for errors recorded by a builder method.
    #[must_use]
    pub const fn is_builder_state(&self) -> bool {
        matches!(self, Self::BuilderState { .. })
    }

    /// Returns `true` for dialect render errors.
    #[must_use]
    pub const fn is_render(&self) -> bool {
        matches!(self, Self::Render { .. })
    }
}

/// Result type alias for query operations.
pub type Result<T> = std::result::Result<T, QueryError>;
