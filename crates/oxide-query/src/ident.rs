//! Lexical validation for parameter names and aliases.
//!
//! Table and field names are never checked here: they are accepted only
//! when they already exist in a [`Registry`](crate::Registry). Parameter
//! names and aliases have no schema to check against, so they must pass
//! these rules instead:
//!
//! - non-empty, first character an ASCII letter
//! - remaining characters ASCII letters, digits, or `_`
//! - not a reserved keyword (case-insensitive)
//! - none of `--`, `/*`, `*/`, `'`, `"`, `;`, `\`
//! - no whitespace

use crate::error::{QueryError, Result};

/// Keywords that may never be used as a parameter name or alias.
pub const RESERVED_KEYWORDS: &[&str] = &[
    "select", "insert", "update", "delete", "drop", "create", "alter", "truncate", "table", "from",
    "where", "and", "or", "not", "null", "true", "false", "union", "join", "having", "group",
    "order", "exec", "execute", "grant", "revoke",
];

/// Character sequences that start comments, close literals, or end statements.
pub const FORBIDDEN_SEQUENCES: &[&str] = &["--", "/*", "*/", "'", "\"", ";", "\\"];

/// Returns `true` if `name` is acceptable as a bind-parameter name.
#[must_use]
pub fn is_valid_param_name(name: &str) -> bool {
    check("parameter", name).is_ok()
}

/// Returns `true` if `name` is acceptable as a rendered SQL alias.
#[must_use]
pub fn is_valid_identifier(name: &str) -> bool {
    check("alias", name).is_ok()
}

/// Validates a bind-parameter name.
///
/// # Errors
///
/// Returns [`QueryError::IdentifierValidation`] naming the broken rule.
pub fn validate_param_name(name: &str) -> Result<()> {
    check("parameter", name)
}

/// Validates an alias.
///
/// # Errors
///
/// Returns [`QueryError::IdentifierValidation`] naming the broken rule.
pub fn validate_identifier(name: &str) -> Result<()> {
    check("alias", name)
}

/// Returns `true` if `word` is reserved, ignoring ASCII case.
#[must_use]
pub fn is_reserved_keyword(word: &str) -> bool {
    RESERVED_KEYWORDS
        .iter()
        .any(|kw| kw.eq_ignore_ascii_case(word))
}

fn check(kind: &'static str, name: &str) -> Result<()> {
    let reject = |reason: String| QueryError::IdentifierValidation {
        kind,
        name: name.to_string(),
        reason,
    };

    let Some(first) = name.chars().next() else {
        return Err(reject(String::from("must not be empty")));
    };
    if let Some(seq) = FORBIDDEN_SEQUENCES.iter().find(|seq| name.contains(*seq)) {
        return Err(reject(format!("contains forbidden sequence {seq}")));
    }
    if name.chars().any(char::is_whitespace) {
        return Err(reject(String::from("contains whitespace")));
    }
    if !first.is_ascii_alphabetic() {
        return Err(reject(format!("must start with a letter, got '{first}'")));
    }
    if let Some(c) = name.chars().find(|c| !c.is_ascii_alphanumeric() && *c != '_') {
        return Err(reject(format!("invalid character '{c}'")));
    }
    if is_reserved_keyword(name) {
        return Err(reject(String::from("is a reserved keyword")));
    }
    Ok(())
}
