//! Bind-parameter bookkeeping for a single render pass.

use std::collections::BTreeMap;

use crate::ast::{Param, ParamKind};
use crate::dialect::{Dialect, PlaceholderStyle};
use crate::error::{QueryError, Result};

/// Collects parameter names in first-occurrence order.
///
/// One collector is shared by the outer query and all of its subqueries,
/// so a name used at two nesting levels is still required only once.
#[derive(Debug, Default)]
pub struct ParamCollector {
    names: Vec<String>,
    positions: BTreeMap<String, usize>,
    occurrences: Vec<String>,
    slots: BTreeMap<usize, String>,
    conflict: Option<QueryError>,
}

impl ParamCollector {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Records `param` and returns its placeholder in `dialect` syntax.
    pub(crate) fn placeholder(&mut self, dialect: &dyn Dialect, param: &Param) -> String {
        let name = param.name();
        let first_seen = match self.positions.get(name) {
            Some(&position) => position,
            None => {
                self.names.push(name.to_string());
                let position = self.names.len();
                self.positions.insert(name.to_string(), position);
                position
            }
        };
        self.occurrences.push(name.to_string());

        let position = match param.kind() {
            ParamKind::Named => first_seen,
            ParamKind::Positional => param.index(),
        };
        if dialect.placeholder_style() == PlaceholderStyle::Numbered {
            self.claim_slot(position, name);
        }
        dialect.placeholder(name, position)
    }

    /// Binds `$position` to `name`; a second name on the same slot is kept
    /// as the first conflict and reported by [`Self::finish`].
    fn claim_slot(&mut self, position: usize, name: &str) {
        match self.slots.get(&position) {
            Some(owner) if owner != name => {
                if self.conflict.is_none() {
                    self.conflict = Some(QueryError::structural(format!(
                        "placeholder ${position} is bound to both '{owner}' and '{name}'; \
                         do not mix named and positional parameters with numbered placeholders"
                    )));
                }
            }
            Some(_) => {}
            None => {
                self.slots.insert(position, name.to_string());
            }
        }
    }

    /// Returns `(required_params, param_occurrences)`.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Structural`] if two different parameters were
    /// given the same numbered placeholder.
    pub(crate) fn finish(self) -> Result<(Vec<String>, Vec<String>)> {
        match self.conflict {
            Some(error) => Err(error),
            None => Ok((self.names, self.occurrences)),
        }
    }
}
