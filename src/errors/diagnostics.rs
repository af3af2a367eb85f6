use std::fmt::Display;

use tracing::trace;

use crate::Position;

use super::errors::{Error, ErrorImpl};

/// Ordered collection of the diagnostics reported during one compilation.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    entries: Vec<Error>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: Error) {
        trace!(%error, "diagnostic");
        self.entries.push(error);
    }

    /// Records an error. Any error blocks code generation.
    pub fn fatal(&mut self, error_impl: ErrorImpl, position: Position) {
        self.push(Error::new(error_impl, position));
    }

    pub fn warn(&mut self, error_impl: ErrorImpl, position: Position) {
        self.push(Error::warning(error_impl, position));
    }

    pub fn extend(&mut self, errors: impl IntoIterator<Item = Error>) {
        for error in errors {
            self.push(error);
        }
    }

    pub fn has_errors(&self) -> bool {
        self.entries.iter().any(Error::is_fatal)
    }

    pub fn error_count(&self) -> usize {
        self.entries.iter().filter(|error| error.is_fatal()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.entries.len() - self.error_count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Error> {
        self.entries.iter()
    }

    /// The rendered message of every diagnostic, without positions.
    pub fn messages(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|error| error.get_internal_error().to_string())
            .collect()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Error;
    type IntoIter = std::slice::Iter<'a, Error>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl Display for Diagnostics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for error in &self.entries {
            writeln!(f, "{}", error)?;
        }
        Ok(())
    }
}
