//! Diagnostic accumulation.
//!
//! Errors are recorded at the detection site and construction continues;
//! overall success is "zero accumulated errors at the end", independent of
//! how many placeholder entities were synthesized along the way.

use lattice_identity::Location;

use crate::errors::{SemanticError, SemanticWarning};

/// A recorded error with the scanner position it was reported at.
#[derive(Debug, Clone)]
pub struct RecordedError {
    pub error: SemanticError,
    pub location: Location,
}

/// A recorded warning with the scanner position it was reported at.
#[derive(Debug, Clone)]
pub struct RecordedWarning {
    pub warning: SemanticWarning,
    pub location: Location,
}

/// Sink for everything the session reports. Suppression filtering happens
/// before a warning reaches this sink.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    errors: Vec<RecordedError>,
    warnings: Vec<RecordedWarning>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, error: SemanticError, location: Location) {
        self.errors.push(RecordedError { error, location });
    }

    pub fn warning(&mut self, warning: SemanticWarning, location: Location) {
        self.warnings.push(RecordedWarning { warning, location });
    }

    /// The fatal-error count; compilation succeeds only when this is zero.
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn errors(&self) -> &[RecordedError] {
        &self.errors
    }

    pub fn warnings(&self) -> &[RecordedWarning] {
        &self.warnings
    }
}
