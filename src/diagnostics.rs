//! Diagnostic sink passed explicitly through build, selection and runs.

use crate::document::Location;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

/// A non-fatal message about the spec tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub location: Option<Location>,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let word = match self.severity {
            Severity::Warning => "Warning",
            Severity::Error => "Error",
        };
        match &self.location {
            Some(location) => write!(f, "{}: ({}): {}", word, location, self.message),
            None => write!(f, "{}: {}", word, self.message),
        }
    }
}

/// Receives warnings and errors emitted while processing a run.
pub trait DiagnosticSink {
    fn emit(&mut self, diagnostic: Diagnostic);

    fn warn(&mut self, location: Option<&Location>, message: &str) {
        self.emit(Diagnostic {
            severity: Severity::Warning,
            location: location.cloned(),
            message: message.to_string(),
        });
    }

    fn error(&mut self, location: Option<&Location>, message: &str) {
        self.emit(Diagnostic {
            severity: Severity::Error,
            location: location.cloned(),
            message: message.to_string(),
        });
    }
}

/// Forwards diagnostics to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn emit(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Warning => log::warn!("{}", diagnostic),
            Severity::Error => log::error!("{}", diagnostic),
        }
    }
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn emit(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}
