//! Error types for the spec engine.
//!
//! Build errors reject a node (or a whole document when raised at its
//! root). Populate errors are collected rather than short-circuited so a
//! single bad key never hides the others.

use crate::document::Location;
use std::fmt;
use thiserror::Error;

/// Failure to follow an alias node.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AliasError {
    #[error("unknown anchor '{name}'")]
    Unknown { name: String },

    #[error("cannot resolve alias '{name}': resolution depth {depth} exceeded")]
    DepthExceeded { name: String, depth: usize },
}

/// Malformed tree shape found while building the spec tree.
#[derive(Debug, Clone, Error)]
pub enum BuildError {
    #[error("({location}): expected a mapping")]
    NotAMapping { location: Location },

    #[error("({location}): the \"content\" value must be a sequence")]
    ContentNotSequence { location: Location },

    #[error("({location}): the \"flag\" value must be a string")]
    FlagNotString { location: Location },

    #[error("({location}): the \"name\" value must be a scalar")]
    NameNotScalar { location: Location },

    #[error("({location}): mapping keys must be scalars")]
    NonStringKey { location: Location },

    #[error("({location}): {source}")]
    Alias {
        location: Location,
        #[source]
        source: AliasError,
    },
}

impl BuildError {
    /// Location of the node that could not be built.
    pub fn location(&self) -> &Location {
        match self {
            BuildError::NotAMapping { location }
            | BuildError::ContentNotSequence { location }
            | BuildError::FlagNotString { location }
            | BuildError::NameNotScalar { location }
            | BuildError::NonStringKey { location }
            | BuildError::Alias { location, .. } => location,
        }
    }
}

/// Unexpected value shape found while populating a data matrix.
#[derive(Debug, Clone, Error)]
#[error("({location}): {message}")]
pub struct PopulateError {
    pub location: Location,
    pub message: String,
}

impl PopulateError {
    /// Error attached to the node at `location`.
    pub fn new(location: &Location, message: impl Into<String>) -> Self {
        Self {
            location: location.clone(),
            message: message.into(),
        }
    }
}

/// Every populate error gathered over a subtree.
#[derive(Debug, Clone, Default)]
pub struct PopulateErrors(pub Vec<PopulateError>);

impl PopulateErrors {
    /// True when nothing was collected.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of collected errors.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Record one more error.
    pub fn push(&mut self, error: PopulateError) {
        self.0.push(error);
    }

    /// Collected errors in the order they were found.
    pub fn iter(&self) -> impl Iterator<Item = &PopulateError> {
        self.0.iter()
    }

    /// `Ok(())` when nothing was collected.
    pub fn into_result(self) -> Result<(), PopulateErrors> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for PopulateErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, error) in self.0.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for PopulateErrors {}

/// Errors that can occur while assembling or configuring a run.
#[derive(Debug, Error)]
pub enum SpecError {
    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Populate(#[from] PopulateErrors),

    #[error("failed to load config {path}: {message}")]
    Config { path: String, message: String },

    #[error("failed to load {path}: {message}")]
    Load { path: String, message: String },
}

/// Result type for spec operations.
pub type SpecResult<T> = Result<T, SpecError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_populate_errors_join_lines() {
        let location = Location::new("suite.yaml", "/content/0");
        let mut errors = PopulateErrors::default();
        errors.push(PopulateError::new(&location, "first"));
        errors.push(PopulateError::new(&location, "second"));

        let text = errors.to_string();
        assert_eq!(
            text,
            "(suite.yaml#/content/0): first\n(suite.yaml#/content/0): second"
        );
        assert!(errors.into_result().is_err());
    }

    #[test]
    fn test_empty_populate_errors_is_ok() {
        assert!(PopulateErrors::default().into_result().is_ok());
    }
}
