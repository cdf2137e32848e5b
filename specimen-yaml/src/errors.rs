//! Error types for loading YAML spec files.

use specimen::{BuildError, SpecError};
use thiserror::Error;

/// Errors that can occur while turning a file into documents.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The content is not valid YAML.
    #[error("invalid YAML in {path}: {source}")]
    Yaml {
        path: String,
        #[source]
        source: yaml_rust2::scanner::ScanError,
    },

    /// The YAML is valid but cannot form a document tree.
    #[error(transparent)]
    Build(#[from] BuildError),
}

impl LoadError {
    /// Path of the file the error belongs to.
    pub fn path(&self) -> &str {
        match self {
            LoadError::Io { path, .. } | LoadError::Yaml { path, .. } => path.as_str(),
            LoadError::Build(e) => &*e.location().file,
        }
    }
}

impl From<LoadError> for SpecError {
    fn from(e: LoadError) -> Self {
        SpecError::Load {
            path: e.path().to_string(),
            message: e.to_string(),
        }
    }
}
