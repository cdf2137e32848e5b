//! Run configuration.

use crate::errors::SpecError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Configuration for building and running a suite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Maximum number of alias hops followed before giving up.
    pub alias_depth: usize,
    /// Name of the tile key identifying the source document.
    pub filepath_key: String,
    /// Record a backtrace for panicked tiles.
    pub capture_backtrace: bool,
}

impl RunConfig {
    pub const DEFAULT_ALIAS_DEPTH: usize = 90;

    /// Load from a TOML file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, SpecError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| SpecError::Config {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| SpecError::Config {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            alias_depth: Self::DEFAULT_ALIAS_DEPTH,
            filepath_key: "filepath".to_string(),
            capture_backtrace: true,
        }
    }
}
