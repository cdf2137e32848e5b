//! Spec sources, on disk or in memory.

use crate::errors::LoadError;
use std::fs;
use std::path::Path;

/// A named chunk of YAML text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    pub path: String,
    pub content: String,
}

impl File {
    /// Read a file from the local file system.
    pub fn read_local(path: impl AsRef<Path>) -> Result<File, LoadError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(File {
            path: path.display().to_string(),
            content,
        })
    }

    /// A file that only exists in memory. `path` is used for reporting.
    pub fn virtual_file(path: impl Into<String>, content: impl Into<String>) -> File {
        File {
            path: path.into(),
            content: content.into(),
        }
    }

    /// Like [`File::virtual_file`], with `content` passed through [`dedent`]
    /// so it can be written inline in indented Rust source.
    pub fn virtual_dedent(path: impl Into<String>, content: &str) -> File {
        File::virtual_file(path, dedent(content))
    }
}

/// Remove the common leading spaces of every line.
///
/// Leading empty lines are dropped. Only lines with some non-space
/// character count toward the margin; tabs are not stripped.
pub fn dedent(text: &str) -> String {
    let text = text.trim_start_matches('\n');

    let margin = text
        .lines()
        .filter(|line| line.chars().any(|c| c != ' '))
        .map(|line| line.len() - line.trim_start_matches(' ').len())
        .min()
        .unwrap_or(0);

    text.split('\n')
        .map(|line| {
            let spaces = line.len() - line.trim_start_matches(' ').len();
            &line[spaces.min(margin)..]
        })
        .collect::<Vec<_>>()
        .join("\n")
}
