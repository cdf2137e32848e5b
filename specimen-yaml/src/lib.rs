//! YAML front end for `specimen`.
//!
//! Spec files are plain YAML. Each document of a file becomes one
//! [`specimen::Document`]; the documents of every file are then assembled
//! into a single suite and run.
//!
//! ## Modules
//!
//! - [`file`] - In-memory and on-disk spec sources
//! - [`loader`] - YAML parsing and directory discovery
//! - [`runner`] - One-call loading and execution
//! - [`errors`] - Load errors

pub mod errors;
pub mod file;
pub mod loader;
pub mod runner;

pub use errors::LoadError;
pub use file::{dedent, File};
pub use loader::{find_spec_files, load_dir, load_documents};
pub use runner::run_files;
