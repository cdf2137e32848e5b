//! Data-driven test specifications.
//!
//! A specification is a tree of mappings. Every node may declare data keys,
//! and children (listed under `content`) inherit their parent's data. Keys
//! holding a sequence are axes: each leaf expands into the cartesian
//! product of its axes, one *tile* per combination, and every tile is
//! handed to a user callback.
//!
//! ## Overview
//!
//! ```ignore
//! use specimen::{run, LogSink, RunConfig};
//!
//! let report = run(&documents, |ctx, tile| {
//!     let expected: Book = tile.parse("expected_result").map_err(|e| ctx.abort(e.to_string()))?;
//!     ctx.expect_equal(&turn_page(tile), &expected, "result comparison");
//!     Ok(())
//! }, &RunConfig::default(), &mut LogSink);
//! println!("{}", report);
//! ```
//!
//! ## Modules
//!
//! - [`document`] - Generic document tree and source locations
//! - [`node`] - Spec tree built from a document
//! - [`flag`] - `FOCUS` / `PENDING` flag grammar
//! - [`focus`] - Selection of the leaves to run
//! - [`multimap`] - Inherited data matrix and tile expansion
//! - [`harness`] - Tile execution, contexts and codeboxes
//! - [`suite`] - Assembly of several documents into one run
//! - [`report`] - Run outcome
//! - [`formatter`] - Text rendering of reports
//! - [`diagnostics`] - Warning sinks
//! - [`config`] - Run configuration via TOML
//! - [`errors`] - Error types

pub mod config;
pub mod diagnostics;
pub mod diff;
pub mod document;
pub mod errors;
pub mod flag;
pub mod focus;
pub mod formatter;
pub mod harness;
pub mod multimap;
pub mod node;
mod populate;
pub mod report;
pub mod suite;

// Re-exports for convenient access to core types
pub use config::RunConfig;
pub use diagnostics::{Diagnostic, DiagnosticSink, LogSink, Severity};
pub use document::{Document, Location, Mark, Node, NodeKind, Scalar};
pub use errors::{
    AliasError, BuildError, PopulateError, PopulateErrors, SpecError, SpecResult,
};
pub use flag::Flag;
pub use focus::{extract_selected_leaves, FlagStat, FocusTree, Selection};
pub use formatter::{format_failure, format_report};
pub use harness::{Abort, BoxResult, CodeboxSet, Context, TileStatus};
pub use multimap::{OrderedMultiMap, Tile, Tiles};
pub use node::{build, Declaration, TestNode};
pub use report::{FailureRecord, Report, StatusCounts};
pub use suite::{run, Suite};
