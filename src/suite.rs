//! Assembly of documents into one runnable tree.

use crate::config::RunConfig;
use crate::diagnostics::DiagnosticSink;
use crate::document::{Document, Location};
use crate::focus::{extract_selected_leaves, FlagStat, Selection};
use crate::harness::{run_selection, BoxResult, Context};
use crate::multimap::{OrderedMultiMap, Tile};
use crate::node::{build, TestNode};
use crate::report::Report;
use serde_yaml::Value;

/// Accepted documents under a synthetic root, plus the ones turned away.
#[derive(Debug, Clone)]
pub struct Suite {
    root: TestNode,
    rejected: Vec<String>,
}

impl Suite {
    /// Build and populate every document.
    ///
    /// A document is kept only when both steps succeed. The others are
    /// recorded as rejected and reported through `sink`; they never stop
    /// the remaining documents from loading.
    pub fn build(documents: &[Document], config: &RunConfig, sink: &mut dyn DiagnosticSink) -> Self {
        let mut suite = Suite {
            root: TestNode::group(Location::new("", ""), Vec::new()),
            rejected: Vec::new(),
        };

        for document in documents {
            let mut node = match build(document, config, sink) {
                Ok(node) => node,
                Err(e) => {
                    sink.error(Some(e.location()), "document rejected: it could not be built");
                    suite.reject(e.to_string());
                    continue;
                }
            };

            let mut inherited = OrderedMultiMap::new();
            inherited.set(
                config.filepath_key.as_str(),
                vec![Value::String(document.path.to_string())],
            );

            match node.populate(&inherited) {
                Ok(()) => suite.root.children.push(node),
                Err(errors) => {
                    for error in errors.iter() {
                        sink.error(Some(&error.location), &error.message);
                    }
                    suite.reject(errors.to_string());
                }
            }
        }

        log::debug!(
            "suite built: {} document(s) accepted, {} rejected",
            suite.root.children.len(),
            suite.rejected.len()
        );
        suite
    }

    /// Record a document that never made it into the tree.
    pub fn reject(&mut self, reason: impl Into<String>) {
        self.rejected.push(reason.into());
    }

    /// Synthetic root holding one child per accepted document.
    pub fn root(&self) -> &TestNode {
        &self.root
    }

    /// Reasons for every rejected document.
    pub fn rejected(&self) -> &[String] {
        &self.rejected
    }

    /// Leaves that would run, honoring focus and pending flags.
    pub fn select(&self, sink: &mut dyn DiagnosticSink) -> Selection<'_, TestNode> {
        if self.root.children.is_empty() {
            return Selection {
                leaves: Vec::new(),
                stat: FlagStat::default(),
            };
        }
        extract_selected_leaves(&self.root, sink)
    }

    /// Run the selected leaves against `callback`.
    pub fn run<F>(&self, callback: F, config: &RunConfig, sink: &mut dyn DiagnosticSink) -> Report
    where
        F: FnMut(&mut Context, &Tile) -> BoxResult,
    {
        let selection = self.select(sink);
        let mut report = run_selection(&selection, config, callback);
        report.rejected = self.rejected.clone();
        report
    }
}

/// Build the documents and run them in one go.
pub fn run<F>(
    documents: &[Document],
    callback: F,
    config: &RunConfig,
    sink: &mut dyn DiagnosticSink,
) -> Report
where
    F: FnMut(&mut Context, &Tile) -> BoxResult,
{
    Suite::build(documents, config, sink).run(callback, config, sink)
}
