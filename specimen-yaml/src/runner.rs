//! Load YAML files and run them in one call.

use crate::file::File;
use crate::loader::load_documents;
use specimen::{BoxResult, Context, DiagnosticSink, Report, RunConfig, Suite, Tile};

/// Load `files`, build a suite from every document and run it.
///
/// Files that fail to parse are reported through `sink` and listed among
/// the rejected documents of the returned report; the other files still
/// run.
pub fn run_files<F>(
    files: &[File],
    callback: F,
    config: &RunConfig,
    sink: &mut dyn DiagnosticSink,
) -> Report
where
    F: FnMut(&mut Context, &Tile) -> BoxResult,
{
    let mut documents = Vec::new();
    let mut unreadable = Vec::new();

    for file in files {
        match load_documents(file) {
            Ok(loaded) => documents.extend(loaded),
            Err(e) => {
                sink.error(None, &e.to_string());
                unreadable.push(e.to_string());
            }
        }
    }

    let mut suite = Suite::build(&documents, config, sink);
    for reason in unreadable {
        suite.reject(reason);
    }
    suite.run(callback, config, sink)
}
