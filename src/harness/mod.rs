//! Execution of selected leaves against a callback.
//!
//! Each tile runs with a fresh [`Context`]. Failing, aborting or panicking
//! only ever ends the current tile; the run always completes and returns a
//! [`Report`].

mod codebox;
mod context;
mod fault;

pub use codebox::CodeboxSet;
pub use context::{Abort, BoxResult, Context, TileStatus};
pub use fault::{catch_fault, Fault};

use crate::config::RunConfig;
use crate::focus::Selection;
use crate::multimap::Tile;
use crate::node::TestNode;
use crate::report::{FailureRecord, Report};
use std::time::Instant;

/// Run every tile of every selected leaf.
pub fn run_selection<F>(
    selection: &Selection<'_, TestNode>,
    config: &RunConfig,
    mut callback: F,
) -> Report
where
    F: FnMut(&mut Context, &Tile) -> BoxResult,
{
    let mut report = Report::new();
    report.flag_stat = selection.stat;

    let start = Instant::now();
    for leaf in &selection.leaves {
        run_leaf(leaf, config, &mut callback, &mut report);
    }
    report.elapsed = start.elapsed();

    log::debug!(
        "ran {} tiles from {} leaves in {:?}",
        report.tiles.total(),
        report.leaves.total(),
        report.elapsed
    );
    report
}

fn run_leaf<F>(leaf: &TestNode, config: &RunConfig, callback: &mut F, report: &mut Report)
where
    F: FnMut(&mut Context, &Tile) -> BoxResult,
{
    log::debug!("running leaf {}", leaf.label());

    let mut worst = TileStatus::Pristine;
    for (index, tile) in leaf.resolved_matrix.tiles().enumerate() {
        log::trace!("tile {} of {}: {:?}", index, leaf.location, tile);

        let ctx = run_tile(callback, &tile, config.capture_backtrace);
        let status = ctx.status();
        report.tiles.record(status);
        worst = worst.max(status);

        if status != TileStatus::Pristine {
            report.failures.push(FailureRecord {
                status,
                location: leaf.location.clone(),
                name: leaf.name.clone(),
                index,
                messages: ctx.into_messages(),
            });
        }
    }
    report.leaves.record(worst);
}

/// Run the callback once, containing any panic it raises.
pub fn run_tile<F>(callback: &mut F, tile: &Tile, capture_backtrace: bool) -> Context
where
    F: FnMut(&mut Context, &Tile) -> BoxResult,
{
    let mut ctx = Context::new();
    let outcome = catch_fault(capture_backtrace, || callback(&mut ctx, tile));

    match outcome {
        Ok(Ok(())) => {}
        Ok(Err(_)) => debug_assert_eq!(ctx.status(), TileStatus::Aborted),
        Err(fault) => {
            // A tile that already aborted keeps that status.
            if ctx.status() == TileStatus::Aborted {
                ctx.fail(fault.report());
            } else {
                ctx.mark_panicked(fault.report());
            }
        }
    }
    ctx
}
