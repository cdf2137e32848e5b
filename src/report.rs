//! Aggregate outcome of a run.

use crate::document::Location;
use crate::focus::FlagStat;
use crate::harness::TileStatus;
use std::time::Duration;

/// Number of tiles (or leaves) that ended in each status.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StatusCounts {
    pub passed: usize,
    pub failed: usize,
    pub aborted: usize,
    pub panicked: usize,
}

impl StatusCounts {
    /// Count one more tile or leaf with `status`.
    pub fn record(&mut self, status: TileStatus) {
        match status {
            TileStatus::Pristine => self.passed += 1,
            TileStatus::Failed => self.failed += 1,
            TileStatus::Aborted => self.aborted += 1,
            TileStatus::Panicked => self.panicked += 1,
        }
    }

    /// Everything recorded.
    pub fn total(&self) -> usize {
        self.passed + self.failed + self.aborted + self.panicked
    }

    /// Count of everything that did not pass.
    pub fn unsuccessful(&self) -> usize {
        self.failed + self.aborted + self.panicked
    }
}

/// A tile that did not end `Pristine`.
#[derive(Debug, Clone, PartialEq)]
pub struct FailureRecord {
    pub status: TileStatus,
    /// Location of the leaf the tile was drawn from.
    pub location: Location,
    pub name: Option<String>,
    /// Position of the tile within its leaf, from zero.
    pub index: usize,
    pub messages: Vec<String>,
}

/// Everything a run produced.
#[derive(Debug, Default, Clone)]
pub struct Report {
    pub tiles: StatusCounts,
    /// Leaves counted by the worst status among their tiles.
    pub leaves: StatusCounts,
    pub failures: Vec<FailureRecord>,
    pub flag_stat: FlagStat,
    /// Documents excluded before the run, with the reason.
    pub rejected: Vec<String>,
    pub elapsed: Duration,
}

impl Report {
    /// An empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// True when every tile passed.
    pub fn is_success(&self) -> bool {
        self.tiles.unsuccessful() == 0
    }

    /// `SUCCESS` or `FAILURE`.
    pub fn outcome(&self) -> &'static str {
        if self.is_success() {
            "SUCCESS"
        } else {
            "FAILURE"
        }
    }
}
