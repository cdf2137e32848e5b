//! Text rendering of run reports.

use crate::report::{FailureRecord, Report};
use std::fmt;

impl fmt::Display for FailureRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}][{}]: {}",
            self.status.word(),
            self.location,
            self.index,
            self.messages.join("; ")
        )
    }
}

/// One line per tile that did not pass.
pub fn format_failure(record: &FailureRecord) -> String {
    record.to_string()
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for failure in &self.failures {
            writeln!(f, "{}", failure)?;
        }

        if !self.rejected.is_empty() {
            writeln!(f, "Rejected {} document(s)", self.rejected.len())?;
            for reason in &self.rejected {
                writeln!(f, "  {}", reason)?;
            }
        }

        let stat = &self.flag_stat;
        if stat.any() {
            let mut parts = Vec::new();
            if stat.focus_count > 0 {
                parts.push(format!("{} focused node(s)", stat.focus_count));
            }
            if stat.skip_count > 0 {
                parts.push(format!("{} pending node(s)", stat.skip_count));
            }
            writeln!(f, "Encountered {}", parts.join(" and "))?;
        }

        writeln!(
            f,
            "Ran {} tiles in {}ms",
            self.tiles.total(),
            self.elapsed.as_millis()
        )?;
        write!(
            f,
            "{} -- {} Passed | {} Failed | {} Aborted | {} Panicked",
            self.outcome(),
            self.tiles.passed,
            self.tiles.failed,
            self.tiles.aborted,
            self.tiles.panicked
        )
    }
}

/// Format the full summary of a run.
pub fn format_report(report: &Report) -> String {
    report.to_string()
}
