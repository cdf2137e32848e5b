//! Per-tile context handed to the callback.

use crate::diff::diff_values;
use serde::Serialize;

/// Terminal status of a tile.
///
/// Ordered by severity, so the worst status of a leaf is the maximum of
/// its tiles' statuses.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TileStatus {
    #[default]
    Pristine,
    Failed,
    Aborted,
    Panicked,
}

impl TileStatus {
    /// Word used in failure report lines.
    pub fn word(self) -> &'static str {
        match self {
            TileStatus::Pristine => "PASS",
            TileStatus::Failed => "FAIL",
            TileStatus::Aborted => "ABORT",
            TileStatus::Panicked => "PANIC",
        }
    }
}

/// Proof that [`Context::abort`] was called. Return it from the callback
/// to leave the tile early; dropping it lets the callback run on.
#[derive(Debug)]
#[must_use = "return the token from the callback to stop the tile"]
pub struct Abort {
    _private: (),
}

/// Outcome of one callback invocation.
pub type BoxResult = Result<(), Abort>;

/// State of the tile being executed.
#[derive(Debug, Default)]
pub struct Context {
    status: TileStatus,
    messages: Vec<String>,
}

impl Context {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Worst status recorded so far.
    pub fn status(&self) -> TileStatus {
        self.status
    }

    /// Messages recorded so far, oldest first.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub(crate) fn into_messages(self) -> Vec<String> {
        self.messages
    }

    /// Mark the tile as failed. May be called several times; every
    /// message is reported. Never downgrades an aborted tile.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.push(message.into());
        if self.status == TileStatus::Pristine {
            self.status = TileStatus::Failed;
        }
    }

    /// Mark the tile as aborted.
    ///
    /// ```ignore
    /// let count = match tile.parse::<i32>("count") {
    ///     Ok(count) => count,
    ///     Err(e) => return Err(ctx.abort(e.to_string())),
    /// };
    /// ```
    #[must_use = "return the token from the callback to stop the tile"]
    pub fn abort(&mut self, message: impl Into<String>) -> Abort {
        self.push(message.into());
        if self.status < TileStatus::Aborted {
            self.status = TileStatus::Aborted;
        }
        Abort { _private: () }
    }

    /// Compare two values structurally and fail with a diff when they
    /// differ. Returns whether they were equal.
    pub fn expect_equal<A, E>(&mut self, actual: &A, expected: &E, label: &str) -> bool
    where
        A: Serialize + ?Sized,
        E: Serialize + ?Sized,
    {
        let prefix = if label.is_empty() {
            String::new()
        } else {
            format!("({}): ", label)
        };

        let (actual, expected) = match serde_yaml::to_value(actual)
            .and_then(|actual| Ok((actual, serde_yaml::to_value(expected)?)))
        {
            Ok(pair) => pair,
            Err(e) => {
                self.fail(format!("{}cannot compare values: {}", prefix, e));
                return false;
            }
        };

        let diffs = diff_values(&actual, &expected);
        if diffs.is_empty() {
            true
        } else {
            self.fail(format!("{}{}", prefix, diffs.join(", ")));
            false
        }
    }

    pub(crate) fn mark_panicked(&mut self, report: String) {
        self.push(report);
        self.status = TileStatus::Panicked;
    }

    fn push(&mut self, message: String) {
        if !message.is_empty() {
            self.messages.push(message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Book {
        title: &'static str,
        left_page: i32,
    }

    #[test]
    fn test_fail_accumulates() {
        let mut ctx = Context::new();
        ctx.fail("first");
        ctx.fail("");
        ctx.fail("second");
        assert_eq!(ctx.status(), TileStatus::Failed);
        assert_eq!(ctx.messages(), &["first".to_string(), "second".to_string()]);
    }

    #[test]
    fn test_fail_does_not_downgrade_abort() {
        let mut ctx = Context::new();
        let _ = ctx.abort("stop");
        ctx.fail("late");
        assert_eq!(ctx.status(), TileStatus::Aborted);
        assert_eq!(ctx.messages().len(), 2);
    }

    #[test]
    fn test_returned_abort_ends_the_callback() {
        fn callback(ctx: &mut Context, count: Option<i64>) -> BoxResult {
            let count = match count {
                Some(count) => count,
                None => return Err(ctx.abort("missing count")),
            };
            ctx.fail(format!("ran with {}", count));
            Ok(())
        }

        let mut ctx = Context::new();
        assert!(callback(&mut ctx, None).is_err());
        assert_eq!(ctx.status(), TileStatus::Aborted);
        assert_eq!(ctx.messages(), &["missing count".to_string()]);
    }

    #[test]
    fn test_expect_equal_reports_diff() {
        let mut ctx = Context::new();
        let actual = Book {
            title: "aleph",
            left_page: 7,
        };
        let expected = Book {
            title: "aleph",
            left_page: 8,
        };
        assert!(!ctx.expect_equal(&actual, &expected, "result comparison"));
        assert_eq!(
            ctx.messages(),
            &["(result comparison): left_page: 7 != 8".to_string()]
        );
    }

    #[test]
    fn test_expect_equal_passes() {
        let mut ctx = Context::new();
        assert!(ctx.expect_equal(&4, &4, ""));
        assert!(ctx.expect_equal("deer", "deer", "name"));
        assert_eq!(ctx.status(), TileStatus::Pristine);
    }

    #[test]
    fn test_status_order() {
        assert!(TileStatus::Pristine < TileStatus::Failed);
        assert!(TileStatus::Failed < TileStatus::Aborted);
        assert!(TileStatus::Aborted < TileStatus::Panicked);
    }
}
