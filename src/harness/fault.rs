//! Containment of panics raised inside tile callbacks.
//!
//! A process-wide panic hook is installed once. While a callback runs on
//! the current thread, the hook records the panic location and, when
//! asked, a backtrace into thread-local storage instead of printing.
//! Outside of callbacks the previously installed hook runs unchanged.

use std::any::Any;
use std::backtrace::Backtrace;
use std::cell::{Cell, RefCell};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Once;

thread_local! {
    static CAPTURING: Cell<bool> = Cell::new(false);
    static WANT_TRACE: Cell<bool> = Cell::new(false);
    static CAPTURED: RefCell<Option<Captured>> = RefCell::new(None);
}

static INSTALL_HOOK: Once = Once::new();

struct Captured {
    location: Option<String>,
    trace: Option<String>,
}

/// A panic caught at a tile boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fault {
    pub message: String,
    pub location: Option<String>,
    pub trace: Option<String>,
}

impl Fault {
    /// Report text appended to the tile's messages.
    pub fn report(&self) -> String {
        let mut report = match &self.location {
            Some(location) => format!("\n>>> {} (at {})", self.message, location),
            None => format!("\n>>> {}", self.message),
        };
        if let Some(trace) = &self.trace {
            for line in trace.trim_end().lines() {
                report.push_str("\n>   ");
                report.push_str(line);
            }
        }
        report
    }
}

fn install_hook() {
    INSTALL_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if !CAPTURING.with(Cell::get) {
                previous(info);
                return;
            }
            let trace = if WANT_TRACE.with(Cell::get) {
                Some(Backtrace::force_capture().to_string())
            } else {
                None
            };
            let location = info.location().map(|l| l.to_string());
            CAPTURED.with(|c| *c.borrow_mut() = Some(Captured { location, trace }));
        }));
    });
}

/// Run `f`, converting a panic into a [`Fault`].
pub fn catch_fault<R>(capture_backtrace: bool, f: impl FnOnce() -> R) -> Result<R, Fault> {
    install_hook();

    let was_capturing = CAPTURING.with(|c| c.replace(true));
    let wanted_trace = WANT_TRACE.with(|c| c.replace(capture_backtrace));
    CAPTURED.with(|c| c.borrow_mut().take());

    let result = panic::catch_unwind(AssertUnwindSafe(f));

    CAPTURING.with(|c| c.set(was_capturing));
    WANT_TRACE.with(|c| c.set(wanted_trace));

    result.map_err(|payload| {
        let captured = CAPTURED.with(|c| c.borrow_mut().take());
        let (location, trace) = match captured {
            Some(Captured { location, trace }) => (location, trace),
            None => (None, None),
        };
        Fault {
            message: payload_text(&*payload),
            location,
            trace,
        }
    })
}

fn payload_text(payload: &(dyn Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        text.to_string()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
