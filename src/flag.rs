//! Selection flags and the `flag` value grammar.

use crate::diagnostics::DiagnosticSink;
use crate::document::Location;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flag {
    #[default]
    None,
    Focus,
    Skip,
}

/// Read a space-separated flag list.
///
/// `FOCUS` and `PENDING` are recognized. Any other all-uppercase word is
/// ignored with a warning. When both recognized words appear, `PENDING`
/// is kept.
pub fn read_flag(text: &str, location: &Location, sink: &mut dyn DiagnosticSink) -> Flag {
    let mut focus = false;
    let mut pending = false;

    for word in text.split_whitespace() {
        match word {
            "FOCUS" => focus = true,
            "PENDING" => pending = true,
            _ if is_upper_case(word) => sink.warn(
                Some(location),
                &format!(
                    "Unrecognized all uppercase flag \"{}\". It has been ignored.",
                    word
                ),
            ),
            _ => {}
        }
    }

    if focus && pending {
        sink.warn(
            Some(location),
            "Both FOCUS and PENDING have been found among the flags of a node. PENDING has been kept.",
        );
    }

    if pending {
        Flag::Skip
    } else if focus {
        Flag::Focus
    } else {
        Flag::None
    }
}

/// True if the word only consists of letters in `A-Z`.
fn is_upper_case(word: &str) -> bool {
    !word.is_empty() && word.chars().all(|c| c.is_ascii_uppercase())
}
