//! Line classification (spec §4.2): deciding what a completed line means.

use at_core::constants::{FINAL_ERROR_PREFIXES, FINAL_OK_LINES};

/// The outcome of classifying one completed line.
///
/// Returned by [`crate::AtCallbacks::scan_line`] (or a one-shot scanner
/// override) and by the built-in default classifier that runs whenever a
/// hook defers with `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// The hook explicitly flags this line as unrecognized noise — not
    /// silently dropped, forwarded to the URC handler tagged as unexpected.
    Unexpected,
    /// The hook has no opinion; run the default classifier.
    Unknown,
    /// Ordinary line, joins the response body, command stays in flight.
    Intermediate,
    /// Bare final-OK line (`OK`, `CONNECT`, ...), ends the command.
    FinalOk,
    /// Final-stored line (an error line), ends the command; the line
    /// itself becomes (part of) the delivered body.
    Final,
    /// Unsolicited result code, delivered out of band, body untouched.
    Urc,
    /// A binary payload of this many bytes follows, appended verbatim.
    RawData(usize),
    /// A hex-encoded payload follows; this many decoded bytes result.
    HexData(usize),
}

/// Prefix-table membership check used by the default classifier and
/// available to host `scan_line` hooks for their own URC tables.
pub fn prefix_in_table(line: &[u8], table: &[&[u8]]) -> bool {
    table.iter().any(|prefix| line.starts_with(prefix))
}

/// The built-in classifier, run whenever a hook returns [`Classification::Unknown`].
///
/// Recognizes the bare final-OK lines and final-error prefixes from
/// `at_core::constants`; everything else is `Intermediate`.
pub fn default_classify(line: &[u8]) -> Classification {
    if FINAL_OK_LINES.contains(&line) {
        Classification::FinalOk
    } else if prefix_in_table(line, FINAL_ERROR_PREFIXES) {
        Classification::Final
    } else {
        Classification::Intermediate
    }
}
