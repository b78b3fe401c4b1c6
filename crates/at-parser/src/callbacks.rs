//! The host-supplied callback surface (spec §6).

use crate::classification::Classification;
use at_core::Error;

/// Hooks a driver implements to receive parsed responses and URCs, and to
/// customize line classification for command-specific replies.
///
/// The parser is generic over this trait (`Parser<C: AtCallbacks>`) rather
/// than taking a trait object, so a driver's callback state lives inline in
/// the `Parser` with no extra indirection or allocation.
pub trait AtCallbacks {
    /// Classify a completed line before the default classifier runs.
    ///
    /// Returning [`Classification::Unknown`] (the default) defers to
    /// `at_parser::classification::default_classify`.
    fn scan_line(&mut self, _line: &[u8]) -> Classification {
        Classification::Unknown
    }

    /// A command has finished: `Ok(body)` on a final-OK/final-stored line
    /// or a recognized data prompt, `Err` if the response buffer had to be
    /// truncated along the way.
    fn handle_response(&mut self, body: Result<&[u8], Error>);

    /// A line arrived out of band: a genuine URC, or (when `unexpected` is
    /// `true`) a line the classifier could not place.
    fn handle_urc(&mut self, line: &[u8], unexpected: bool);

    /// A typed diagnostic for one of the dispositions in §7 that don't
    /// otherwise carry a `Result`: a protocol violation or an unexpected
    /// line. Fires immediately before the corresponding `handle_urc` call
    /// that carries the human-readable form. Default is a no-op, so most
    /// drivers never need to implement it.
    fn handle_error(&mut self, _error: &Error) {}
}
