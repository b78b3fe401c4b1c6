use thiserror::Error;

/// Errors the parser itself can signal.
///
/// The parser does not distinguish recoverable from fatal: every variant here
/// resets the in-flight response and leaves the parser ready to keep running.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A single line, or the accumulated response body, would have exceeded
    /// the configured buffer capacity. The body was truncated at the
    /// boundary; no out-of-bounds write occurred.
    #[error("response buffer exhausted: {used} bytes used of {capacity} capacity")]
    BufferExhausted { used: usize, capacity: usize },

    /// A byte stream violated the protocol contract in a way that is not
    /// simply "unrecognized line" — e.g. a non-hex byte inside `HexData`
    /// while strict hex decoding is enabled, or a payload length that would
    /// overrun the remaining buffer.
    #[error("protocol violation: {reason}")]
    ProtocolViolation { reason: String },

    /// A line arrived with no command in flight and did not match any URC
    /// pattern. Per policy this is never silently discarded: it is still
    /// forwarded to the URC handler, tagged as unexpected.
    #[error("unexpected line with no command in flight")]
    UnexpectedLine,

    /// A `ParserConfig` was built with an invalid combination of knobs
    /// (e.g. zero buffer capacity).
    #[error("invalid parser configuration: {reason}")]
    InvalidConfig { reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;
