//! Shared byte-level constants for the AT command/response protocol.
//!
//! These are the fixed bytes the parser's state machine keys off of; see the
//! state machine design in `at-parser` for how each one drives a transition.

/// Carriage return. Discarded in `Idle`/`ReadLine`, does not end a line.
pub const CR: u8 = b'\r';
/// Line feed. Ends the current line in `Idle`/`ReadLine`.
pub const LF: u8 = b'\n';

/// The data-prompt sequence a modem emits with no terminating newline,
/// requesting raw payload input (e.g. before sending SMS PDU bytes).
pub const DATA_PROMPT: &[u8] = b"> ";

/// Default response buffer capacity when none is configured explicitly.
pub const DEFAULT_BUFFER_CAPACITY: usize = 4 * 1024;

/// Default up-front allocation for the body buffer. Most responses are far
/// smaller than `DEFAULT_BUFFER_CAPACITY`; this just avoids the first few
/// reallocations for the common case without paying for the full capacity.
pub const DEFAULT_INITIAL_CAPACITY_HINT: usize = 256;

/// Bare final-OK lines recognized by the default classifier. Checked for
/// exact equality, not prefix match.
pub const FINAL_OK_LINES: &[&[u8]] = &[b"OK", b"SEND OK", b"CONNECT"];

/// Prefixes of final-stored (error) lines recognized by the default
/// classifier. Checked with `prefix_in_table`.
pub const FINAL_ERROR_PREFIXES: &[&[u8]] = &[
    b"ERROR",
    b"+CME ERROR:",
    b"+CMS ERROR:",
    b"NO CARRIER",
    b"NO DIALTONE",
    b"BUSY",
    b"NO ANSWER",
    b"COMMAND NOT SUPPORT",
    b"TOO MANY PARAMETERS",
];
