//! Incremental parser for the AT command/response protocol (V.25ter /
//! 3GPP TS 27.007) spoken by cellular modems.
//!
//! [`Parser`] is fed raw bytes from a modem's serial/USB/socket transport —
//! in whatever chunks the transport happens to deliver them — and delivers
//! completed command responses and unsolicited result codes (URCs) through
//! an [`AtCallbacks`] implementation, synchronously from within [`Parser::feed`].
//! Transport I/O, command dispatch, and modem-specific drivers are all out
//! of scope; see the crate's design notes for the reasoning.

pub mod callbacks;
pub mod classification;
pub mod config;
pub mod parser;
pub mod state_machine;

pub use at_core::{Error, Result};
pub use callbacks::AtCallbacks;
pub use classification::{default_classify, prefix_in_table, Classification};
pub use config::{ParserConfig, ParserConfigBuilder};
pub use parser::Parser;
pub use state_machine::State;
