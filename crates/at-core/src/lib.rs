//! Shared error types and protocol constants for the AT response parser.

pub mod constants;
pub mod error;

pub use error::{Error, Result};

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
