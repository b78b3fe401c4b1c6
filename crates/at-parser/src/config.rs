//! Parser configuration (spec §6): buffer sizing and hex-decode strictness.

use at_core::constants::{DEFAULT_BUFFER_CAPACITY, DEFAULT_INITIAL_CAPACITY_HINT};
use at_core::Error;
use serde::{Deserialize, Serialize};

/// Tunables for a [`crate::Parser`].
///
/// Constructed directly for the defaults, or via [`ParserConfigBuilder`] to
/// validate a non-default combination before it reaches the parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Total bytes the response body and in-progress line may occupy
    /// together before a command is delivered as
    /// [`at_core::Error::BufferExhausted`].
    pub buffer_capacity: usize,
    /// Bytes to preallocate for the body buffer at construction. A sizing
    /// hint only — the buffer still grows up to `buffer_capacity` as
    /// needed, this just saves the first few reallocations for the common
    /// case of responses much smaller than the configured cap.
    pub initial_capacity_hint: usize,
    /// When `true`, a non-hex byte inside a `HexData` payload is a
    /// [`at_core::Error::ProtocolViolation`] that resets the parser. When
    /// `false` (the default), stray non-hex bytes are skipped.
    pub hex_strict: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            initial_capacity_hint: DEFAULT_INITIAL_CAPACITY_HINT,
            hex_strict: false,
        }
    }
}

/// Builder for [`ParserConfig`] that rejects nonsensical combinations.
#[derive(Debug, Clone, Default)]
pub struct ParserConfigBuilder {
    config: ParserConfig,
}

impl ParserConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn buffer_capacity(mut self, capacity: usize) -> Self {
        self.config.buffer_capacity = capacity;
        self
    }

    pub fn hex_strict(mut self, strict: bool) -> Self {
        self.config.hex_strict = strict;
        self
    }

    pub fn initial_capacity_hint(mut self, hint: usize) -> Self {
        self.config.initial_capacity_hint = hint;
        self
    }

    pub fn build(self) -> Result<ParserConfig, Error> {
        if self.config.buffer_capacity == 0 {
            return Err(Error::InvalidConfig {
                reason: "buffer_capacity must be non-zero".to_string(),
            });
        }
        let mut config = self.config;
        // A hint above the cap is harmless (it's just an up-front
        // allocation), but honoring it literally would over-allocate.
        config.initial_capacity_hint = config.initial_capacity_hint.min(config.buffer_capacity);
        Ok(config)
    }
}
