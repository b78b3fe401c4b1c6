//! The incremental AT response parser (spec §4.3, §4.4).
//!
//! [`Parser`] consumes bytes in arbitrarily sized chunks via [`Parser::feed`]
//! and delivers completed responses and URCs synchronously, from within that
//! call, through the [`AtCallbacks`] it was built with.

use at_core::constants::{CR, DATA_PROMPT, LF};
use at_core::Error;
use bytes::BytesMut;

use crate::callbacks::AtCallbacks;
use crate::classification::Classification;
use crate::config::ParserConfig;
use crate::state_machine::{hex_value, State, NO_NIBBLE};

type CharacterHandler = Box<dyn FnMut(u8, &[u8]) -> Option<u8>>;
type ScannerOverride = Box<dyn FnMut(&[u8]) -> Classification>;

/// A single AT command/response session's worth of parsing state.
///
/// The original's flat byte array with a `buf_current` split point is
/// modeled here as two growable buffers — `body` (the committed response
/// so far) and `line` (the line currently being assembled) — whose combined
/// length is capped at `config.buffer_capacity`. That avoids in-place
/// byte-shifting to insert inter-line separators while preserving the same
/// logical invariant: drivers only ever see `[0, buf_current)` worth of
/// bytes, committed in order.
pub struct Parser<C: AtCallbacks> {
    callbacks: C,
    config: ParserConfig,
    body: BytesMut,
    line: Vec<u8>,
    state: State,
    expect_dataprompt: bool,
    data_left: usize,
    nibble: i16,
    response_errored: bool,
    character_handler: Option<CharacterHandler>,
    scanner_override: Option<ScannerOverride>,
}

impl<C: AtCallbacks> Parser<C> {
    /// Build a parser with default configuration.
    ///
    /// # Example
    ///
    /// ```
    /// use at_parser::{AtCallbacks, Error, Parser, State};
    ///
    /// struct Discard;
    /// impl AtCallbacks for Discard {
    ///     fn handle_response(&mut self, _body: Result<&[u8], Error>) {}
    ///     fn handle_urc(&mut self, _line: &[u8], _unexpected: bool) {}
    /// }
    ///
    /// let parser = Parser::new(Discard);
    /// assert_eq!(parser.state(), State::Idle);
    /// ```
    pub fn new(callbacks: C) -> Self {
        Self::with_config(callbacks, ParserConfig::default())
    }

    /// Build a parser with an explicit configuration.
    pub fn with_config(callbacks: C, config: ParserConfig) -> Self {
        Self {
            body: BytesMut::with_capacity(config.initial_capacity_hint.min(config.buffer_capacity)),
            line: Vec::new(),
            state: State::Idle,
            expect_dataprompt: false,
            data_left: 0,
            nibble: NO_NIBBLE,
            response_errored: false,
            character_handler: None,
            scanner_override: None,
            callbacks,
            config,
        }
    }

    /// Borrow the callback object (e.g. to inspect driver-side state).
    pub fn callbacks(&self) -> &C {
        &self.callbacks
    }

    /// Mutably borrow the callback object.
    pub fn callbacks_mut(&mut self) -> &mut C {
        &mut self.callbacks
    }

    /// Consume the parser, returning its callback object.
    pub fn into_callbacks(self) -> C {
        self.callbacks
    }

    /// Current state machine state. Mostly useful for tests and diagnostics.
    pub fn state(&self) -> State {
        self.state
    }

    /// Clear all in-flight response state: buffer, flags, one-shot hooks.
    /// Does not touch the permanent `AtCallbacks` object.
    ///
    /// # Example
    ///
    /// ```
    /// use at_parser::{AtCallbacks, Error, Parser};
    ///
    /// struct Discard;
    /// impl AtCallbacks for Discard {
    ///     fn handle_response(&mut self, _body: Result<&[u8], Error>) {}
    ///     fn handle_urc(&mut self, _line: &[u8], _unexpected: bool) {}
    /// }
    ///
    /// let mut parser = Parser::new(Discard);
    /// parser.feed(b"\r\n+CSQ: 15,9"); // half of an in-flight response
    /// parser.reset(); // e.g. the modem rebooted; discard it
    /// parser.feed(b"\r\nOK\r\n"); // starts clean, unaffected by what preceded reset
    /// ```
    pub fn reset(&mut self) {
        self.state = State::Idle;
        self.body.clear();
        self.line.clear();
        self.expect_dataprompt = false;
        self.data_left = 0;
        self.nibble = NO_NIBBLE;
        self.response_errored = false;
        self.character_handler = None;
        self.scanner_override = None;
        tracing::trace!("parser reset");
    }

    /// Arm recognition of a `"> "` data prompt for the next in-flight
    /// command. Cleared automatically once the prompt is seen, or once any
    /// final result arrives without one (the command was rejected before
    /// ever prompting).
    ///
    /// # Example
    ///
    /// ```
    /// use at_parser::{AtCallbacks, Error, Parser};
    ///
    /// struct Discard;
    /// impl AtCallbacks for Discard {
    ///     fn handle_response(&mut self, body: Result<&[u8], Error>) {
    ///         assert_eq!(body, Ok(&b""[..]));
    ///     }
    ///     fn handle_urc(&mut self, _line: &[u8], _unexpected: bool) {}
    /// }
    ///
    /// let mut parser = Parser::new(Discard);
    /// parser.expect_dataprompt();
    /// parser.feed(b"\r\n> "); // the modem's raw-send prompt, no trailing newline
    /// ```
    pub fn expect_dataprompt(&mut self) {
        self.expect_dataprompt = true;
    }

    /// Note that a command was just sent. This implementation always
    /// delivers `handle_response` at each terminating event, so tracking
    /// "is a command in flight" is not required for correctness; drivers
    /// that want the bookkeeping for their own purposes may still call this.
    pub fn await_response(&mut self) {}

    /// Install a per-byte filter: called before state-machine processing,
    /// receives the raw byte plus a view of the line assembled so far, and
    /// returns the byte to actually feed (or `None` to drop it). Stays
    /// installed until [`Parser::clear_character_handler`] or [`Parser::reset`].
    pub fn set_character_handler(
        &mut self,
        handler: impl FnMut(u8, &[u8]) -> Option<u8> + 'static,
    ) {
        self.character_handler = Some(Box::new(handler));
    }

    /// Remove a previously installed character handler.
    pub fn clear_character_handler(&mut self) {
        self.character_handler = None;
    }

    /// Override classification for exactly the next completed line, then
    /// revert to `AtCallbacks::scan_line`.
    pub fn set_scanner_override(
        &mut self,
        scanner: impl FnMut(&[u8]) -> Classification + 'static,
    ) {
        self.scanner_override = Some(Box::new(scanner));
    }

    /// Feed a chunk of bytes. May be called with any split of the input
    /// stream; callbacks fire synchronously as responses complete.
    ///
    /// # Example
    ///
    /// ```
    /// use at_parser::{AtCallbacks, Error, Parser};
    /// use std::cell::RefCell;
    ///
    /// struct Collect(RefCell<Vec<u8>>);
    /// impl AtCallbacks for Collect {
    ///     fn handle_response(&mut self, body: Result<&[u8], Error>) {
    ///         self.0.borrow_mut().extend_from_slice(body.unwrap());
    ///     }
    ///     fn handle_urc(&mut self, _line: &[u8], _unexpected: bool) {}
    /// }
    ///
    /// let mut parser = Parser::new(Collect(RefCell::new(Vec::new())));
    /// // The same response, split across two `feed` calls however the
    /// // transport happened to deliver it.
    /// parser.feed(b"\r\n+CSQ: 15,99\r\n");
    /// parser.feed(b"\r\nOK\r\n");
    /// assert_eq!(&parser.callbacks().0.borrow()[..], b"+CSQ: 15,99");
    /// ```
    pub fn feed(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            if let Some(byte) = self.apply_character_handler(byte) {
                self.feed_byte(byte);
            }
        }
    }

    fn apply_character_handler(&mut self, byte: u8) -> Option<u8> {
        match self.character_handler.take() {
            Some(mut handler) => {
                let result = handler(byte, &self.line);
                self.character_handler = Some(handler);
                result
            }
            None => Some(byte),
        }
    }

    fn feed_byte(&mut self, byte: u8) {
        match self.state {
            State::Idle | State::ReadLine | State::DataPrompt => self.feed_byte_read_line(byte),
            State::RawData => self.feed_byte_raw_data(byte),
            State::HexData => self.feed_byte_hex_data(byte),
        }
    }

    fn feed_byte_read_line(&mut self, byte: u8) {
        match byte {
            CR => {}
            LF => self.on_line_complete(),
            other => {
                self.push_line_byte(other);
                if self.expect_dataprompt && self.line == DATA_PROMPT {
                    self.on_data_prompt();
                } else {
                    self.state = State::ReadLine;
                }
            }
        }
    }

    fn feed_byte_raw_data(&mut self, byte: u8) {
        self.try_extend_body(&[byte]);
        self.data_left -= 1;
        if self.data_left == 0 {
            self.state = State::ReadLine;
        }
    }

    fn feed_byte_hex_data(&mut self, byte: u8) {
        match hex_value(byte) {
            Some(value) => {
                if self.nibble == NO_NIBBLE {
                    self.nibble = value as i16;
                } else {
                    let decoded = ((self.nibble as u8) << 4) | value;
                    self.nibble = NO_NIBBLE;
                    self.try_extend_body(&[decoded]);
                    self.data_left -= 1;
                    if self.data_left == 0 {
                        self.state = State::ReadLine;
                    }
                }
            }
            None if self.config.hex_strict => {
                self.protocol_violation(format!("non-hex byte {byte:#04x} in hex payload"));
            }
            None => {}
        }
    }

    fn push_line_byte(&mut self, byte: u8) {
        // Capped against `buffer_capacity` on its own, independent of how
        // much of that capacity the committed body has already used: an
        // unterminated line (no `\r`/`\n` ever arriving) must not grow
        // without bound, but a later final OK/ERROR line still needs room
        // to be fully read and classified even after an earlier overflow
        // marked the response as errored.
        if self.line.len() >= self.config.buffer_capacity {
            self.response_errored = true;
            return;
        }
        self.line.push(byte);
    }

    fn on_line_complete(&mut self) {
        if self.line.is_empty() {
            return;
        }
        let line = std::mem::take(&mut self.line);
        let classification = self.classify(&line);
        self.apply_classification(classification, line);
    }

    fn classify(&mut self, line: &[u8]) -> Classification {
        let result = match self.scanner_override.take() {
            Some(mut scanner) => scanner(line),
            None => self.callbacks.scan_line(line),
        };
        match result {
            Classification::Unknown => crate::classification::default_classify(line),
            other => other,
        }
    }

    fn apply_classification(&mut self, classification: Classification, line: Vec<u8>) {
        match classification {
            Classification::FinalOk => self.deliver_final(&[]),
            Classification::Final => self.deliver_final(&line),
            Classification::Intermediate => {
                self.commit_to_body(&line);
                self.state = State::ReadLine;
            }
            Classification::Urc => {
                self.callbacks.handle_urc(&line, false);
                self.state = State::ReadLine;
            }
            Classification::Unexpected => {
                tracing::warn!(
                    line = %String::from_utf8_lossy(&line),
                    "unexpected line forwarded to URC handler"
                );
                self.callbacks.handle_error(&Error::UnexpectedLine);
                self.callbacks.handle_urc(&line, true);
                self.state = State::ReadLine;
            }
            Classification::RawData(amount) => self.begin_payload(&line, amount, State::RawData),
            Classification::HexData(amount) => self.begin_payload(&line, amount, State::HexData),
            Classification::Unknown => unreachable!("classify() resolves Unknown before this point"),
        }
    }

    fn begin_payload(&mut self, line: &[u8], amount: usize, target: State) {
        let needed = line.len() + 1 + amount;
        if self.capacity_used() + needed > self.config.buffer_capacity {
            self.protocol_violation(format!(
                "payload of {amount} bytes would exceed remaining buffer capacity"
            ));
            return;
        }
        self.commit_to_body(line);
        self.try_extend_body(&[LF]);
        self.data_left = amount;
        self.nibble = NO_NIBBLE;
        self.state = target;
    }

    fn on_data_prompt(&mut self) {
        self.state = State::DataPrompt;
        self.line.clear();
        self.expect_dataprompt = false;
        self.deliver_final(&[]);
    }

    fn deliver_final(&mut self, trailing_line: &[u8]) {
        if !trailing_line.is_empty() {
            self.commit_to_body(trailing_line);
        }
        if self.response_errored {
            let used = self.capacity_used();
            let capacity = self.config.buffer_capacity;
            self.callbacks.handle_response(Err(Error::BufferExhausted { used, capacity }));
            self.body.clear();
        } else {
            let body = std::mem::take(&mut self.body);
            self.callbacks.handle_response(Ok(&body));
        }
        self.line.clear();
        self.response_errored = false;
        self.data_left = 0;
        self.nibble = NO_NIBBLE;
        self.expect_dataprompt = false;
        self.state = State::ReadLine;
    }

    fn commit_to_body(&mut self, bytes: &[u8]) {
        if !self.body.is_empty() {
            self.try_extend_body(&[LF]);
        }
        self.try_extend_body(bytes);
    }

    fn try_extend_body(&mut self, bytes: &[u8]) {
        let remaining = self.config.buffer_capacity.saturating_sub(self.capacity_used());
        if bytes.len() <= remaining {
            self.body.extend_from_slice(bytes);
        } else {
            self.body.extend_from_slice(&bytes[..remaining]);
            self.response_errored = true;
        }
    }

    fn capacity_used(&self) -> usize {
        self.body.len() + self.line.len()
    }

    fn protocol_violation(&mut self, reason: String) {
        tracing::warn!(%reason, "protocol violation, resetting parser");
        let error = Error::ProtocolViolation { reason: reason.clone() };
        let message = reason.into_bytes();
        self.reset();
        self.callbacks.handle_error(&error);
        self.callbacks.handle_urc(&message, true);
    }
}
