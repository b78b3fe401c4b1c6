//! Property-based tests for the parser invariants in spec §8 (P1-P4).

use std::cell::RefCell;
use std::rc::Rc;

use at_parser::{AtCallbacks, Error, Parser, ParserConfigBuilder};
use proptest::prelude::*;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct Recorded {
    responses: Vec<Result<Vec<u8>, (usize, usize)>>,
    urcs: Vec<(Vec<u8>, bool)>,
}

#[derive(Clone, Default)]
struct Recorder(Rc<RefCell<Recorded>>);

impl AtCallbacks for Recorder {
    fn handle_response(&mut self, body: Result<&[u8], Error>) {
        let mut shared = self.0.borrow_mut();
        match body {
            Ok(bytes) => shared.responses.push(Ok(bytes.to_vec())),
            Err(Error::BufferExhausted { used, capacity }) => {
                shared.responses.push(Err((used, capacity)))
            }
            Err(other) => panic!("unexpected error variant in test: {other:?}"),
        }
    }

    fn handle_urc(&mut self, line: &[u8], unexpected: bool) {
        self.0.borrow_mut().urcs.push((line.to_vec(), unexpected));
    }
}

fn bounded_bytes(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    proptest::collection::vec(any::<u8>(), 0..=max_len)
}

proptest! {
    /// P1: body/line capacity is always respected — a delivered `Ok` body
    /// never exceeds the configured capacity, and a reported
    /// `BufferExhausted` never claims `used` beyond `capacity`.
    #[test]
    fn p1_capacity_is_never_exceeded(bytes in bounded_bytes(512), capacity in 1usize..=256) {
        let config = ParserConfigBuilder::new().buffer_capacity(capacity).build().unwrap();
        let recorder = Recorder::default();
        let mut parser = Parser::with_config(recorder.clone(), config);
        parser.feed(&bytes);

        for response in &recorder.0.borrow().responses {
            match response {
                Ok(body) => prop_assert!(body.len() <= capacity),
                Err((used, cap)) => prop_assert!(used <= cap),
            }
        }
    }

    /// P3: splitting the input at any byte boundary and feeding the two
    /// halves separately produces an identical callback sequence to a
    /// single `feed` call over the whole input.
    #[test]
    fn p3_incremental_feed_is_idempotent(bytes in bounded_bytes(256), split_at in 0usize..=256) {
        let split = split_at.min(bytes.len());

        let whole = Recorder::default();
        let mut parser_whole = Parser::new(whole.clone());
        parser_whole.feed(&bytes);

        let piecewise = Recorder::default();
        let mut parser_piecewise = Parser::new(piecewise.clone());
        parser_piecewise.feed(&bytes[..split]);
        parser_piecewise.feed(&bytes[split..]);

        prop_assert_eq!(&*whole.0.borrow(), &*piecewise.0.borrow());
    }

    /// P3, taken to the extreme: feeding one byte at a time still matches
    /// a single whole-input feed.
    #[test]
    fn p3_byte_by_byte_feed_is_idempotent(bytes in bounded_bytes(128)) {
        let whole = Recorder::default();
        let mut parser_whole = Parser::new(whole.clone());
        parser_whole.feed(&bytes);

        let piecewise = Recorder::default();
        let mut parser_piecewise = Parser::new(piecewise.clone());
        for &byte in &bytes {
            parser_piecewise.feed(&[byte]);
        }

        prop_assert_eq!(&*whole.0.borrow(), &*piecewise.0.borrow());
    }

    /// P4: after `reset`, a clean command/response pair always produces
    /// exactly one `handle_response`, regardless of what garbage preceded it.
    #[test]
    fn p4_reset_guarantees_a_clean_slate(garbage in bounded_bytes(256)) {
        let recorder = Recorder::default();
        let mut parser = Parser::new(recorder.clone());
        parser.feed(&garbage);
        parser.reset();

        recorder.0.borrow_mut().responses.clear();
        recorder.0.borrow_mut().urcs.clear();

        parser.feed(b"\r\nOK\r\n");
        prop_assert_eq!(recorder.0.borrow().responses.len(), 1);
        prop_assert_eq!(&recorder.0.borrow().responses[0], &Ok(Vec::new()));
    }
}

#[derive(Clone, Copy, Debug)]
enum LineKind {
    Intermediate,
    FinalOk,
    FinalError,
}

fn line_kind() -> impl Strategy<Value = LineKind> {
    prop_oneof![
        Just(LineKind::Intermediate),
        Just(LineKind::FinalOk),
        Just(LineKind::FinalError),
    ]
}

proptest! {
    /// P2: every terminating line (final-OK or final-stored) produces
    /// exactly one `handle_response`, and commands are independent — the
    /// count never drifts across a synthetic multi-command transcript.
    #[test]
    fn p2_terminating_events_match_response_count(
        commands in proptest::collection::vec(
            proptest::collection::vec(line_kind(), 0..4), 1..6
        )
    ) {
        let recorder = Recorder::default();
        let mut parser = Parser::new(recorder.clone());
        let mut expected_finals = 0usize;

        for command in &commands {
            for kind in command {
                match kind {
                    LineKind::Intermediate => parser.feed(b"\r\n+CSQ: 1,1\r\n"),
                    LineKind::FinalOk => {
                        parser.feed(b"\r\nOK\r\n");
                        expected_finals += 1;
                    }
                    LineKind::FinalError => {
                        parser.feed(b"\r\nERROR\r\n");
                        expected_finals += 1;
                    }
                }
            }
        }

        prop_assert_eq!(recorder.0.borrow().responses.len(), expected_finals);
    }
}

#[test]
fn empty_line_between_commands_produces_no_callback() {
    let recorder = Recorder::default();
    let mut parser = Parser::new(recorder.clone());
    parser.feed(b"\r\n\r\n\r\nOK\r\n");
    assert_eq!(recorder.0.borrow().responses, vec![Ok(Vec::new())]);
}

#[test]
fn data_prompt_without_expectation_is_plain_intermediate_text() {
    let recorder = Recorder::default();
    let mut parser = Parser::new(recorder.clone());
    // expect_dataprompt() was never called, so "> " is just line content.
    parser.feed(b"\r\n> \r\nOK\r\n");
    assert_eq!(recorder.0.borrow().responses, vec![Ok(b"> ".to_vec())]);
}

