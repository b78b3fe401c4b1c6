//! Benchmarks for the hex nibble decoder and `HexData` feed path in isolation.
//!
//! Run with:
//! ```sh
//! cargo bench --bench hex_decode_bench
//! ```

use at_parser::state_machine::hex_value;
use at_parser::{AtCallbacks, Classification, Error, Parser};
use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use std::hint::black_box;

#[derive(Default)]
struct Discard;

impl AtCallbacks for Discard {
    fn handle_response(&mut self, _body: Result<&[u8], Error>) {}
    fn handle_urc(&mut self, _line: &[u8], _unexpected: bool) {}
}

struct HexPayloadAware {
    announced_line: &'static [u8],
    decoded_len: usize,
}

impl AtCallbacks for HexPayloadAware {
    fn scan_line(&mut self, line: &[u8]) -> Classification {
        if line == self.announced_line {
            Classification::HexData(self.decoded_len)
        } else {
            Classification::Unknown
        }
    }
    fn handle_response(&mut self, _body: Result<&[u8], Error>) {}
    fn handle_urc(&mut self, _line: &[u8], _unexpected: bool) {}
}

fn bench_hex_value(c: &mut Criterion) {
    let mut group = c.benchmark_group("hex_value");
    let digits: Vec<u8> = (0..=255u8).collect();
    group.throughput(Throughput::Elements(digits.len() as u64));

    group.bench_function("decode_all_bytes", |b| {
        b.iter(|| {
            for &byte in &digits {
                black_box(hex_value(black_box(byte)));
            }
        });
    });

    group.finish();
}

fn bench_feed_hex_payload(c: &mut Criterion) {
    let mut group = c.benchmark_group("feed_hex_payload");

    let announced_line: &'static [u8] = b"+CGDATA: 256";
    let decoded_len = 256usize;

    let mut input = Vec::new();
    input.extend_from_slice(b"\r\n");
    input.extend_from_slice(announced_line);
    input.extend_from_slice(b"\r\n");
    for i in 0..decoded_len {
        input.extend_from_slice(format!("{:02X}", (i % 256) as u8).as_bytes());
    }
    input.extend_from_slice(b"\r\nOK\r\n");

    group.throughput(Throughput::Bytes(input.len() as u64));
    group.bench_function("feed", |b| {
        b.iter(|| {
            let mut parser = Parser::new(HexPayloadAware {
                announced_line,
                decoded_len,
            });
            parser.feed(black_box(&input));
        });
    });

    group.finish();
}

criterion_group!(benches, bench_hex_value, bench_feed_hex_payload);
criterion_main!(benches);
