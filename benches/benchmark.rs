//! Benchmarks for enigma machine operations.
//!
//! Measures configuration parsing, single-symbol conversion and message
//! throughput for the standard M4 rotor set.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use enigma::config::parse_config;
use enigma::{Machine, Permutation};

/// Machine description used across all benchmarks.
const DEFAULT_CONF: &str = include_str!("../tests/fixtures/default.conf");

/// Builds a machine with rotors, positions and plugboard in place.
fn ready_machine() -> Machine {
    let mut m = parse_config(DEFAULT_CONF).unwrap().build().unwrap();
    m.insert_rotors(&["B", "Beta", "III", "IV", "I"]).unwrap();
    m.set_rotors("AXLE").unwrap();
    let plugboard = Permutation::new("(HQ) (EX) (IP) (TR) (BY)", m.alphabet().clone()).unwrap();
    m.set_plugboard(plugboard).unwrap();
    m
}

/// Benchmarks parsing the machine description and building the machine.
fn bench_parse_config(c: &mut Criterion) {
    c.bench_function("parse_config", |b| {
        b.iter(|| parse_config(black_box(DEFAULT_CONF)).unwrap().build().unwrap());
    });
}

/// Benchmarks `Machine::convert()` on one symbol. State advances between
/// iterations, so every stepping path is eventually taken.
fn bench_convert(c: &mut Criterion) {
    let mut m = ready_machine();
    let mut group = c.benchmark_group("convert_single_symbol");
    group.throughput(Throughput::Elements(1));
    group.bench_function("m4", |b| {
        let mut symbol = 0;
        b.iter(|| {
            symbol = m.convert(black_box(symbol)).unwrap();
        });
    });
    group.finish();
}

/// Benchmarks `Machine::convert_message()` across message lengths.
fn bench_convert_message(c: &mut Criterion) {
    let mut group = c.benchmark_group("convert_message");
    for len in [16usize, 256, 4096] {
        let message: String = "FROMHISSHOULDERHIAWATHA".chars().cycle().take(len).collect();
        group.throughput(Throughput::Bytes(len as u64));
        group.bench_with_input(BenchmarkId::from_parameter(len), &message, |b, msg| {
            let mut m = ready_machine();
            b.iter(|| m.convert_message(black_box(msg)).unwrap());
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_parse_config,
    bench_convert,
    bench_convert_message
);
criterion_main!(benches);
