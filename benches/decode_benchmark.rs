//! Decode benchmark: Measure burst decoding and escape table lookups.
//!
//! Target: < 50ns per burst

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use vigil::input::{decode, lookup};

fn decode_printable(c: &mut Criterion) {
    c.bench_function("decode_char", |b| b.iter(|| decode(black_box(b"q"))));
}

fn decode_escape(c: &mut Criterion) {
    c.bench_function("decode_arrow", |b| b.iter(|| decode(black_box(b"\x1b[A"))));

    c.bench_function("decode_f12", |b| b.iter(|| decode(black_box(b"\x1b[24~"))));

    c.bench_function("decode_unknown", |b| {
        b.iter(|| decode(black_box(b"\x1b[99;99~")))
    });
}

fn decode_mouse(c: &mut Criterion) {
    c.bench_function("decode_sgr_press", |b| {
        b.iter(|| decode(black_box(b"\x1b[<0;120;45M")))
    });

    c.bench_function("decode_sgr_malformed", |b| {
        b.iter(|| decode(black_box(b"\x1b[<0;x;45M")))
    });
}

fn table_lookup(c: &mut Criterion) {
    c.bench_function("lookup_first", |b| b.iter(|| lookup(black_box(b"[A"))));

    c.bench_function("lookup_miss", |b| b.iter(|| lookup(black_box(b"[Z9"))));
}

criterion_group!(benches, decode_printable, decode_escape, decode_mouse, table_lookup);
criterion_main!(benches);
