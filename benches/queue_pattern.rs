//! Benchmark for spec §8 scenario 1 (the "queue pattern"): repeated `push`/`shift`
//! should stay amortized O(1) thanks to the shared-root "room for unshift" and
//! promote-on-shift machinery in `structs::shared`, rather than degrading into an
//! O(n) memmove per iteration the way a naive `Vec`-backed `shift` would.

use criterion::{criterion_group, criterion_main, Criterion};
use dynarray::{RArray, Value};

fn queue_pattern(c: &mut Criterion) {
    c.bench_function("push_shift_10k", |b| {
        b.iter(|| {
            let a = RArray::new();
            for i in 0..10_000i64 {
                a.push(Value::Int(i)).unwrap();
                a.shift().unwrap();
            }
            std::hint::black_box(a.len());
        });
    });
}

fn push_only(c: &mut Criterion) {
    c.bench_function("push_10k", |b| {
        b.iter(|| {
            let a = RArray::new();
            for i in 0..10_000i64 {
                a.push(Value::Int(i)).unwrap();
            }
            std::hint::black_box(a.len());
        });
    });
}

criterion_group!(benches, queue_pattern, push_only);
criterion_main!(benches);
