//! # Join Benchmark
//!
//! Measures the cost of a full join cycle (fresh join, one signal per party)
//! and of absorbed signals after the claim, for the mutex and atomic
//! implementations, uncontended and contended.

#![allow(missing_docs)]

use std::sync::{Arc, Barrier};
use std::thread;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use twinjoin_core::{AtomicCompletionJoin, CompletionJoin, Party, TwoPartyJoin};

/// Fresh join, first then second.
fn bench_join_cycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("join_cycle");

    group.bench_function("mutex", |b| {
        b.iter(|| {
            let join = CompletionJoin::new();
            black_box(join.signal_first());
            black_box(join.signal_second())
        });
    });

    group.bench_function("atomic", |b| {
        b.iter(|| {
            let join = AtomicCompletionJoin::new();
            black_box(join.signal_first());
            black_box(join.signal_second())
        });
    });

    group.finish();
}

/// Signals hitting an already-claimed join.
fn bench_absorbed_signal(c: &mut Criterion) {
    let mut group = c.benchmark_group("absorbed_signal");

    let mutex = CompletionJoin::new();
    mutex.signal_first();
    mutex.signal_second();
    group.bench_function("mutex", |b| b.iter(|| black_box(mutex.signal(Party::First))));

    let atomic = AtomicCompletionJoin::new();
    atomic.signal_first();
    atomic.signal_second();
    group.bench_function("atomic", |b| b.iter(|| black_box(atomic.signal(Party::First))));

    group.finish();
}

/// One thread per party racing on a fresh join every round.
fn race_rounds<J: TwoPartyJoin + 'static>(make: fn() -> J, rounds: usize) -> usize {
    let barrier = Arc::new(Barrier::new(2));
    let joins: Arc<Vec<J>> = Arc::new((0..rounds).map(|_| make()).collect());

    let second = {
        let barrier = Arc::clone(&barrier);
        let joins = Arc::clone(&joins);
        thread::spawn(move || {
            barrier.wait();
            joins.iter().filter(|join| join.signal_second()).count()
        })
    };

    barrier.wait();
    let first = joins.iter().filter(|join| join.signal_first()).count();
    first + second.join().unwrap_or(0)
}

fn bench_contended(c: &mut Criterion) {
    let mut group = c.benchmark_group("contended_rounds");

    for rounds in [1_000, 10_000] {
        group.bench_with_input(BenchmarkId::new("mutex", rounds), &rounds, |b, &rounds| {
            b.iter(|| race_rounds(CompletionJoin::new, rounds));
        });
        group.bench_with_input(BenchmarkId::new("atomic", rounds), &rounds, |b, &rounds| {
            b.iter(|| race_rounds(AtomicCompletionJoin::new, rounds));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_join_cycle, bench_absorbed_signal, bench_contended);
criterion_main!(benches);
