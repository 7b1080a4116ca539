//! Baseline dispatch benchmarks: long effect chains through the
//! rotate-and-discharge loop.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use fermata_vm::computation::Computation;
use fermata_vm::driver::eval;
use fermata_vm::effects::{cell, emit};

fn emit_chain(n: i64) -> Computation<i64> {
    fn go(i: i64, n: i64) -> Computation<i64> {
        if i == n {
            Computation::pure(i)
        } else {
            emit::emit(i).flat_map(move |_| go(i + 1, n))
        }
    }
    go(0, n)
}

fn state_chain(n: u32) -> Computation<i64> {
    fn go(remaining: u32) -> Computation<i64> {
        if remaining == 0 {
            cell::get::<i64>()
        } else {
            cell::update(|v: i64| v + 1).flat_map(move |_| go(remaining - 1))
        }
    }
    go(n)
}

fn bench_emit_discharge(c: &mut Criterion) {
    c.bench_function("emit_discharge_10k", |b| {
        b.iter(|| {
            let comp = emit_chain(black_box(10_000));
            eval(emit::run_discard::<i64, i64>(comp)).unwrap()
        })
    });
}

fn bench_state_threading(c: &mut Criterion) {
    c.bench_function("state_threading_10k", |b| {
        b.iter(|| {
            let comp = state_chain(black_box(10_000));
            eval(cell::run(0i64, comp)).unwrap()
        })
    });
}

fn bench_interleaved_rotation(c: &mut Criterion) {
    c.bench_function("interleaved_rotation_1k", |b| {
        b.iter(|| {
            fn go(i: i64, n: i64) -> Computation<i64> {
                if i == n {
                    cell::get::<i64>()
                } else {
                    emit::emit(i)
                        .flat_map(|_| cell::update(|v: i64| v + 1))
                        .flat_map(move |_| go(i + 1, n))
                }
            }
            let comp = cell::run(0i64, go(0, black_box(1_000)));
            eval(emit::run_discard::<i64, i64>(comp)).unwrap()
        })
    });
}

criterion_group!(
    benches,
    bench_emit_discharge,
    bench_state_threading,
    bench_interleaved_rotation
);
criterion_main!(benches);
