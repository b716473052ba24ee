//! Wheel scheduling and tick-processing benchmarks.

use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::time::Duration;
use timer_wheel::{TimerWheel, WheelConfig};

fn bench_new_timeout(c: &mut Criterion) {
    c.bench_function("new_timeout_scatter", |b| {
        b.iter_batched(
            || TimerWheel::with_clock(WheelConfig::new(1_000_000, 512), timer_wheel::MonotonicClock::new()).unwrap(),
            |mut wheel| {
                for i in 0..1000u64 {
                    black_box(wheel.new_timeout(Duration::from_micros(i), || {}));
                }
            },
            criterion::BatchSize::SmallInput,
        );
    });
}

fn bench_expire_timers_dense_slot(c: &mut Criterion) {
    c.bench_function("expire_timers_1000_in_one_slot", |b| {
        b.iter_batched(
            || {
                let mut wheel =
                    TimerWheel::with_clock(WheelConfig::new(1_000_000, 4), timer_wheel::MonotonicClock::new())
                        .unwrap();
                for _ in 0..1000 {
                    wheel.new_timeout(Duration::from_nanos(0), || {});
                }
                wheel
            },
            |mut wheel| {
                black_box(wheel.expire_timers());
            },
            criterion::BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, bench_new_timeout, bench_expire_timers_dense_slot);
criterion_main!(benches);
