use courier_sdk::{Bus, Listener};
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Copy)]
struct Sample(u64);

#[derive(Debug, Clone, Copy)]
struct Unheard;

fn subscribe(bus: &Bus, count: usize, sum: &Arc<AtomicU64>) -> Vec<Listener> {
    (0..count)
        .map(|_| {
            let listener = bus.listener();
            let sum = Arc::clone(sum);
            listener
                .listen(move |sample: &Sample| {
                    sum.fetch_add(sample.0, Ordering::Relaxed);
                })
                .unwrap();
            listener
        })
        .collect()
}

fn bench_dispatch(c: &mut Criterion) {
    let bus = Bus::new();
    let sum = Arc::new(AtomicU64::new(0));
    let _listeners = subscribe(&bus, 16, &sum);

    let mut group = c.benchmark_group("Dispatch");

    group.bench_function("post (16 listeners)", |b| {
        b.iter(|| black_box(bus.post(Sample(1))));
    });

    group.bench_function("post (no listeners)", |b| {
        b.iter(|| black_box(bus.post(Unheard)));
    });

    group.bench_function("postpone + drain 64", |b| {
        b.iter(|| {
            for n in 0..64 {
                bus.postpone(Sample(n));
            }
            black_box(bus.process_limit(64))
        });
    });

    group.finish();
}

criterion_group!(benches, bench_dispatch);
criterion_main!(benches);
