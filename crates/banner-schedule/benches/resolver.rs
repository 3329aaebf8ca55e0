use std::hint::black_box;

use banner_schedule::{free_gaps, resolve, TimeWindow};
use criterion::{criterion_group, criterion_main, Criterion};

/// `count` half-hour windows spread evenly across the day.
fn spread(count: u32) -> Vec<TimeWindow> {
    let step = 1440 / count;
    (0..count)
        .map(|i| TimeWindow::new(i * step, i * step + step.min(30)).unwrap())
        .collect()
}

fn bench_resolve(c: &mut Criterion) {
    let proposed = TimeWindow::new(600, 720).unwrap();

    for count in [4u32, 24, 96] {
        let active = spread(count);
        c.bench_function(&format!("resolve_colliding_{}", count), |b| {
            b.iter(|| resolve(black_box(proposed), black_box(&active), black_box(15)))
        });
    }

    let free = vec![TimeWindow::new(0, 60).unwrap(), TimeWindow::new(1380, 1500).unwrap()];
    c.bench_function("resolve_accepted", |b| {
        b.iter(|| resolve(black_box(proposed), black_box(&free), black_box(120)))
    });
}

fn bench_free_gaps(c: &mut Criterion) {
    let active = spread(96);
    c.bench_function("free_gaps_96", |b| b.iter(|| free_gaps(black_box(&active))));
}

criterion_group!(benches, bench_resolve, bench_free_gaps);
criterion_main!(benches);
