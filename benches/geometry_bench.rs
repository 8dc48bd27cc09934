//! Benchmarks for rectangle algebra.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ergonomic_user32::geometry::{Point, Rect, Size};

fn sample_rects() -> Vec<Rect> {
    (0..64)
        .map(|i| {
            let size = Size {
                width: 20 + i % 30,
                height: 10 + i % 25,
            };
            Rect::from_origin_size(Point::new(i * 7 % 50, i * 13 % 40), size)
        })
        .collect()
}

fn bench_pairwise(c: &mut Criterion) {
    let rects = sample_rects();
    let mut group = c.benchmark_group("pairwise");

    group.bench_function("intersect", |b| {
        b.iter(|| {
            let mut hits = 0;
            for a in &rects {
                for other in &rects {
                    hits += black_box(a).intersect(other).is_some() as u32;
                }
            }
            hits
        })
    });

    group.bench_function("union", |b| {
        b.iter(|| {
            rects
                .iter()
                .fold(Rect::empty(), |acc, r| acc.union(black_box(r)).unwrap_or(acc))
        })
    });

    group.bench_function("subtract", |b| {
        b.iter(|| {
            let mut remaining = 0i64;
            for a in &rects {
                for other in &rects {
                    if let Some(r) = black_box(a).subtract(other) {
                        remaining += (r.width() as i64) * (r.height() as i64);
                    }
                }
            }
            remaining
        })
    });

    group.finish();
}

fn bench_hit_testing(c: &mut Criterion) {
    let rects = sample_rects();
    let points: Vec<Point> = (0..256).map(|i| Point::new(i % 80, i / 4)).collect();

    c.bench_function("contains", |b| {
        b.iter(|| {
            points
                .iter()
                .filter(|pt| rects.iter().any(|r| r.contains(**pt)))
                .count()
        })
    });
}

criterion_group!(benches, bench_pairwise, bench_hit_testing);
criterion_main!(benches);
