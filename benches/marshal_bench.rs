//! Benchmarks for string marshaling.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ergonomic_user32::string::{from_wide, from_wide_with_len, optional_wide, to_wide, WideString};

fn bench_to_wide(c: &mut Criterion) {
    let mut group = c.benchmark_group("to_wide");

    for size in [10, 100, 1000, 10000].iter() {
        let input: String = "a".repeat(*size);
        group.throughput(Throughput::Bytes(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &input, |b, input| {
            b.iter(|| to_wide(black_box(input)))
        });
    }

    group.finish();
}

fn bench_from_wide(c: &mut Criterion) {
    let mut group = c.benchmark_group("from_wide");

    for size in [10, 100, 1000, 10000].iter() {
        let wide = to_wide(&"a".repeat(*size));
        group.throughput(Throughput::Bytes(*size as u64 * 2));
        group.bench_with_input(BenchmarkId::new("terminated", size), &wide, |b, wide| {
            b.iter(|| from_wide(black_box(wide)))
        });
        group.bench_with_input(BenchmarkId::new("with_len", size), &wide, |b, wide| {
            b.iter(|| from_wide_with_len(black_box(wide), *size))
        });
    }

    group.finish();
}

fn bench_window_title_args(c: &mut Criterion) {
    let mut group = c.benchmark_group("title_args");

    // What find_window builds for its class and title arguments.
    group.bench_function("class_and_title", |b| {
        b.iter(|| {
            let class = optional_wide(Some(black_box("ErgonomicUser32_Main")));
            let title = optional_wide(Some(black_box("Untitled - Editor")));
            (class, title)
        })
    });

    group.bench_function("any_class", |b| {
        b.iter(|| optional_wide(Some(black_box(""))))
    });

    group.bench_function("wide_string", |b| {
        b.iter(|| WideString::new(black_box("Untitled - Editor")))
    });

    group.finish();
}

fn bench_unicode_strings(c: &mut Criterion) {
    let mut group = c.benchmark_group("unicode_strings");

    let ascii = "Hello, World! This is a test string.";
    group.bench_function("ascii_to_wide", |b| b.iter(|| to_wide(black_box(ascii))));

    // Emojis need surrogate pairs.
    let unicode = "Hello, World! \u{1F600}\u{1F601}\u{1F602} \u{4E2D}\u{6587}";
    group.bench_function("unicode_to_wide", |b| {
        b.iter(|| to_wide(black_box(unicode)))
    });

    let cjk = "\u{4E2D}\u{6587}\u{65E5}\u{672C}\u{8A9E}".repeat(100);
    group.bench_function("cjk_to_wide", |b| b.iter(|| to_wide(black_box(&cjk))));

    group.finish();
}

#[cfg(windows)]
fn bench_read_text(c: &mut Criterion) {
    use ergonomic_user32::marshal::{read_fixed_text, read_text};

    let mut group = c.benchmark_group("read_text");
    let source = to_wide(&"Window title ".repeat(20));
    let len = source.len() as i32 - 1;

    group.bench_function("query_then_fill", |b| {
        b.iter(|| {
            read_text(
                || black_box(len),
                |buf| {
                    buf.copy_from_slice(&source[..buf.len()]);
                    len
                },
            )
        })
    });

    group.bench_function("fixed_255", |b| {
        b.iter(|| {
            read_fixed_text(255, |buf| {
                let n = buf.len().min(len as usize);
                buf[..n].copy_from_slice(&source[..n]);
                n as i32
            })
        })
    });

    group.finish();
}

#[cfg(not(windows))]
fn bench_read_text(_: &mut Criterion) {}

criterion_group!(
    benches,
    bench_to_wide,
    bench_from_wide,
    bench_window_title_args,
    bench_unicode_strings,
    bench_read_text
);
criterion_main!(benches);
