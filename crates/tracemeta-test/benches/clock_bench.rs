//! Benchmarks for clock value conversions

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use tracemeta_engine::{cycles_to_ns, ns_from_origin, NS_PER_S};
use tracemeta_ir::ClockClassOffset;
use tracemeta_test::Hierarchy;

fn bench_cycles_to_ns_1ghz(c: &mut Criterion) {
    c.bench_function("cycles_to_ns_1ghz", |b| {
        b.iter(|| black_box(cycles_to_ns(NS_PER_S, black_box(123_456_789))))
    });
}

fn bench_cycles_to_ns_odd_frequency(c: &mut Criterion) {
    c.bench_function("cycles_to_ns_odd_frequency", |b| {
        b.iter(|| black_box(cycles_to_ns(black_box(2_397_000_000), black_box(123_456_789))))
    });
}

fn bench_ns_from_origin(c: &mut Criterion) {
    c.bench_function("ns_from_origin", |b| {
        b.iter(|| {
            black_box(ns_from_origin(
                black_box(1_600_000_000),
                black_box(500),
                black_box(1_000),
                black_box(987_654),
            ))
        })
    });
}

fn bench_clock_class_conversion(c: &mut Criterion) {
    let hierarchy = Hierarchy::new().expect("fixture");
    let mut clock_class = hierarchy
        .trace_class
        .create_clock_class()
        .expect("clock class");
    clock_class.set_frequency(1_000).expect("frequency");
    clock_class
        .set_offset(ClockClassOffset::new(1_600_000_000, 500))
        .expect("offset");

    c.bench_function("clock_class_cycles_to_ns_from_origin", |b| {
        let mut cycles = 0u64;
        b.iter(|| {
            cycles = cycles.wrapping_add(1) % 1_000_000;
            black_box(clock_class.cycles_to_ns_from_origin(cycles))
        })
    });
}

criterion_group!(
    benches,
    bench_cycles_to_ns_1ghz,
    bench_cycles_to_ns_odd_frequency,
    bench_ns_from_origin,
    bench_clock_class_conversion,
);

criterion_main!(benches);
