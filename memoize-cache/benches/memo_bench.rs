//! Criterion benchmarks for the memoized read paths: fresh hit and stale hit.

use std::sync::Arc;
use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use memoize_cache::{Memo, SafeMemoize};

fn bench_fresh_hit(c: &mut Criterion) {
    let cache = SafeMemoize::named("bench");
    cache.value(|| Memo::new(Arc::new(vec![0u8; 256]), Duration::from_secs(3600)));

    let mut g = c.benchmark_group("fresh_hit");
    g.throughput(Throughput::Elements(1));
    g.bench_function("value", |b| {
        b.iter(|| black_box(cache.value(|| unreachable!("fresh slot is never refetched"))));
    });
    g.finish();
}

fn bench_stale_hit(c: &mut Criterion) {
    let cache = SafeMemoize::named("bench-stale");
    cache.value(|| Memo::expired(Arc::new(vec![0u8; 256])));

    // Each refresh installs another expired memo, so every call stays on the stale path.
    let mut g = c.benchmark_group("stale_hit");
    g.throughput(Throughput::Elements(1));
    g.bench_function("value", |b| {
        b.iter(|| black_box(cache.value(|| Memo::expired(Arc::new(vec![1u8; 256])))));
    });
    g.finish();
}

fn bench_memo_is_valid(c: &mut Criterion) {
    let memo = Memo::new(42u64, Duration::from_secs(60));
    c.bench_function("memo_is_valid", |b| b.iter(|| black_box(memo.is_valid())));
}

criterion_group!(benches, bench_fresh_hit, bench_stale_hit, bench_memo_is_valid);
criterion_main!(benches);
