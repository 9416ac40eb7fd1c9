//! Benchmarks for greeting formatting.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use howdy::context::Tags;
use howdy::greeting::format_usd;

fn formatting_benchmark(c: &mut Criterion) {
    c.bench_function("format_usd", |b| {
        b.iter(|| format_usd(black_box(1_234_567_890)))
    });

    let tags = Tags::new()
        .with("request_id", "req-123")
        .with("user_id", "user-456");
    c.bench_function("render_prefix", |b| {
        b.iter(|| black_box(&tags).render_prefix())
    });
}

criterion_group!(benches, formatting_benchmark);
criterion_main!(benches);
