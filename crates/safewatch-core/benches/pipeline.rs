//! Benchmarks for rule evaluation and ingestion

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use safewatch::alerting::{evaluate, ChannelBroadcaster};
use safewatch::collector::{Pipeline, PipelineConfig};
use safewatch::db::MemoryStore;
use safewatch::models::Reading;

fn bench_evaluate(c: &mut Criterion) {
    let alerting = Reading::new("s1", "w1", "HeartRate", 130.0);
    let safe = Reading::new("s1", "w1", "oxygen", 98.0);

    c.bench_function("evaluate_alerting", |b| b.iter(|| evaluate(black_box(&alerting))));
    c.bench_function("evaluate_safe", |b| b.iter(|| evaluate(black_box(&safe))));
}

fn bench_ingest(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let pipeline = Pipeline::new(
        PipelineConfig::default(),
        Arc::new(MemoryStore::new()),
        Arc::new(ChannelBroadcaster::default()),
    );

    let mut i = 0u32;
    c.bench_function("ingest", |b| {
        b.to_async(&runtime).iter(|| {
            i = i.wrapping_add(1);
            let reading = Reading::new("s1", format!("w{}", i % 256), "gas", f64::from(i % 120));
            pipeline.ingest(reading)
        });
    });
}

criterion_group!(benches, bench_evaluate, bench_ingest);
criterion_main!(benches);
