//! 统计聚合性能基准测试

use std::hint::black_box;

use chrono::{Duration, Utc};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use qrlink::analytics::{aggregate, classify_user_agent};
use qrlink::storage::{GeoInfo, ScanRow};

const USER_AGENTS: [&str; 5] = [
    "Mozilla/5.0 (iPhone; CPU iPhone OS 17_4 like Mac OS X)",
    "Mozilla/5.0 (Linux; Android 14; Pixel 8)",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64)",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_4)",
    "curl/8.5.0",
];

const COUNTRIES: [&str; 4] = ["BR", "US", "PT", "AR"];

fn create_rows(count: usize) -> Vec<ScanRow> {
    let start = Utc::now() - Duration::days(60);
    (0..count)
        .map(|i| ScanRow {
            created_at: start + Duration::minutes(i as i64 * 7),
            geo: GeoInfo {
                country: (i % 9 != 0).then(|| COUNTRIES[i % COUNTRIES.len()].to_string()),
                region: None,
                city: None,
            },
            user_agent: (i % 11 != 0).then(|| USER_AGENTS[i % USER_AGENTS.len()].to_string()),
        })
        .collect()
}

/// 全量聚合：不同历史规模
fn bench_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("stats/aggregate");
    let now = Utc::now();

    for size in [100usize, 1_000, 10_000] {
        let rows = create_rows(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &rows, |b, rows| {
            b.iter(|| aggregate(black_box(rows), now));
        });
    }

    group.finish();
}

fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("stats/classify_user_agent");
    group.throughput(Throughput::Elements(USER_AGENTS.len() as u64));

    group.bench_function("mixed", |b| {
        b.iter(|| {
            for ua in USER_AGENTS {
                black_box(classify_user_agent(Some(black_box(ua))));
            }
        });
    });

    group.finish();
}

criterion_group!(benches, bench_aggregate, bench_classify);
criterion_main!(benches);
