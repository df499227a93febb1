use chrono::{Duration, NaiveDate, TimeZone, Utc};
use criterion::{criterion_group, criterion_main, Criterion};
use greendex::models::{DashboardStats, DistanceUnit, TransportMode, Trip};
use greendex::services::AchievementEngine;
use std::hint::black_box;

/// Two trips a day for roughly three years.
fn long_history(today: NaiveDate) -> Vec<Trip> {
    (0..2_000)
        .map(|i| {
            let mode = TransportMode::ALL[i % TransportMode::ALL.len()];
            Trip {
                id: format!("trip-{}", i),
                date: today - Duration::days((i / 2) as i64),
                mode,
                distance: 5.0,
                unit: DistanceUnit::Miles,
                emissions: 0.9,
                savings: if mode.is_green() { 1.1 } else { 0.0 },
                notes: None,
            }
        })
        .collect()
}

fn benchmark_evaluation(c: &mut Criterion) {
    let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    let trips = long_history(today);

    let mut group = c.benchmark_group("long_history");

    group.bench_function("evaluate_fresh_engine", |b| {
        b.iter(|| {
            let mut engine = AchievementEngine::default();
            engine.evaluate_on(black_box(&trips), today, now)
        })
    });

    group.bench_function("dashboard_stats", |b| {
        b.iter(|| DashboardStats::from_trips(black_box(&trips), today))
    });

    group.finish();
}

criterion_group!(benches, benchmark_evaluation);
criterion_main!(benches);
