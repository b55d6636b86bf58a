//! Performance benchmarks for the simulator.
//!
//! Run with: cargo bench

use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use drip::config::SimulationConfig;
use drip::data::interpolate_daily;
use drip::engine::Simulator;
use drip::strategy::{Proportional, Rebalancing};
use drip::types::{Asset, PricePoint};

/// Generate a synthetic daily price series for benchmarking.
fn generate_prices(count: usize, initial: f64) -> Vec<PricePoint> {
    let start = NaiveDate::from_ymd_opt(2010, 1, 1).unwrap();
    let mut price = initial;
    (0..count)
        .map(|i| {
            let noise = ((i as f64 * 0.7).sin() + (i as f64 * 1.3).cos()) * 0.002;
            price *= 1.0 + 0.0002 + noise;
            PricePoint::new(start + chrono::Duration::days(i as i64), price)
        })
        .collect()
}

fn make_simulator(days: usize, n_assets: usize) -> Simulator {
    let assets: Vec<Asset> = (0..n_assets)
        .map(|k| {
            Asset::new(
                format!("asset{}", k),
                1.0 / n_assets as f64,
                generate_prices(days, 50.0 + k as f64 * 25.0),
            )
            .unwrap()
        })
        .collect();
    let config = SimulationConfig {
        show_progress: false,
        ..Default::default()
    };
    Simulator::new(config, assets).unwrap()
}

fn bench_single_runs(c: &mut Criterion) {
    let mut group = c.benchmark_group("run");

    for days in [365, 1825, 3650].iter() {
        let sim = make_simulator(*days, 5);
        group.bench_with_input(BenchmarkId::new("proportional", days), days, |b, _| {
            b.iter(|| sim.run(black_box(&Proportional)).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("rebalancing", days), days, |b, _| {
            b.iter(|| sim.run(black_box(&Rebalancing::new(1_000_000.0))).unwrap())
        });
    }

    group.finish();
}

fn bench_run_pair(c: &mut Criterion) {
    let sim = make_simulator(3650, 5);
    c.bench_function("run_pair_10y_5assets", |b| {
        b.iter(|| sim.run_pair().unwrap())
    });
}

fn bench_interpolation(c: &mut Criterion) {
    // Trading-day series: drop weekends from a 10-year calendar.
    let daily = generate_prices(3650, 100.0);
    let trading: Vec<PricePoint> = daily
        .iter()
        .filter(|p| {
            use chrono::Datelike;
            p.date.weekday().number_from_monday() <= 5
        })
        .copied()
        .collect();

    c.bench_function("interpolate_daily_10y", |b| {
        b.iter(|| interpolate_daily(black_box(&trading)))
    });
}

criterion_group!(benches, bench_single_runs, bench_run_pair, bench_interpolation);
criterion_main!(benches);
