//! Integration tests for the simulator.

use chrono::NaiveDate;
use drip::config::SimulationConfig;
use drip::data::{load_asset, DataConfig};
use drip::engine::Simulator;
use drip::report::Comparison;
use drip::strategy::{ContributionStrategy, Proportional, Rebalancing};
use drip::types::{Asset, PricePoint};
use std::io::Write;

fn jan1() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

/// Build an asset from a list of daily closes starting on `start`.
fn asset_from(name: &str, weight: f64, start: NaiveDate, closes: &[f64]) -> Asset {
    let prices = closes
        .iter()
        .enumerate()
        .map(|(i, &c)| PricePoint::new(start + chrono::Duration::days(i as i64), c))
        .collect();
    Asset::new(name, weight, prices).unwrap()
}

/// Synthetic drifting closes with a deterministic wobble.
fn synthetic_closes(days: usize, initial: f64, daily_return: f64) -> Vec<f64> {
    let mut price = initial;
    (0..days)
        .map(|i| {
            let noise = ((i as f64 * 0.7).sin() + (i as f64 * 1.3).cos()) * 0.2;
            price *= 1.0 + daily_return + noise / 100.0;
            price
        })
        .collect()
}

fn quiet_config() -> SimulationConfig {
    SimulationConfig {
        show_progress: false,
        ..Default::default()
    }
}

#[test]
fn test_flat_prices_single_contribution() {
    // Two equal-weight assets, 40 flat days, capital 1000, contribution 500
    // on the 15th: exactly one contribution of 250 per asset under both
    // strategies (no drift means no correction either).
    let flat = vec![100.0; 40];
    let assets = vec![
        asset_from("a", 0.5, jan1(), &flat),
        asset_from("b", 0.5, jan1(), &flat),
    ];
    let sim = Simulator::new(quiet_config(), assets).unwrap();

    for strategy in [
        &Proportional as &dyn ContributionStrategy,
        &Rebalancing::new(1_000_000.0),
    ] {
        let run = sim.run(strategy).unwrap();

        assert_eq!(run.events.len(), 1, "{}", strategy.name());
        let event = &run.events[0];
        assert_eq!(event.date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert!((event.lines[0].allocated - 250.0).abs() < 1e-9);
        assert!((event.lines[1].allocated - 250.0).abs() < 1e-9);
        assert!((event.total_allocated - 500.0).abs() < 1e-9);

        assert!((run.final_value() - 1500.0).abs() < 1e-9);
        assert!((run.total_invested() - 1500.0).abs() < 1e-9);
    }
}

#[test]
fn test_row_zero_seeding() {
    let closes = synthetic_closes(30, 100.0, 0.001);
    let assets = vec![
        asset_from("a", 0.25, jan1(), &closes),
        asset_from("b", 0.75, jan1(), &closes),
    ];
    let sim = Simulator::new(quiet_config(), assets).unwrap();
    let run = sim.run(&Proportional).unwrap();

    let row0 = run.ledger.row(0);
    assert_eq!(row0.total_value, 1000.0);
    assert_eq!(row0.contribution, 0.0);
    assert!((row0.asset_values[0] - 250.0).abs() < 1e-9);
    assert!((row0.asset_values[1] - 750.0).abs() < 1e-9);
}

#[test]
fn test_total_value_invariant_on_every_row() {
    let closes_a = synthetic_closes(90, 100.0, 0.002);
    let closes_b = synthetic_closes(90, 40.0, -0.001);
    let closes_c = synthetic_closes(90, 250.0, 0.0);
    let assets = vec![
        asset_from("a", 0.5, jan1(), &closes_a),
        asset_from("b", 0.3, jan1(), &closes_b),
        asset_from("c", 0.2, jan1(), &closes_c),
    ];
    let sim = Simulator::new(quiet_config(), assets).unwrap();

    for strategy in [
        &Proportional as &dyn ContributionStrategy,
        &Rebalancing::new(1_000_000.0),
    ] {
        let run = sim.run(strategy).unwrap();
        assert!(run.ledger.is_complete());
        for row in run.ledger.rows() {
            let sum: f64 = row.asset_values.iter().sum();
            assert!(
                (row.total_value - sum).abs() < 1e-9,
                "{} row {}: total {} != sum {}",
                strategy.name(),
                row.date,
                row.total_value,
                sum
            );
        }
    }
}

#[test]
fn test_drift_conserves_value_on_noncontribution_days() {
    let closes_a = synthetic_closes(60, 120.0, 0.003);
    let closes_b = synthetic_closes(60, 80.0, -0.002);
    let assets = vec![
        asset_from("a", 0.6, jan1(), &closes_a),
        asset_from("b", 0.4, jan1(), &closes_b),
    ];
    let sim = Simulator::new(quiet_config(), assets).unwrap();
    let run = sim.run(&Rebalancing::new(1_000_000.0)).unwrap();

    let rows = run.ledger.rows();
    for i in 1..rows.len() {
        if rows[i].contribution > 0.0 {
            continue;
        }
        let expected: f64 = rows[i - 1]
            .asset_values
            .iter()
            .zip(&rows[i].price_changes)
            .map(|(v, c)| v * (1.0 + c))
            .sum();
        assert!(
            (rows[i].total_value - expected).abs() < 1e-9,
            "value created or destroyed on {}",
            rows[i].date
        );
    }
}

#[test]
fn test_rebalancing_allocations_bounded_by_contribution() {
    let closes_a = synthetic_closes(180, 100.0, 0.004);
    let closes_b = synthetic_closes(180, 100.0, -0.003);
    let assets = vec![
        asset_from("a", 0.5, jan1(), &closes_a),
        asset_from("b", 0.5, jan1(), &closes_b),
    ];
    let sim = Simulator::new(quiet_config(), assets).unwrap();
    let run = sim.run(&Rebalancing::new(1_000_000.0)).unwrap();

    assert!(!run.events.is_empty());
    for event in &run.events {
        assert!(event.total_allocated <= event.contribution + 1e-9);
        for line in &event.lines {
            assert!(line.allocated >= 0.0);
        }
    }
}

#[test]
fn test_proportional_allocations_exact() {
    let closes_a = synthetic_closes(120, 100.0, 0.004);
    let closes_b = synthetic_closes(120, 60.0, -0.002);
    let assets = vec![
        asset_from("a", 0.7, jan1(), &closes_a),
        asset_from("b", 0.3, jan1(), &closes_b),
    ];
    let sim = Simulator::new(quiet_config(), assets).unwrap();
    let run = sim.run(&Proportional).unwrap();

    for event in &run.events {
        assert!((event.lines[0].allocated - event.contribution * 0.7).abs() < 1e-12);
        assert!((event.lines[1].allocated - event.contribution * 0.3).abs() < 1e-12);
        assert!((event.total_allocated - event.contribution).abs() < 1e-9);
    }
}

#[test]
fn test_reruns_are_bit_identical() {
    let closes_a = synthetic_closes(200, 150.0, 0.001);
    let closes_b = synthetic_closes(200, 90.0, 0.002);
    let assets = vec![
        asset_from("a", 0.5, jan1(), &closes_a),
        asset_from("b", 0.5, jan1(), &closes_b),
    ];
    let sim = Simulator::new(quiet_config(), assets).unwrap();

    let first = sim.run(&Rebalancing::new(1_000_000.0)).unwrap();
    let second = sim.run(&Rebalancing::new(1_000_000.0)).unwrap();

    assert_eq!(first.ledger, second.ledger);
    assert_eq!(first.events, second.events);
}

#[test]
fn test_zero_weight_asset_under_rebalancing() {
    // A zero-weight asset is always over-weighted once it holds anything,
    // so its drift is never positive and it never receives an allocation.
    let closes_a = synthetic_closes(90, 100.0, -0.004);
    let closes_b = synthetic_closes(90, 100.0, 0.001);
    let assets = vec![
        asset_from("a", 1.0, jan1(), &closes_a),
        asset_from("b", 0.0, jan1(), &closes_b),
    ];
    let config = SimulationConfig {
        initial_capital: 1000.0,
        show_progress: false,
        ..Default::default()
    };
    let sim = Simulator::new(config, assets).unwrap();
    let run = sim.run(&Rebalancing::new(1_000_000.0)).unwrap();

    for event in &run.events {
        let zero_weight_line = event
            .lines
            .iter()
            .find(|l| l.name == "b")
            .expect("line for b");
        assert_eq!(zero_weight_line.allocated, 0.0);
    }
}

#[test]
fn test_comparison_end_to_end() {
    // Six months of diverging assets so rebalancing has drift to correct.
    let closes_a = synthetic_closes(180, 100.0, 0.003);
    let closes_b = synthetic_closes(180, 100.0, -0.001);
    let assets = vec![
        asset_from("a", 0.5, jan1(), &closes_a),
        asset_from("b", 0.5, jan1(), &closes_b),
    ];
    let sim = Simulator::new(quiet_config(), assets).unwrap();
    let (baseline, rebalanced) = sim.run_pair().unwrap();
    let comparison = Comparison::new(&baseline, &rebalanced);

    // Jan 1 + 179 days ends Jun 28: contributions on Jan..Jun 15.
    assert_eq!(baseline.events.len(), 6);
    assert!((comparison.money_invested - (1000.0 + 6.0 * 500.0)).abs() < 1e-9);

    let second_to_last = &baseline.ledger.rows()[baseline.ledger.rows().len() - 2];
    assert_eq!(comparison.baseline_final, second_to_last.total_value);

    let expected_diff = rebalanced.final_value() - baseline.final_value();
    assert!((comparison.difference - expected_diff).abs() < 1e-12);
    assert!(
        (comparison.difference_pct - expected_diff / baseline.final_value() * 100.0).abs() < 1e-12
    );
}

#[test]
fn test_csv_pipeline_with_gaps() {
    // Trading-day files with weekend gaps run through loading,
    // interpolation, alignment, and a full comparison.
    let dir = tempfile::tempdir().unwrap();

    let write_csv = |name: &str, rows: &[(&str, f64)]| {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "Date,Close").unwrap();
        for (date, close) in rows {
            writeln!(file, "{},{}", date, close).unwrap();
        }
        path
    };

    // Fri Jan 12 to Tue Jan 16, weekend missing.
    let path_a = write_csv(
        "a.csv",
        &[
            ("2024-01-12", 100.0),
            ("2024-01-15", 106.0),
            ("2024-01-16", 108.0),
        ],
    );
    let path_b = write_csv(
        "b.csv",
        &[
            ("2024-01-12", 50.0),
            ("2024-01-15", 50.0),
            ("2024-01-16", 49.0),
        ],
    );

    let data_config = DataConfig::default();
    let assets = vec![
        load_asset("a", 0.5, &path_a, &data_config).unwrap(),
        load_asset("b", 0.5, &path_b, &data_config).unwrap(),
    ];
    assert_eq!(assets[0].len(), 5);

    let sim = Simulator::new(quiet_config(), assets).unwrap();
    let (baseline, rebalanced) = sim.run_pair().unwrap();

    // Jan 15 is in range, so one contribution landed in both runs.
    assert_eq!(baseline.events.len(), 1);
    assert_eq!(rebalanced.events.len(), 1);

    let comparison = Comparison::new(&baseline, &rebalanced);
    assert!((comparison.money_invested - 1500.0).abs() < 1e-9);
}
