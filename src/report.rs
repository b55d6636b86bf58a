//! Comparison of two simulation runs and terminal reporting.

use crate::engine::SimulationRun;
use crate::types::AllocationEvent;
use colored::Colorize;
use serde::{Deserialize, Serialize};

/// Unicode block characters for sparklines, from lowest to highest.
const SPARKLINE_CHARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// End-of-period comparison between the proportional baseline and the
/// rebalancing run.
///
/// Final values are taken from the second-to-last ledger row of each run;
/// the percentage difference is relative to the baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub baseline_name: String,
    pub rebalanced_name: String,
    /// Initial capital plus all contributions.
    pub money_invested: f64,
    pub baseline_final: f64,
    pub rebalanced_final: f64,
    pub difference: f64,
    pub difference_pct: f64,
}

impl Comparison {
    /// Compare two finalized runs built from the same asset list and
    /// calendar.
    pub fn new(baseline: &SimulationRun, rebalanced: &SimulationRun) -> Self {
        let baseline_final = baseline.final_value();
        let rebalanced_final = rebalanced.final_value();
        let difference = rebalanced_final - baseline_final;

        Self {
            baseline_name: baseline.strategy_name.clone(),
            rebalanced_name: rebalanced.strategy_name.clone(),
            money_invested: baseline.total_invested(),
            baseline_final,
            rebalanced_final,
            difference,
            difference_pct: difference / baseline_final * 100.0,
        }
    }
}

/// Generate an ASCII sparkline of a value series.
pub fn sparkline(values: &[f64], width: usize) -> String {
    if values.is_empty() || width == 0 {
        return String::new();
    }

    let sampled = if values.len() > width {
        downsample(values, width)
    } else {
        values.to_vec()
    };

    let min_val = sampled.iter().cloned().fold(f64::INFINITY, f64::min);
    let max_val = sampled.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let range = max_val - min_val;

    let mut result = String::with_capacity(sampled.len() * 4);
    for &val in &sampled {
        let normalized = if range > 0.0 {
            ((val - min_val) / range).clamp(0.0, 1.0)
        } else {
            0.5 // All values are the same
        };
        let idx = ((normalized * 7.0).round() as usize).min(7);
        result.push(SPARKLINE_CHARS[idx]);
    }

    result
}

/// Downsample a slice of values to a target length using averaging.
fn downsample(values: &[f64], target: usize) -> Vec<f64> {
    let chunk = values.len() as f64 / target as f64;
    (0..target)
        .map(|i| {
            let start = (i as f64 * chunk) as usize;
            let end = (((i + 1) as f64 * chunk) as usize).min(values.len()).max(start + 1);
            values[start..end].iter().sum::<f64>() / (end - start) as f64
        })
        .collect()
}

/// One-line summary of a run: sparkline plus final value.
pub fn run_summary(run: &SimulationRun, width: usize) -> String {
    let totals: Vec<f64> = run.ledger.rows().iter().map(|r| r.total_value).collect();
    format!(
        "[{}] {} | Final: {:.2} | Invested: {:.2}",
        sparkline(&totals, width),
        run.strategy_name,
        run.final_value(),
        run.total_invested()
    )
}

fn format_signed(value: f64, suffix: &str) -> String {
    let text = format!("{:+.2}{}", value, suffix);
    if value >= 0.0 {
        text.green().to_string()
    } else {
        text.red().to_string()
    }
}

/// Print a comparison report to stdout.
pub fn print_report(baseline: &SimulationRun, rebalanced: &SimulationRun, comparison: &Comparison) {
    let rows = baseline.ledger.rows();
    let first = rows[0].date;
    let last = rows[rows.len() - 1].date;

    println!();
    println!("{}", "═".repeat(60).blue());
    println!("{}", " CONTRIBUTION STRATEGY COMPARISON ".bold().blue());
    println!("{}", "═".repeat(60).blue());
    println!();

    println!("{}", "Overview".bold().underline());
    println!("  Period:          {} to {}", first, last);
    println!("  Days:            {}", rows.len());
    println!(
        "  Assets:          {}",
        baseline.ledger.asset_names().join(", ")
    );
    println!("  Money Invested:  {:>12.2}", comparison.money_invested);
    println!();

    println!("{}", "Strategies".bold().underline());
    println!("  {}", run_summary(baseline, 40));
    println!("  {}", run_summary(rebalanced, 40));
    println!();

    println!("{}", "Difference".bold().underline());
    println!(
        "  Absolute:        {:>12}",
        format_signed(comparison.difference, "")
    );
    println!(
        "  Relative:        {:>12}",
        format_signed(comparison.difference_pct, "%")
    );
    println!();
}

/// Print the per-asset allocation lines of every contribution day.
pub fn print_allocation_events(events: &[AllocationEvent]) {
    for event in events {
        println!(
            "{} (contribution {:.2}):",
            event.date.to_string().bold(),
            event.contribution
        );
        for line in &event.lines {
            println!(
                "  {:<16} real weight {:>6.2}%  invested {:>10.2}",
                line.name,
                line.real_weight * 100.0,
                line.allocated
            );
        }
        println!("  total invested {:.2}", event.total_allocated);
        println!();
    }
}
