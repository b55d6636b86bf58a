//! The day-by-day portfolio simulator.

use crate::config::SimulationConfig;
use crate::data::ensure_aligned;
use crate::error::{Result, SimulationError};
use crate::ledger::Ledger;
use crate::strategy::{AllocationContext, ContributionStrategy, Proportional, Rebalancing};
use crate::types::{AllocationEvent, Asset, LedgerRow};
use chrono::Datelike;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

/// Results from one simulation run.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationRun {
    /// Strategy name.
    pub strategy_name: String,
    /// Starting capital.
    pub initial_capital: f64,
    /// The finalized day-by-day ledger.
    pub ledger: Ledger,
    /// One record per contribution day.
    pub events: Vec<AllocationEvent>,
}

impl SimulationRun {
    /// End-of-period value (second-to-last ledger row, see
    /// [`Ledger::final_value`]).
    pub fn final_value(&self) -> f64 {
        self.ledger.final_value()
    }

    /// Initial capital plus every contribution made over the run.
    pub fn total_invested(&self) -> f64 {
        self.initial_capital + self.ledger.total_contributions()
    }
}

/// The simulator: walks the shared calendar once per strategy, producing a
/// finalized ledger for each run.
pub struct Simulator {
    config: SimulationConfig,
    assets: Vec<Asset>,
}

impl Simulator {
    /// Create a simulator over a validated asset list.
    ///
    /// Rejects invalid configuration, an empty asset list, and assets whose
    /// date ranges disagree — all before the first row is built.
    pub fn new(config: SimulationConfig, assets: Vec<Asset>) -> Result<Self> {
        config.validate()?;
        if assets.is_empty() {
            return Err(SimulationError::NoData);
        }
        ensure_aligned(&assets)?;
        Ok(Self { config, assets })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    /// Run one simulation with the given strategy.
    ///
    /// A pure function of the asset list, the configuration, and the
    /// strategy: identical inputs produce a bit-identical ledger.
    pub fn run(&self, strategy: &dyn ContributionStrategy) -> Result<SimulationRun> {
        let mut ledger = Ledger::seed(&self.assets, self.config.initial_capital)?;
        let days = ledger.calendar_len();

        info!(
            "Simulating {} over {} days ({} to {})",
            strategy.name(),
            days,
            ledger.date_at(0),
            ledger.date_at(days - 1)
        );

        let progress = if self.config.show_progress {
            let pb = ProgressBar::new(days as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
                    .unwrap()
                    .progress_chars("#>-"),
            );
            pb.inc(1); // row 0 is seeded
            Some(pb)
        } else {
            None
        };

        let names: Vec<String> = self.assets.iter().map(|a| a.name.clone()).collect();
        let weights: Vec<f64> = self.assets.iter().map(|a| a.target_weight).collect();
        let mut events = Vec::new();

        for i in 1..days {
            let date = ledger.date_at(i);
            let changes = ledger.changes_at(i).to_vec();
            let prior = ledger.row(i - 1).asset_values.clone();

            // Passive drift: no cash flow, value scales with the day's
            // price change.
            let mut values: Vec<f64> = prior
                .iter()
                .zip(&changes)
                .map(|(v, c)| v * (1.0 + c))
                .collect();

            let mut contribution = 0.0;
            if date.day() == self.config.contribution_day {
                contribution = self.config.monthly_contribution;
                let ctx = AllocationContext {
                    date,
                    contribution,
                    names: &names,
                    target_weights: &weights,
                    prior_values: &prior,
                };
                let lines = strategy.allocate(&ctx);
                let total_allocated: f64 = lines.iter().map(|l| l.allocated).sum();

                for (value, line) in values.iter_mut().zip(&lines) {
                    *value += line.allocated;
                }
                for line in &lines {
                    debug!(
                        "{}: real weight {:.2}%, invested {:.2}",
                        line.name,
                        line.real_weight * 100.0,
                        line.allocated
                    );
                }
                debug!("{}: total invested {:.2}", date, total_allocated);

                events.push(AllocationEvent {
                    date,
                    contribution,
                    lines,
                    total_allocated,
                });
            }

            let total_value = values.iter().sum();
            ledger.push(LedgerRow {
                date,
                total_value,
                contribution,
                asset_values: values,
                price_changes: changes,
            });

            if let Some(ref pb) = progress {
                pb.inc(1);
            }
        }

        if let Some(pb) = progress {
            pb.finish_and_clear();
        }

        info!(
            "{} complete: {} contribution days, final value {:.2}",
            strategy.name(),
            events.len(),
            ledger.final_value()
        );

        Ok(SimulationRun {
            strategy_name: strategy.name().to_string(),
            initial_capital: self.config.initial_capital,
            ledger,
            events,
        })
    }

    /// Run the proportional baseline and the rebalancing variant.
    ///
    /// The runs are independent (each owns its ledger; the asset list is
    /// read-only), so they execute in parallel. Output is identical to two
    /// sequential calls.
    pub fn run_pair(&self) -> Result<(SimulationRun, SimulationRun)> {
        let rebalancing = Rebalancing::new(self.config.leverage);
        let (baseline, rebalanced) =
            rayon::join(|| self.run(&Proportional), || self.run(&rebalancing));
        Ok((baseline?, rebalanced?))
    }
}
