//! Drip - a monthly-contribution portfolio simulator.
//!
//! # Overview
//!
//! Drip simulates the growth of a multi-asset portfolio under two
//! contribution strategies over historical daily price series, and reports
//! the end-of-period difference between them:
//!
//! - **Deterministic replay**: a pure day-by-day walk over a verified
//!   contiguous calendar; identical inputs give bit-identical ledgers
//! - **Two strategies**: proportional top-up at fixed target weights, and
//!   drift-correcting rebalancing with a tunable leverage constant
//! - **Gap-free data**: trading-day CSVs are expanded to calendar days by
//!   linear interpolation before simulation
//! - **Full ledgers**: per-day, per-asset values and price changes, ready
//!   for export or further analysis
//! - **Configuration files**: TOML-based configuration for reproducible runs
//!
//! # Quick Start
//!
//! ```no_run
//! use drip::{
//!     config::SimulationConfig,
//!     data::{load_asset, DataConfig},
//!     engine::Simulator,
//!     report::Comparison,
//! };
//!
//! let data_config = DataConfig::default();
//! let assets = vec![
//!     load_asset("gold", 0.5, "data/gold.csv", &data_config).unwrap(),
//!     load_asset("stocks", 0.5, "data/stocks.csv", &data_config).unwrap(),
//! ];
//!
//! let simulator = Simulator::new(SimulationConfig::default(), assets).unwrap();
//! let (baseline, rebalanced) = simulator.run_pair().unwrap();
//!
//! let comparison = Comparison::new(&baseline, &rebalanced);
//! println!("Difference: {:.2} ({:.2}%)", comparison.difference, comparison.difference_pct);
//! ```
//!
//! # Custom Strategies
//!
//! Implement the `ContributionStrategy` trait to control how each monthly
//! contribution is split:
//!
//! ```
//! use drip::strategy::{AllocationContext, ContributionStrategy};
//! use drip::types::AllocationLine;
//!
//! struct FirstAssetOnly;
//!
//! impl ContributionStrategy for FirstAssetOnly {
//!     fn name(&self) -> &str {
//!         "first-asset-only"
//!     }
//!
//!     fn allocate(&self, ctx: &AllocationContext) -> Vec<AllocationLine> {
//!         let total: f64 = ctx.prior_values.iter().sum();
//!         ctx.names
//!             .iter()
//!             .enumerate()
//!             .map(|(i, name)| AllocationLine {
//!                 name: name.clone(),
//!                 real_weight: ctx.prior_values[i] / total,
//!                 allocated: if i == 0 { ctx.contribution } else { 0.0 },
//!             })
//!             .collect()
//!     }
//! }
//! ```
//!
//! # Modules
//!
//! - [`types`]: Core data types (PricePoint, Asset, LedgerRow)
//! - [`data`]: CSV loading, interpolation, and calendar alignment
//! - [`config`]: Run parameters and TOML configuration files
//! - [`ledger`]: The day-indexed simulation ledger
//! - [`strategy`]: ContributionStrategy trait and the built-in strategies
//! - [`engine`]: The simulator
//! - [`report`]: Comparison and terminal reporting
//! - [`export`]: Ledger CSV and comparison JSON export

pub mod config;
pub mod data;
pub mod engine;
pub mod error;
pub mod export;
pub mod ledger;
pub mod report;
pub mod strategy;
pub mod types;

// Re-exports for convenience
pub use config::{SimulationConfig, SimulationFileConfig};
pub use engine::{SimulationRun, Simulator};
pub use error::{Result, SimulationError};
pub use ledger::Ledger;
pub use report::Comparison;
pub use strategy::{AllocationContext, ContributionStrategy, Proportional, Rebalancing};
pub use types::{AllocationEvent, AllocationLine, Asset, LedgerRow, PricePoint};
