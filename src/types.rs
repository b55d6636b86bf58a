//! Core data types for the simulator.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SimulationError};

/// A single closing price on a calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }

    /// Validate that the price is usable (positive and finite).
    pub fn validate(&self) -> bool {
        self.close.is_finite() && self.close > 0.0
    }
}

/// An asset held in the portfolio: a name, a target weight, and its
/// gap-free daily price history.
///
/// The price series must cover a contiguous daily calendar (one point per
/// day, no gaps); [`crate::data::interpolate_daily`] produces that shape
/// from raw trading-day data. Assets are immutable after load and shared
/// read-only across strategy runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub name: String,
    /// Target fraction of total portfolio value, in [0, 1].
    pub target_weight: f64,
    pub prices: Vec<PricePoint>,
}

impl Asset {
    /// Create a new asset, validating the weight and the series.
    pub fn new(
        name: impl Into<String>,
        target_weight: f64,
        prices: Vec<PricePoint>,
    ) -> Result<Self> {
        let name = name.into();
        if !(0.0..=1.0).contains(&target_weight) || !target_weight.is_finite() {
            return Err(SimulationError::ConfigError(format!(
                "Target weight for {} must be in [0, 1], got {}",
                name, target_weight
            )));
        }
        if prices.is_empty() {
            return Err(SimulationError::NoData);
        }
        if let Some(bad) = prices.iter().find(|p| !p.validate()) {
            return Err(SimulationError::DataError(format!(
                "Non-positive or non-finite price for {} on {}: {}",
                name, bad.date, bad.close
            )));
        }
        Ok(Self {
            name,
            target_weight,
            prices,
        })
    }

    /// First date covered by the series.
    pub fn start_date(&self) -> NaiveDate {
        self.prices[0].date
    }

    /// Last date covered by the series.
    pub fn end_date(&self) -> NaiveDate {
        self.prices[self.prices.len() - 1].date
    }

    /// Number of calendar days covered.
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// Day-over-day fractional price changes, one per calendar day.
    ///
    /// The first day has no prior close, so its change is 0.
    pub fn daily_changes(&self) -> Vec<f64> {
        let mut changes = Vec::with_capacity(self.prices.len());
        changes.push(0.0);
        for window in self.prices.windows(2) {
            changes.push(window[1].close / window[0].close - 1.0);
        }
        changes
    }
}

/// One day of the simulation ledger.
///
/// `asset_values` and `price_changes` are indexed by asset position in the
/// portfolio's asset list. Rows are constructed once, in forward date order,
/// and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerRow {
    pub date: NaiveDate,
    /// Sum of `asset_values` on this day.
    pub total_value: f64,
    /// Cash injected on this day (0 except on contribution days).
    pub contribution: f64,
    /// Per-asset value after drift and any contribution.
    pub asset_values: Vec<f64>,
    /// Per-asset day-over-day fractional price change.
    pub price_changes: Vec<f64>,
}

/// How a single contribution was split across one asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationLine {
    pub name: String,
    /// The asset's actual fraction of total value on the prior day.
    pub real_weight: f64,
    /// Amount of the contribution allocated to this asset, after clamping.
    pub allocated: f64,
}

/// Record of one contribution day: the per-asset split and its total.
///
/// The amounts here are exactly the values applied to the ledger; reporting
/// consumes this record rather than recomputing the split.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationEvent {
    pub date: NaiveDate,
    pub contribution: f64,
    pub lines: Vec<AllocationLine>,
    pub total_allocated: f64,
}
