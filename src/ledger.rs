//! The day-indexed simulation ledger.
//!
//! A [`Ledger`] is seeded with row 0 and the precomputed per-day price-change
//! ratios, then filled strictly forward by the simulator: each row is
//! constructed once from the previous row plus that day's changes and is
//! never mutated afterwards. Rows are addressed by integer day index over a
//! verified contiguous calendar.

use crate::data::ensure_aligned;
use crate::error::{Result, SimulationError};
use crate::types::{Asset, LedgerRow};
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct Ledger {
    asset_names: Vec<String>,
    dates: Vec<NaiveDate>,
    /// Per-day, per-asset fractional price change. `changes[0]` is all zeros.
    changes: Vec<Vec<f64>>,
    rows: Vec<LedgerRow>,
}

impl Ledger {
    /// Seed a ledger from the asset list and initial capital.
    ///
    /// Row 0 holds the initial capital split at target weights with no
    /// contribution. Price-change ratios for every later day are computed
    /// here, once. Rejects an empty asset list, mismatched calendars,
    /// non-positive capital, and series too short to produce a comparison
    /// window (fewer than two days).
    pub fn seed(assets: &[Asset], initial_capital: f64) -> Result<Self> {
        if assets.is_empty() {
            return Err(SimulationError::NoData);
        }
        ensure_aligned(assets)?;
        if !initial_capital.is_finite() || initial_capital <= 0.0 {
            return Err(SimulationError::InvalidInput(format!(
                "Initial capital must be positive, got {}",
                initial_capital
            )));
        }

        let days = assets[0].len();
        if days < 2 {
            return Err(SimulationError::InvalidInput(format!(
                "Price history spans {} day(s); at least 2 are required",
                days
            )));
        }

        let asset_names: Vec<String> = assets.iter().map(|a| a.name.clone()).collect();
        let dates: Vec<NaiveDate> = assets[0].prices.iter().map(|p| p.date).collect();

        // Transpose per-asset change series into per-day rows.
        let per_asset: Vec<Vec<f64>> = assets.iter().map(|a| a.daily_changes()).collect();
        let changes: Vec<Vec<f64>> = (0..days)
            .map(|i| per_asset.iter().map(|c| c[i]).collect())
            .collect();

        let asset_values: Vec<f64> = assets
            .iter()
            .map(|a| initial_capital * a.target_weight)
            .collect();
        let row0 = LedgerRow {
            date: dates[0],
            total_value: initial_capital,
            contribution: 0.0,
            asset_values,
            price_changes: changes[0].clone(),
        };

        Ok(Self {
            asset_names,
            dates,
            changes,
            rows: vec![row0],
        })
    }

    /// Number of calendar days the ledger spans (built or not).
    pub fn calendar_len(&self) -> usize {
        self.dates.len()
    }

    /// Date at a day index.
    pub fn date_at(&self, index: usize) -> NaiveDate {
        self.dates[index]
    }

    /// Precomputed per-asset price changes at a day index.
    pub fn changes_at(&self, index: usize) -> &[f64] {
        &self.changes[index]
    }

    /// Append the next row. Rows must arrive in calendar order.
    pub fn push(&mut self, row: LedgerRow) {
        debug_assert_eq!(row.date, self.dates[self.rows.len()]);
        debug_assert_eq!(row.asset_values.len(), self.asset_names.len());
        self.rows.push(row);
    }

    /// Whether every calendar day has a row.
    pub fn is_complete(&self) -> bool {
        self.rows.len() == self.dates.len()
    }

    pub fn rows(&self) -> &[LedgerRow] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> &LedgerRow {
        &self.rows[index]
    }

    pub fn asset_names(&self) -> &[String] {
        &self.asset_names
    }

    /// End-of-period value: the total on the second-to-last row.
    ///
    /// The last row is deliberately excluded as the final, possibly
    /// incomplete period.
    pub fn final_value(&self) -> f64 {
        self.rows[self.rows.len() - 2].total_value
    }

    /// Sum of all cash injected over the ledger's life.
    pub fn total_contributions(&self) -> f64 {
        self.rows.iter().map(|r| r.contribution).sum()
    }
}
