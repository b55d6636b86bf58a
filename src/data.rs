//! Price-series loading and preparation.
//!
//! The simulator requires one closing price per calendar day, with every
//! asset covering an identical date range. This module loads raw trading-day
//! CSV data, fills the missing calendar days by linear interpolation, and
//! verifies the cross-asset alignment precondition.

use crate::error::{Result, SimulationError};
use crate::types::{Asset, PricePoint};
use chrono::NaiveDate;
use csv::ReaderBuilder;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info, warn};

/// Raw CSV row with flexible column naming.
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(
        alias = "Date",
        alias = "date",
        alias = "DATE",
        alias = "Timestamp",
        alias = "timestamp"
    )]
    date: String,
    #[serde(alias = "Close", alias = "close", alias = "c", alias = "Adj Close")]
    close: f64,
}

/// Data source configuration.
#[derive(Debug, Clone)]
pub struct DataConfig {
    /// Date format string for parsing (e.g., "%Y-%m-%d").
    pub date_format: Option<String>,
    /// Whether the CSV has headers.
    pub has_headers: bool,
    /// CSV delimiter character.
    pub delimiter: u8,
    /// Skip invalid rows instead of failing.
    pub skip_invalid: bool,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            date_format: None,
            has_headers: true,
            delimiter: b',',
            skip_invalid: true,
        }
    }
}

/// Parse a date string with multiple format attempts.
fn parse_date(s: &str, format: Option<&str>) -> Result<NaiveDate> {
    if let Some(fmt) = format {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d);
        }
    }

    let formats = [
        "%Y-%m-%d",
        "%Y/%m/%d",
        "%d-%m-%Y",
        "%d/%m/%Y",
        "%m/%d/%Y",
        "%d-%b-%Y",  // 15-Jan-2024
        "%b %d, %Y", // Jan 15, 2024
    ];

    for fmt in &formats {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d);
        }
    }

    Err(SimulationError::DataError(format!(
        "Could not parse date: '{}'",
        s
    )))
}

/// Load a closing-price series from a CSV file.
///
/// Rows are sorted by date and duplicate dates removed. The returned series
/// still reflects trading days only; run it through [`interpolate_daily`]
/// before simulation.
pub fn load_series(path: impl AsRef<Path>, config: &DataConfig) -> Result<Vec<PricePoint>> {
    let path = path.as_ref();
    info!("Loading price series from: {}", path.display());

    let mut reader = ReaderBuilder::new()
        .has_headers(config.has_headers)
        .delimiter(config.delimiter)
        .flexible(true)
        .from_path(path)?;

    let mut points = Vec::new();
    let mut skipped = 0;
    let mut row_num = 0;

    for result in reader.deserialize() {
        row_num += 1;
        let row: CsvRow = match result {
            Ok(r) => r,
            Err(e) => {
                if config.skip_invalid {
                    debug!("Skipping row {}: {}", row_num, e);
                    skipped += 1;
                    continue;
                } else {
                    return Err(SimulationError::CsvError(e));
                }
            }
        };

        let date = match parse_date(&row.date, config.date_format.as_deref()) {
            Ok(d) => d,
            Err(e) => {
                if config.skip_invalid {
                    debug!("Skipping row {} due to date parse error: {}", row_num, e);
                    skipped += 1;
                    continue;
                } else {
                    return Err(e);
                }
            }
        };

        let point = PricePoint::new(date, row.close);
        if !point.validate() {
            if config.skip_invalid {
                debug!("Skipping row {} due to invalid price: {:?}", row_num, point);
                skipped += 1;
                continue;
            } else {
                return Err(SimulationError::DataError(format!(
                    "Invalid price at row {}: {:?}",
                    row_num, point
                )));
            }
        }

        points.push(point);
    }

    if skipped > 0 {
        warn!("Skipped {} invalid rows", skipped);
    }

    points.sort_by_key(|p| p.date);

    let original_len = points.len();
    points.dedup_by_key(|p| p.date);
    if points.len() < original_len {
        warn!("Removed {} duplicate dates", original_len - points.len());
    }

    if points.is_empty() {
        return Err(SimulationError::NoData);
    }

    info!(
        "Loaded {} prices from {} to {}",
        points.len(),
        points[0].date,
        points[points.len() - 1].date
    );

    Ok(points)
}

/// Expand a trading-day series to one point per calendar day.
///
/// Missing days between two known prices are filled by linear interpolation
/// between the neighboring closes. The input must be sorted by date with no
/// duplicates (the shape [`load_series`] returns).
pub fn interpolate_daily(points: &[PricePoint]) -> Vec<PricePoint> {
    if points.len() < 2 {
        return points.to_vec();
    }

    let span = (points[points.len() - 1].date - points[0].date).num_days() as usize + 1;
    let mut result = Vec::with_capacity(span);

    for window in points.windows(2) {
        result.push(window[0]);

        let gap_days = (window[1].date - window[0].date).num_days();
        for j in 1..gap_days {
            let t = j as f64 / gap_days as f64;
            let close = window[0].close * (1.0 - t) + window[1].close * t;
            result.push(PricePoint::new(
                window[0].date + chrono::Duration::days(j),
                close,
            ));
        }
    }
    result.push(points[points.len() - 1]);

    result
}

/// Load one asset: read its CSV series, fill calendar gaps, attach the
/// target weight.
pub fn load_asset(
    name: impl Into<String>,
    target_weight: f64,
    path: impl AsRef<Path>,
    config: &DataConfig,
) -> Result<Asset> {
    let raw = load_series(path, config)?;
    let daily = interpolate_daily(&raw);
    if daily.len() > raw.len() {
        debug!("Interpolated {} missing calendar days", daily.len() - raw.len());
    }
    Asset::new(name, target_weight, daily)
}

/// Verify that every asset covers the same contiguous daily calendar.
///
/// The simulation addresses rows by integer day index, so a mismatched
/// range in any asset is rejected here, before the first row is built.
pub fn ensure_aligned(assets: &[Asset]) -> Result<()> {
    let Some(first) = assets.first() else {
        return Err(SimulationError::NoData);
    };

    let expected_days = (first.end_date() - first.start_date()).num_days() as usize + 1;
    for asset in assets {
        let actual_days = (asset.end_date() - asset.start_date()).num_days() as usize + 1;
        if asset.start_date() != first.start_date()
            || asset.end_date() != first.end_date()
            || asset.len() != first.len()
            || asset.len() != actual_days
        {
            return Err(SimulationError::CalendarMismatch {
                symbol: asset.name.clone(),
                expected_start: first.start_date(),
                expected_end: first.end_date(),
                expected_days,
                actual_start: asset.start_date(),
                actual_end: asset.end_date(),
                actual_days: asset.len(),
            });
        }
    }

    Ok(())
}
