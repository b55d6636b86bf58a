//! Export utilities for ledgers and comparisons.
//!
//! The core mandates no persisted format; these helpers produce tabular CSV
//! for spreadsheet work and JSON for downstream tooling.

use crate::error::Result;
use crate::ledger::Ledger;
use crate::report::Comparison;
use std::path::Path;
use tracing::info;

/// Write a finalized ledger to CSV, one row per day.
///
/// Columns: `date,total_value,contribution`, then one `<name>_value` and one
/// `<name>_change` column per asset, in portfolio order.
pub fn export_ledger_csv(ledger: &Ledger, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let mut writer = csv::Writer::from_path(path)?;

    let mut header = vec![
        "date".to_string(),
        "total_value".to_string(),
        "contribution".to_string(),
    ];
    for name in ledger.asset_names() {
        header.push(format!("{}_value", name));
    }
    for name in ledger.asset_names() {
        header.push(format!("{}_change", name));
    }
    writer.write_record(&header)?;

    for row in ledger.rows() {
        let mut record = vec![
            row.date.to_string(),
            format!("{:.4}", row.total_value),
            format!("{:.4}", row.contribution),
        ];
        for value in &row.asset_values {
            record.push(format!("{:.4}", value));
        }
        for change in &row.price_changes {
            record.push(format!("{:.8}", change));
        }
        writer.write_record(&record)?;
    }

    writer.flush()?;
    info!("Exported {} ledger rows to {}", ledger.rows().len(), path.display());
    Ok(())
}

/// Serialize a comparison to pretty JSON.
pub fn comparison_to_json(comparison: &Comparison) -> String {
    serde_json::to_string_pretty(comparison).unwrap_or_else(|_| "{}".to_string())
}

/// Write a comparison to a JSON file.
pub fn export_comparison_json(comparison: &Comparison, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    std::fs::write(path, comparison_to_json(comparison))?;
    info!("Exported comparison to {}", path.display());
    Ok(())
}
