//! Configuration for simulation runs.
//!
//! Allows loading the portfolio and simulation parameters from TOML files
//! for reproducibility.

use crate::data::{load_asset, DataConfig};
use crate::error::{Result, SimulationError};
use crate::types::Asset;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Parameters of one simulation run.
///
/// Passed to the simulator at construction; there is no process-wide state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Starting capital, invested at target weights on day 0.
    pub initial_capital: f64,
    /// Cash injected on each contribution day.
    pub monthly_contribution: f64,
    /// Multiplier on weight drift when rebalancing. Large values force a
    /// full correction toward target weight, subject to budget clamping.
    pub leverage: f64,
    /// Day of month on which contributions land.
    pub contribution_day: u32,
    /// Show a progress bar while simulating.
    pub show_progress: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            initial_capital: 1_000.0,
            monthly_contribution: 500.0,
            leverage: 1_000_000.0,
            contribution_day: 15,
            show_progress: true,
        }
    }
}

impl SimulationConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if !self.initial_capital.is_finite() || self.initial_capital <= 0.0 {
            return Err(SimulationError::ConfigError(format!(
                "Initial capital must be positive, got {}",
                self.initial_capital
            )));
        }
        if !self.monthly_contribution.is_finite() || self.monthly_contribution < 0.0 {
            return Err(SimulationError::ConfigError(format!(
                "Monthly contribution must be non-negative, got {}",
                self.monthly_contribution
            )));
        }
        if !self.leverage.is_finite() {
            return Err(SimulationError::ConfigError(
                "Leverage must be finite".to_string(),
            ));
        }
        if !(1..=31).contains(&self.contribution_day) {
            return Err(SimulationError::ConfigError(format!(
                "Contribution day must be in 1..=31, got {}",
                self.contribution_day
            )));
        }
        Ok(())
    }
}

/// Complete simulation configuration loaded from a file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimulationFileConfig {
    /// Simulation parameters.
    #[serde(default)]
    pub simulation: SimulationSettings,
    /// Data loading settings.
    #[serde(default)]
    pub data: DataSettings,
    /// Portfolio assets, in allocation order.
    #[serde(default)]
    pub assets: Vec<AssetEntry>,
}

/// Simulation parameters as they appear in the file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationSettings {
    #[serde(default = "default_capital")]
    pub initial_capital: f64,
    #[serde(default = "default_contribution")]
    pub monthly_contribution: f64,
    #[serde(default = "default_leverage")]
    pub leverage: f64,
    #[serde(default = "default_contribution_day")]
    pub contribution_day: u32,
}

fn default_capital() -> f64 { 1_000.0 }
fn default_contribution() -> f64 { 500.0 }
fn default_leverage() -> f64 { 1_000_000.0 }
fn default_contribution_day() -> u32 { 15 }

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            initial_capital: default_capital(),
            monthly_contribution: default_contribution(),
            leverage: default_leverage(),
            contribution_day: default_contribution_day(),
        }
    }
}

/// Data loading settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSettings {
    /// Date format in CSV files.
    #[serde(default)]
    pub date_format: Option<String>,
    /// CSV delimiter.
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

fn default_delimiter() -> char { ',' }

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            date_format: None,
            delimiter: ',',
        }
    }
}

/// One asset entry: name, target weight, and the path of its price CSV.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetEntry {
    pub name: String,
    pub weight: f64,
    pub path: String,
}

impl SimulationFileConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {}", path.display());

        let content = fs::read_to_string(path)?;
        let config: SimulationFileConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| SimulationError::ConfigError(e.to_string()))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Convert to a [`SimulationConfig`] for the simulator.
    pub fn to_simulation_config(&self) -> Result<SimulationConfig> {
        let config = SimulationConfig {
            initial_capital: self.simulation.initial_capital,
            monthly_contribution: self.simulation.monthly_contribution,
            leverage: self.simulation.leverage,
            contribution_day: self.simulation.contribution_day,
            show_progress: true,
        };
        config.validate()?;
        Ok(config)
    }

    /// Convert to a [`DataConfig`] for series loading.
    pub fn to_data_config(&self) -> DataConfig {
        DataConfig {
            date_format: self.data.date_format.clone(),
            delimiter: self.data.delimiter as u8,
            ..Default::default()
        }
    }

    /// Load every configured asset, resolving relative paths against
    /// `base_dir`.
    ///
    /// Proportional investing assumes the weights sum to 1; a deviating sum
    /// is reported but not rejected.
    pub fn load_assets(&self, base_dir: &Path) -> Result<Vec<Asset>> {
        if self.assets.is_empty() {
            return Err(SimulationError::ConfigError(
                "No assets configured".to_string(),
            ));
        }

        let weight_sum: f64 = self.assets.iter().map(|a| a.weight).sum();
        if (weight_sum - 1.0).abs() > 1e-6 {
            warn!("Asset weights sum to {}, not 1.0", weight_sum);
        }

        let data_config = self.to_data_config();
        self.assets
            .iter()
            .map(|entry| {
                let path = base_dir.join(&entry.path);
                load_asset(&entry.name, entry.weight, path, &data_config)
            })
            .collect()
    }

    /// Generate an example configuration file content.
    pub fn example() -> String {
        r#"# Drip simulation configuration file

[simulation]
initial_capital = 1000.0
monthly_contribution = 500.0
contribution_day = 15
# Drift-correction multiplier for the rebalancing strategy. The default
# forces a full correction toward target weight, subject to the budget cap.
leverage = 1000000.0

[data]
# date_format = "%Y-%m-%d"
delimiter = ","

# Assets are processed in this order; it matters when the rebalancing
# budget runs out mid-list.
[[assets]]
name = "msci_world"
weight = 0.2
path = "data/msci_world.csv"

[[assets]]
name = "euro_600"
weight = 0.2
path = "data/euro_600.csv"

[[assets]]
name = "gold"
weight = 0.2
path = "data/gold.csv"

[[assets]]
name = "health"
weight = 0.2
path = "data/health.csv"

[[assets]]
name = "real_estate"
weight = 0.2
path = "data/real_estate.csv"
"#
        .to_string()
    }
}
