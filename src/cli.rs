//! Command-line interface for the simulator.

use drip::config::SimulationFileConfig;
use drip::data::{interpolate_daily, load_series, DataConfig};
use drip::engine::Simulator;
use drip::error::Result;
use drip::export::{comparison_to_json, export_comparison_json, export_ledger_csv};
use drip::report::{print_allocation_events, print_report, Comparison};

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Drip - simulate monthly-contribution investing over historical prices.
#[derive(Parser)]
#[command(name = "drip")]
#[command(version)]
#[command(about = "Compares proportional top-up and drift-correcting rebalancing contributions")]
#[command(long_about = None)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run both strategies and compare them
    Run {
        /// Path to TOML configuration file
        #[arg(short, long)]
        config: PathBuf,

        /// Print the per-asset allocation of every contribution day
        #[arg(long)]
        allocations: bool,

        /// Directory to write per-strategy ledger CSVs and the comparison JSON
        #[arg(short, long)]
        export_dir: Option<PathBuf>,

        /// Disable the progress bar
        #[arg(long)]
        no_progress: bool,
    },

    /// Generate an example configuration file
    Init {
        /// Output path for config file
        #[arg(short, long, default_value = "drip.toml")]
        output: PathBuf,
    },

    /// Validate a price CSV file
    Validate {
        /// Path to CSV data file
        #[arg(short, long)]
        data: PathBuf,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl Cli {
    /// Initialize logging based on verbosity level.
    pub fn init_logging(&self) {
        let level = match self.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        };

        let subscriber = FmtSubscriber::builder()
            .with_max_level(level)
            .with_target(false)
            .finish();

        tracing::subscriber::set_global_default(subscriber)
            .expect("Failed to set tracing subscriber");
    }
}

/// Run the CLI application.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    cli.init_logging();

    match &cli.command {
        Commands::Run {
            config,
            allocations,
            export_dir,
            no_progress,
        } => run_comparison(
            config,
            *allocations,
            export_dir.as_deref(),
            *no_progress,
            cli.output,
        ),

        Commands::Init { output } => init_config(output),

        Commands::Validate { data } => validate_data(data),
    }
}

fn run_comparison(
    config_path: &Path,
    allocations: bool,
    export_dir: Option<&Path>,
    no_progress: bool,
    output: OutputFormat,
) -> Result<()> {
    let file_config = SimulationFileConfig::load(config_path)?;
    let base_dir = config_path.parent().unwrap_or_else(|| Path::new("."));
    let assets = file_config.load_assets(base_dir)?;

    let mut config = file_config.to_simulation_config()?;
    if no_progress || output == OutputFormat::Json {
        config.show_progress = false;
    }

    let simulator = Simulator::new(config, assets)?;
    let (baseline, rebalanced) = simulator.run_pair()?;
    let comparison = Comparison::new(&baseline, &rebalanced);

    match output {
        OutputFormat::Text => {
            print_report(&baseline, &rebalanced, &comparison);
            if allocations {
                print_allocation_events(&rebalanced.events);
            }
        }
        OutputFormat::Json => println!("{}", comparison_to_json(&comparison)),
    }

    if let Some(dir) = export_dir {
        fs::create_dir_all(dir)?;
        export_ledger_csv(
            &baseline.ledger,
            dir.join(format!("{}.csv", baseline.strategy_name)),
        )?;
        export_ledger_csv(
            &rebalanced.ledger,
            dir.join(format!("{}.csv", rebalanced.strategy_name)),
        )?;
        export_comparison_json(&comparison, dir.join("comparison.json"))?;
    }

    Ok(())
}

fn init_config(output: &Path) -> Result<()> {
    fs::write(output, SimulationFileConfig::example())?;
    println!("Wrote example configuration to {}", output.display());
    println!("Edit the asset list, then run: drip run --config {}", output.display());
    Ok(())
}

fn validate_data(path: &Path) -> Result<()> {
    let raw = load_series(path, &DataConfig::default())?;
    let daily = interpolate_daily(&raw);

    info!("Validation complete for {}", path.display());
    println!("File:               {}", path.display());
    println!("Prices:             {}", raw.len());
    println!(
        "Range:              {} to {}",
        raw[0].date,
        raw[raw.len() - 1].date
    );
    println!("Calendar days:      {}", daily.len());
    println!("Days to interpolate: {}", daily.len() - raw.len());

    Ok(())
}
