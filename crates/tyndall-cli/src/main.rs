//! Tyndall command-line interface.
//!
//! Run parameter sweeps from TOML job files:
//! ```sh
//! tyndall run job.toml
//! tyndall validate job.toml
//! tyndall measures
//! ```

mod config;
mod runner;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tyndall")]
#[command(about = "Tyndall: Lorenz-Mie scattering sweep engine")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a sweep from a TOML job file.
    Run {
        /// Path to the job file.
        config: PathBuf,
        /// Output file (overrides the job's output path).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a job file without running the sweep.
    Validate {
        /// Path to the job file.
        config: PathBuf,
    },
    /// List the available measures and the geometries they apply to.
    Measures,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config, output } => {
            println!("Tyndall Scattering Sweeps");
            println!("=========================");
            let job = config::load_config(&config)?;
            println!("Configuration: {}", config.display());

            let outcome = runner::run_sweep(&job)?;

            let out_path = output.unwrap_or_else(|| PathBuf::from(&job.output.path));
            match job.output.format {
                config::OutputFormat::Csv => runner::write_csv(&outcome, &out_path)?,
                config::OutputFormat::Json => runner::write_json(&outcome, &out_path)?,
            }

            println!("Sweep complete.");
            Ok(())
        }
        Commands::Validate { config } => {
            let job = config::load_config(&config)?;
            runner::validate_job(&job)?;
            println!("Configuration is valid: {}", config.display());
            Ok(())
        }
        Commands::Measures => {
            runner::print_measures();
            Ok(())
        }
    }
}
