//! Photodet command-line interface.
//!
//! Build and inspect the detector description:
//! ```sh
//! photodet build
//! photodet build --config stand.toml --json out/geometry.json
//! photodet validate stand.toml
//! photodet materials
//! ```

mod config;
mod runner;

use clap::{Parser, Subcommand};
use photodet_core::DetectorConfig;
use photodet_materials::{MaterialDatabase, NistDatabase};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "photodet")]
#[command(about = "Photodet: PMT test-stand geometry and materials")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the detector and print its materials and placement tree.
    Build {
        /// Optional TOML description overriding the built-in constants.
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Also write the geometry as JSON to this file.
        #[arg(short, long)]
        json: Option<PathBuf>,
    },
    /// Build a description without printing, reporting only success or the error.
    Validate {
        /// Path to the TOML description.
        config: PathBuf,
    },
    /// List the materials available in the reference database.
    Materials,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { config, json } => {
            let detector_config = match &config {
                Some(path) => config::load_config(path)?,
                None => DetectorConfig::default(),
            };
            let output = runner::build_detector(detector_config)?;
            runner::print_report(&output)?;
            if let Some(path) = json {
                runner::write_json(&output, &path)?;
            }
            Ok(())
        }
        Commands::Validate { config } => {
            let detector_config = config::load_config(&config)?;
            let output = runner::build_detector(detector_config)?;
            println!(
                "Configuration is valid: {} ({} placements)",
                config.display(),
                output.detector.geometry().len()
            );
            Ok(())
        }
        Commands::Materials => {
            let db = NistDatabase::new();
            println!("Available {} materials:", db.name());
            println!();
            for name in db.material_names() {
                let m = db.find_material(name)?;
                println!("  {:<16} {:>12.6e} g/cm3", name, m.density());
            }
            Ok(())
        }
    }
}
