//! Terrain generation - Development Tools

use std::path::Path;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use terrain_core::config::GenerationParams;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "terrain-tools")]
#[command(about = "Development tools for terrain generation configs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate generation config files
    Validate {
        /// Path to config directory
        #[arg(default_value = "assets/config")]
        path: String,
    },

    /// Print the default generation params as RON
    DefaultConfig {
        /// Print the compact preset instead
        #[arg(long)]
        compact: bool,
    },
}

fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { path } => {
            tracing::info!("Validating config files in: {path}");
            match terrain_tools::validate::validate_config_directory(Path::new(&path)) {
                Ok(report) => {
                    tracing::info!(
                        files = report.files.len(),
                        warnings = report.warning_count(),
                        "Validation passed"
                    );
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    tracing::error!("Validation failed: {e}");
                    ExitCode::FAILURE
                }
            }
        }
        Commands::DefaultConfig { compact } => {
            let params = if compact {
                GenerationParams::compact()
            } else {
                GenerationParams::standard()
            };
            match params.to_ron_string() {
                Ok(ron) => {
                    println!("{ron}");
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    tracing::error!("Failed to serialize params: {e}");
                    ExitCode::FAILURE
                }
            }
        }
    }
}
