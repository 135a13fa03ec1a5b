//! Facade CLI - inspect and exercise custom element adapters.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "facade")]
#[command(about = "Inspect and exercise custom element adapters")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to facade.toml config file
    #[arg(short, long, default_value = "facade.toml")]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create facade.toml and a sample element definition
    Init {
        /// Overwrite existing files
        #[arg(short, long)]
        yes: bool,
    },

    /// Validate every manifest in the manifest directory
    Check,

    /// Show how each prop of an element is routed
    Inspect {
        /// Only show this element
        tag: Option<String>,
    },

    /// Replay a scripted sequence of renders against an in-memory element
    Simulate {
        /// Simulation script (TOML)
        script: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    // Execute command
    match cli.command {
        Commands::Init { yes } => {
            commands::init::run(&cli.config, yes)?;
        }
        Commands::Check => {
            commands::check::run(&cli.config)?;
        }
        Commands::Inspect { tag } => {
            commands::inspect::run(&cli.config, tag.as_deref())?;
        }
        Commands::Simulate { script } => {
            commands::simulate::run(&cli.config, &script)?;
        }
    }

    Ok(())
}
