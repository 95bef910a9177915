// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand};

mod cli;

use cli::{ProcessArgs, RunArgs};

#[derive(Parser)]
#[command(name = "ir-monitor")]
#[command(about = "Infrared insect monitoring camera")]
#[command(version)]
#[command(subcommand_required = false)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the monitoring loop
    Run(RunArgs),

    /// Process a single image through the pipeline
    Process(ProcessArgs),

    /// List available display palettes
    Palettes,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    // Set RUST_LOG environment variable to control log level
    // Examples: RUST_LOG=debug, RUST_LOG=ir_monitor=debug, RUST_LOG=info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_level(true)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Run(args)) => cli::run_monitor(args)?,
        Some(Commands::Process(args)) => cli::process_image(args)?,
        Some(Commands::Palettes) => cli::list_palettes(),
        // Bare invocation starts monitoring with defaults, the way the
        // unit runs unattended in the field.
        None => cli::run_monitor(RunArgs::default())?,
    }

    Ok(())
}
