//! xtc CLI - offline renderer for the crosstalk effect.

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "xtc")]
#[command(author, version, about = "Stereo crosstalk effect renderer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a WAV file through the crosstalk effect
    Process(commands::process::ProcessArgs),

    /// Generate test signals
    Generate(commands::generate::GenerateArgs),

    /// List the effect parameters
    Params(commands::params::ParamsArgs),

    /// Display WAV file metadata
    Info(commands::info::InfoArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Process(args) => commands::process::run(args),
        Commands::Generate(args) => commands::generate::run(args),
        Commands::Params(args) => commands::params::run(args),
        Commands::Info(args) => commands::info::run(args),
    }
}
