//! # Stratum CLI Application
//!
//! Terminal front-end for the geostatic stress engine.
//!
//! ```text
//! soil_cli calc --input profile.json
//! soil_cli example capillary-fringe --json
//! soil_cli project --file job.stm add BH-1 --input profile.json
//! ```

mod commands;
mod render;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Geostatic stress profiles for stratified soil
#[derive(Parser)]
#[command(name = "soil_cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Geostatic stress profiles for stratified soil", long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute a profile from a JSON request
    Calc(commands::calc::CalcArgs),
    /// List or run the built-in example profiles
    Example(commands::example::ExampleArgs),
    /// Manage saved profiles in a project file
    Project(commands::project::ProjectArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    // Logs go to stderr so `--json` output stays clean on stdout
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Calc(args) => commands::calc::execute(args),
        Commands::Example(args) => commands::example::execute(args),
        Commands::Project(args) => commands::project::execute(args),
    }
}
