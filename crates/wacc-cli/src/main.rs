mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::cost::CostArgs;
use commands::structure::{AggregateArgs, SimpleArgs, TranchesArgs, WaccArgs};

/// Weighted average cost of capital calculations
#[derive(Parser)]
#[command(
    name = "wacc",
    version,
    about = "Weighted average cost of capital calculations",
    long_about = "Computes component costs of capital (CAPM, Gordon growth, preference shares, \
                  irredeemable and redeemable bonds, loans), blends debt tranches, and weights \
                  a full capital structure into a single WACC with decimal precision."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Cost a single capital source
    Cost(CostArgs),
    /// WACC for a full capital structure of instruments
    Wacc(WaccArgs),
    /// Weight already-costed sources into a WACC
    Aggregate(AggregateArgs),
    /// WACC for a two-source equity and debt structure
    Simple(SimpleArgs),
    /// Blend debt tranches into a single cost of debt
    Tranches(TranchesArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Cost(args) => commands::cost::run_cost(args),
        Commands::Wacc(args) => commands::structure::run_wacc(args),
        Commands::Aggregate(args) => commands::structure::run_aggregate(args),
        Commands::Simple(args) => commands::structure::run_simple(args),
        Commands::Tranches(args) => commands::structure::run_tranches(args),
        Commands::Version => {
            println!("wacc {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            log::debug!("command failed: {e:?}");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
