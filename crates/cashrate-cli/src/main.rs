mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::rate::{PvArgs, RateArgs};

/// Effective-rate calculations over dated cash flows
#[derive(Parser)]
#[command(
    name = "cashrate",
    version,
    about = "Effective-rate (APR/IRR/YTM) calculations for dated cash flows",
    long_about = "A CLI for deriving the single annualized rate that zeroes the net present \
                  value of an irregular schedule of investments and repayments, with decimal \
                  precision. Cash flows come from CSV or JSON files, piped stdin, or inline \
                  flags."
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
    /// Solve the effective rate that zeroes the cash flow's present value
    Rate(RateArgs),
    /// Value a cash flow at a given rate (present value and its derivative)
    Pv(PvArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Rate(args) => commands::rate::run_rate(args),
        Commands::Pv(args) => commands::rate::run_pv(args),
        Commands::Version => {
            println!("cashrate {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
