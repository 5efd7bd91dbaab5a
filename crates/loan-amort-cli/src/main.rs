mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::compare::CompareArgs;
use commands::min_payment::MinPaymentArgs;
use commands::schedule::ScheduleArgs;

/// Loan amortization schedules with decimal precision
#[derive(Parser)]
#[command(
    name = "amort",
    version,
    about = "Loan amortization schedules with decimal precision",
    long_about = "A CLI for computing loan amortization schedules with decimal precision. \
                  Supports fixed-term and fixed-payment planning, recurring and one-off \
                  prepayments, and base-vs-scenario comparison."
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
    /// Generate a full amortization schedule
    Schedule(ScheduleArgs),
    /// Compare the contractual plan against a prepayment scenario
    Compare(CompareArgs),
    /// Show the minimum feasible payment for fixed-payment mode
    MinPayment(MinPaymentArgs),
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
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Schedule(args) => commands::schedule::run_schedule(args),
        Commands::Compare(args) => commands::compare::run_compare(args),
        Commands::MinPayment(args) => commands::min_payment::run_min_payment(args),
        Commands::Version => {
            println!("amort {}", env!("CARGO_PKG_VERSION"));
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
