mod commands;
mod config;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::PathBuf;
use std::process;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use commands::format::FormatArgs;
use commands::loan::{EmiArgs, LoanArgs, ScheduleArgs};
use commands::quote::QuoteArgs;
use commands::showroom::ModelsArgs;
use config::CliConfig;

/// Showroom vehicle loan (EMI) calculator
#[derive(Parser)]
#[command(
    name = "autofin",
    version,
    about = "Showroom vehicle loan (EMI) calculator",
    long_about = "Computes equated monthly installments, totals and repayment \
                  schedules for vehicle loans with decimal precision, using the \
                  same defaults and slider ranges as the showroom calculator."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format (defaults to the config file, then json)
    #[arg(long, global = true)]
    output: Option<OutputFormat>,

    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Monthly installment for a known principal
    Emi(EmiArgs),
    /// Loan on a vehicle price after down payment
    Loan(LoanArgs),
    /// Month-by-month repayment schedule
    Schedule(ScheduleArgs),
    /// Calculator panel quote with slider ranges for a price or model
    Quote(QuoteArgs),
    /// List showroom models with their opening EMI
    Models(ModelsArgs),
    /// Format an amount in rupees
    Format(FormatArgs),
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

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn resolve_output(cli: Option<OutputFormat>, config: &CliConfig) -> OutputFormat {
    if let Some(format) = cli {
        return format;
    }
    match config.output.as_deref() {
        Some(name) => OutputFormat::from_str(name, true).unwrap_or_else(|_| {
            tracing::warn!("Unknown output format '{}' in config; using json", name);
            OutputFormat::Json
        }),
        None => OutputFormat::Json,
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match CliConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    };
    debug!(?config, "resolved configuration");
    let format = resolve_output(cli.output, &config);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Emi(args) => commands::loan::run_emi(args, &config),
        Commands::Loan(args) => commands::loan::run_loan(args, &config),
        Commands::Schedule(args) => commands::loan::run_schedule(args, &config),
        Commands::Quote(args) => commands::quote::run_quote(args, &config),
        Commands::Models(args) => commands::showroom::run_models(args),
        Commands::Format(args) => commands::format::run_format(args),
        Commands::Version => {
            println!("autofin {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&format, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
