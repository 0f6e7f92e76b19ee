//! `extracto`: turn bank-statement text into categorized transaction CSV.
//!
//! ```bash
//! extracto process --rules reglas.json --dict diccionario/ -o movimientos.csv extractos/
//! extracto categorize "PAGO CON TARJETA EN RESTAURANTES" "BAR CENTRAL"
//! extracto normalize PAGOCONTARJETAENSUPERMERCADOS
//! ```

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod export;

#[derive(Parser, Debug)]
#[command(name = "extracto")]
#[command(version, about)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract, categorize and export every transaction in the inputs.
    Process {
        /// Keyword table (JSON, or TOML by extension).
        #[arg(long)]
        rules: Option<PathBuf>,

        /// Word list file or directory of `*.txt` word lists.
        #[arg(long = "dict")]
        dictionary: Option<PathBuf>,

        /// CSV output file. Defaults to stdout.
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Print a JSON summary per document to stderr.
        #[arg(long)]
        summary: bool,

        /// Text files, dumps, or directories of `*.txt` files.
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },
    /// Show how one operation would be categorized.
    Categorize {
        #[arg(long)]
        rules: Option<PathBuf>,

        operation: String,

        #[arg(default_value = "")]
        merchant: String,
    },
    /// Show lines after artifact repair.
    Normalize {
        #[arg(long = "dict")]
        dictionary: Option<PathBuf>,

        #[arg(required = true)]
        lines: Vec<String>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli.command) {
        tracing::error!("{e:#}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Process {
            rules,
            dictionary,
            out,
            summary,
            inputs,
        } => {
            commands::process(&commands::ProcessOptions {
                inputs,
                rules,
                dictionary,
                output: out,
                summary,
            })?;
        }
        Command::Categorize {
            rules,
            operation,
            merchant,
        } => commands::categorize(rules.as_deref(), &operation, &merchant, &mut io::stdout().lock())?,
        Command::Normalize { dictionary, lines } => {
            commands::normalize(dictionary.as_deref(), &lines, &mut io::stdout().lock())?
        }
    }
    Ok(())
}
