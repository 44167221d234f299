//! CLI entry point for contract-lint.

mod cmd;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "contract-lint")]
#[command(version)]
#[command(about = "Lint engine for processing-module contract documents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a single contract file
    Check {
        /// Path to the contract JSON file
        contract: PathBuf,
        /// Path to the contract JSON Schema
        #[arg(long)]
        schema: PathBuf,
        /// Path to the glossary JSON (optional)
        #[arg(long)]
        glossary: Option<PathBuf>,
        /// Print the report as JSON instead of human-readable output
        #[arg(long)]
        json: bool,
        /// Fail with a formatted error list on any error finding (for CI)
        #[arg(long)]
        strict: bool,
    },
    /// Validate every contract under a directory and write reports
    Batch {
        /// Root directory containing contracts
        root: PathBuf,
        /// Path to the contract JSON Schema
        #[arg(long)]
        schema: PathBuf,
        /// Path to the glossary JSON (optional)
        #[arg(long)]
        glossary: Option<PathBuf>,
        /// Output directory for per-file reports and the summary
        #[arg(long, default_value = "_reports")]
        out: PathBuf,
        /// Fail on any error, listing every error finding (for CI)
        #[arg(long)]
        strict: bool,
        /// Show the first errors of each failing contract
        #[arg(short, long)]
        verbose: bool,
    },
}

fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Check {
            contract,
            schema,
            glossary,
            json,
            strict,
        } => cmd::cmd_check(&contract, &schema, glossary.as_deref(), json, strict),
        Commands::Batch {
            root,
            schema,
            glossary,
            out,
            strict,
            verbose,
        } => cmd::cmd_batch(&root, &schema, glossary.as_deref(), &out, strict, verbose),
    }
}

fn main() {
    let cli = Cli::parse();
    let code = match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {e:#}", "[FATAL]".red());
            2
        }
    };
    std::process::exit(code);
}
