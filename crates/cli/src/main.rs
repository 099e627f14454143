//! `pactledger` command-line interface.
//!
//! ## Usage
//!
//! ```bash
//! # Print the contract in config/contract.json as Markdown
//! pactledger --contract
//!
//! # Write it to output.md instead
//! pactledger --output-md --contract-file path/to/contract.json
//!
//! # Validate and store it, then list and remove stored contracts
//! pactledger --store --db data/contracts.db
//! pactledger --list
//! pactledger --get TEST-001
//! pactledger --delete TEST-001
//! ```
//!
//! ## Exit Codes
//!
//! - 0: success (or no action requested)
//! - 1: any failure

mod commands;

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{CommandFactory, Parser};

use pactledger_core::ContractId;
use pactledger_infra::AppConfig;
use pactledger_infra::config::{DEFAULT_CONTRACT_FILE, DEFAULT_DB_PATH, DEFAULT_MARKDOWN_OUTPUT};
use pactledger_observability::{LogConfig, LogFormat};

use crate::commands::Action;

/// Load, validate, render and store contract records
#[derive(Debug, Parser)]
#[command(name = "pactledger")]
#[command(version)]
#[command(about = "Load, validate, render and store contract records", long_about = None)]
struct Cli {
    /// Show contract information (Markdown on stdout)
    #[arg(long)]
    contract: bool,

    /// Write contract information to the Markdown output file
    #[arg(long = "output-md")]
    output_md: bool,

    /// Path to the contract JSON file
    #[arg(long, env = "PACTLEDGER_CONTRACT_FILE", default_value = DEFAULT_CONTRACT_FILE)]
    contract_file: PathBuf,

    /// Store the contract in the database
    #[arg(long)]
    store: bool,

    /// List all contracts in the database
    #[arg(long)]
    list: bool,

    /// Show the stored contract with this ID
    #[arg(long, value_name = "ID")]
    get: Option<ContractId>,

    /// Delete the contract with this ID from the database
    #[arg(long, value_name = "ID")]
    delete: Option<ContractId>,

    /// Path to the SQLite database file
    #[arg(long, env = "PACTLEDGER_DB", default_value = DEFAULT_DB_PATH)]
    db: PathBuf,

    /// Markdown output file used by --output-md
    #[arg(long, env = "PACTLEDGER_OUTPUT", default_value = DEFAULT_MARKDOWN_OUTPUT)]
    output: PathBuf,

    /// Log format (json or compact); logs go to stderr
    #[arg(long, env = "PACTLEDGER_LOG_FORMAT", default_value_t = LogFormat::Compact)]
    log_format: LogFormat,
}

impl Cli {
    fn config(&self) -> AppConfig {
        AppConfig::default()
            .with_contract_file(&self.contract_file)
            .with_db_path(&self.db)
            .with_markdown_output(&self.output)
    }

    /// The single action to run; when several flags are given the first of
    /// delete, get, list, store, output-md, contract wins.
    fn action(&self) -> Option<Action> {
        if let Some(id) = &self.delete {
            return Some(Action::Delete(id.clone()));
        }
        if let Some(id) = &self.get {
            return Some(Action::Get(id.clone()));
        }
        if self.list {
            return Some(Action::List);
        }
        if self.store {
            return Some(Action::Store);
        }
        if self.output_md {
            return Some(Action::WriteMarkdown);
        }
        if self.contract {
            return Some(Action::ShowMarkdown);
        }
        None
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    pactledger_observability::init(&LogConfig {
        format: cli.log_format,
        ..LogConfig::default()
    });

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let Some(action) = cli.action() else {
        println!("No action flags provided. Available options:");
        Cli::command().print_help()?;
        return Ok(());
    };

    let config = cli.config();
    tracing::debug!(?action, ?config, "running action");
    commands::execute(&action, &config, &mut io::stdout().lock())
}
