//! Command execution.
//!
//! Each action runs against an explicit `AppConfig` and writes its user-facing
//! output to the given writer; the store is only opened for actions that
//! need it and is dropped before returning on every path.

use std::io::Write;

use anyhow::{Context, Result};
use tracing::info;

use pactledger_contracts::{Contract, render_listing, render_markdown};
use pactledger_core::ContractId;
use pactledger_infra::{AppConfig, ContractLoader, ContractStore, SqliteContractStore};

/// One unit of work selected from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Remove a stored contract.
    Delete(ContractId),
    /// Print a stored contract as Markdown.
    Get(ContractId),
    /// Print a table of stored contracts.
    List,
    /// Load the contract file and upsert it.
    Store,
    /// Load the contract file and write its Markdown to the output file.
    WriteMarkdown,
    /// Load the contract file and print its Markdown.
    ShowMarkdown,
}

impl Action {
    pub fn needs_store(&self) -> bool {
        matches!(
            self,
            Action::Delete(_) | Action::Get(_) | Action::List | Action::Store
        )
    }
}

/// Run `action`, opening the SQLite store at `config.db_path` when required.
pub fn execute(action: &Action, config: &AppConfig, out: &mut impl Write) -> Result<()> {
    if action.needs_store() {
        let store = SqliteContractStore::open(&config.db_path).with_context(|| {
            format!("Error initializing database at {}", config.db_path.display())
        })?;
        return execute_with_store(action, config, &store, out);
    }
    execute_file_action(action, config, out)
}

/// Run `action` against an already opened store.
pub fn execute_with_store<S: ContractStore>(
    action: &Action,
    config: &AppConfig,
    store: &S,
    out: &mut impl Write,
) -> Result<()> {
    match action {
        Action::Delete(id) => {
            store.delete(id).context("Error deleting contract")?;
            info!(contract_id = %id, "contract deleted");
            writeln!(out, "Contract {id} deleted successfully from database")?;
        }
        Action::Get(id) => {
            let contract = store.get(id).context("Error retrieving contract")?;
            write!(out, "{}", render_markdown(&contract))?;
        }
        Action::List => {
            let contracts = store.list_all().context("Error listing contracts")?;
            write!(out, "{}", render_listing(&contracts))?;
        }
        Action::Store => {
            let contract = load(config)?;
            store.store(&contract).context("Error storing contract")?;
            info!(contract_id = %contract.id, "contract stored");
            writeln!(out, "Contract {} stored successfully in database", contract.id)?;
        }
        Action::WriteMarkdown | Action::ShowMarkdown => execute_file_action(action, config, out)?,
    }
    Ok(())
}

fn execute_file_action(action: &Action, config: &AppConfig, out: &mut impl Write) -> Result<()> {
    let contract = load(config)?;
    let markdown = render_markdown(&contract);

    if *action == Action::WriteMarkdown {
        let target = &config.markdown_output;
        std::fs::write(target, &markdown)
            .with_context(|| format!("Error writing to {}", target.display()))?;
        writeln!(
            out,
            "Contract information has been written to {}",
            target.display()
        )?;
    } else {
        writeln!(out, "{markdown}")?;
    }
    Ok(())
}

fn load(config: &AppConfig) -> Result<Contract> {
    ContractLoader::from_config(config).load(None).with_context(|| {
        format!(
            "Error loading contract from {}; ensure the contract file exists and is valid JSON",
            config.contract_file.display()
        )
    })
}
