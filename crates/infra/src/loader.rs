//! Contract document loading.
//!
//! Reads a JSON contract document, decodes it and validates it. Nothing is
//! written anywhere; the only side effect is the file read.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use pactledger_contracts::{Contract, ValidationError};

use crate::config::AppConfig;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("error reading contract file {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("contract file is empty")]
    EmptyInput,

    #[error("error parsing contract JSON: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("contract validation failed: {0}")]
    Validation(#[from] ValidationError),
}

/// Loads contracts, falling back to a default path when none is given.
#[derive(Debug, Clone)]
pub struct ContractLoader {
    default_path: PathBuf,
}

impl ContractLoader {
    pub fn new(default_path: impl Into<PathBuf>) -> Self {
        Self {
            default_path: default_path.into(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.contract_file.clone())
    }

    pub fn default_path(&self) -> &Path {
        &self.default_path
    }

    /// Load from `path`, or from the default path when `None`.
    pub fn load(&self, path: Option<&Path>) -> Result<Contract, LoadError> {
        load_contract(path.unwrap_or(self.default_path.as_path()))
    }
}

/// Read, decode and validate the contract document at `path`.
pub fn load_contract(path: &Path) -> Result<Contract, LoadError> {
    let bytes = std::fs::read(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = bytes.len(), "read contract document");
    parse_contract(&bytes)
}

/// Decode and validate an in-memory contract document.
///
/// Zero-length input is `EmptyInput`, never a parse error. Unknown fields are
/// ignored and absent or `null` fields default to empty values, so only
/// malformed JSON or mistyped fields fail decoding.
pub fn parse_contract(bytes: &[u8]) -> Result<Contract, LoadError> {
    if bytes.is_empty() {
        return Err(LoadError::EmptyInput);
    }
    let contract: Contract = serde_json::from_slice(bytes).map_err(LoadError::Parse)?;
    contract.validate()?;
    Ok(contract)
}
