use std::path::PathBuf;

use thiserror::Error;

use pactledger_contracts::Contract;
use pactledger_core::ContractId;

/// Contract store error.
///
/// `NotFound` is kept apart from engine failures so callers can treat a
/// missing id as a user error rather than an infrastructure failure.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("error creating database directory {path:?}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("error opening database {path:?}: {source}")]
    Open {
        path: PathBuf,
        source: rusqlite::Error,
    },

    #[error("error creating contracts table: {0}")]
    Schema(#[source] rusqlite::Error),

    #[error("error serializing {field} of contract {id}: {source}")]
    Serialize {
        id: ContractId,
        field: &'static str,
        source: serde_json::Error,
    },

    #[error("error deserializing {field} of contract {id}: {source}")]
    Deserialize {
        id: ContractId,
        field: &'static str,
        source: serde_json::Error,
    },

    #[error("contract not found: {0}")]
    NotFound(ContractId),

    #[error("database error in {operation}: {source}")]
    Database {
        operation: &'static str,
        source: rusqlite::Error,
    },

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

/// Keyed contract persistence.
///
/// Every call is synchronous and fails fast (no retries). Each call is atomic
/// only with respect to the single row it touches.
pub trait ContractStore {
    /// Upsert: insert, or replace the whole row when the id already exists.
    fn store(&self, contract: &Contract) -> Result<(), StoreError>;

    /// Fetch one contract; `NotFound` when no row has this id.
    fn get(&self, id: &ContractId) -> Result<Contract, StoreError>;

    /// Every stored contract, most recently stored first.
    fn list_all(&self) -> Result<Vec<Contract>, StoreError>;

    /// Remove one contract; `NotFound` when no row was removed.
    fn delete(&self, id: &ContractId) -> Result<(), StoreError>;
}
