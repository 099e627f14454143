//! Infrastructure layer: contract document loading, persistence, config.

pub mod config;
pub mod loader;
pub mod store;


pub use config::AppConfig;
pub use loader::{ContractLoader, LoadError, load_contract, parse_contract};
pub use store::{ContractStore, InMemoryContractStore, SqliteContractStore, StoreError};
