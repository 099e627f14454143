//! Durable contract persistence boundary.
//!
//! One row per contract id. Nested structures (parties, terms) are stored as
//! embedded JSON documents inside the row rather than as separate entities.

pub mod in_memory;
pub mod sqlite;
pub mod r#trait;

pub use in_memory::InMemoryContractStore;
pub use r#trait::{ContractStore, StoreError};
pub use sqlite::SqliteContractStore;
