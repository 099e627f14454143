use std::sync::RwLock;

use pactledger_contracts::Contract;
use pactledger_core::{ContractId, Entity};

use super::r#trait::{ContractStore, StoreError};

/// In-memory contract store.
///
/// Intended for tests/dev. Same upsert / ordering / not-found semantics as
/// the SQLite store; nothing survives the process.
#[derive(Debug, Default)]
pub struct InMemoryContractStore {
    /// Insertion order, oldest first.
    rows: RwLock<Vec<Contract>>,
}

impl InMemoryContractStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.rows.read().map_err(poisoned)?.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

fn poisoned<T>(_: T) -> StoreError {
    StoreError::Unavailable("lock poisoned".to_string())
}

impl ContractStore for InMemoryContractStore {
    fn store(&self, contract: &Contract) -> Result<(), StoreError> {
        let mut rows = self.rows.write().map_err(poisoned)?;
        // Replace the whole row: the upserted contract becomes the newest.
        rows.retain(|row| !row.same_entity(contract));
        rows.push(contract.clone());
        Ok(())
    }

    fn get(&self, id: &ContractId) -> Result<Contract, StoreError> {
        let rows = self.rows.read().map_err(poisoned)?;
        rows.iter()
            .find(|row| &row.id == id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    fn list_all(&self) -> Result<Vec<Contract>, StoreError> {
        let rows = self.rows.read().map_err(poisoned)?;
        Ok(rows.iter().rev().cloned().collect())
    }

    fn delete(&self, id: &ContractId) -> Result<(), StoreError> {
        let mut rows = self.rows.write().map_err(poisoned)?;
        let before = rows.len();
        rows.retain(|row| &row.id != id);
        if rows.len() == before {
            return Err(StoreError::NotFound(id.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pactledger_contracts::Party;
    use std::sync::Arc;

    fn contract(id: &str, status: &str) -> Contract {
        Contract {
            id: ContractId::new(id),
            title: format!("Contract {id}"),
            status: status.to_string(),
            parties: vec![Party::new("A", "Client")],
            ..Contract::default()
        }
    }

    #[test]
    fn upsert_replaces_and_moves_to_front() {
        let store = InMemoryContractStore::new();
        store.store(&contract("A", "draft")).unwrap();
        store.store(&contract("B", "draft")).unwrap();
        store.store(&contract("A", "active")).unwrap();

        let all = store.list_all().unwrap();
        assert_eq!(store.len().unwrap(), 2);
        assert_eq!(all[0], contract("A", "active"));
        assert_eq!(all[1].id.as_str(), "B");
    }

    #[test]
    fn get_and_delete_report_not_found() {
        let store = InMemoryContractStore::new();
        let missing = ContractId::new("NOPE");

        assert!(store.get(&missing).unwrap_err().is_not_found());
        assert!(store.delete(&missing).unwrap_err().is_not_found());
    }

    #[test]
    fn poisoned_lock_is_unavailable_everywhere() {
        let store = Arc::new(InMemoryContractStore::new());
        store.store(&contract("A", "draft")).unwrap();

        let writer = Arc::clone(&store);
        let result = std::thread::spawn(move || {
            let _guard = writer.rows.write().unwrap();
            panic!("writer died while holding the lock");
        })
        .join();
        assert!(result.is_err());

        assert!(matches!(store.len(), Err(StoreError::Unavailable(_))));
        assert!(matches!(store.is_empty(), Err(StoreError::Unavailable(_))));
        assert!(matches!(store.list_all(), Err(StoreError::Unavailable(_))));
        assert!(matches!(
            store.store(&contract("B", "draft")),
            Err(StoreError::Unavailable(_))
        ));
    }

    #[test]
    fn delete_removes_only_the_given_id() {
        let store = InMemoryContractStore::new();
        store.store(&contract("A", "draft")).unwrap();
        store.store(&contract("B", "draft")).unwrap();

        store.delete(&ContractId::new("A")).unwrap();

        assert_eq!(store.list_all().unwrap(), vec![contract("B", "draft")]);
        assert!(!store.is_empty().unwrap());
    }
}
