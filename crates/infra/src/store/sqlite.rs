//! SQLite-backed contract store.
//!
//! ## Schema
//!
//! | Column | Type | Notes |
//! |--------|------|-------|
//! | `id` | TEXT | primary key |
//! | `title` | TEXT | not null |
//! | `status` | TEXT | not null |
//! | `parties` | TEXT | JSON array of parties |
//! | `terms` | TEXT | JSON object |
//! | `created_at` | TEXT | UTC, millisecond precision, set on insert |
//!
//! ## Concurrency
//!
//! One connection, one writer. The handle is neither shared across threads
//! nor pooled; SQLite's own locking covers the single-writer case.

use std::path::{Path, PathBuf};

use rusqlite::{Connection, OptionalExtension, Row, params};
use tracing::{debug, instrument};

use pactledger_contracts::{Contract, Party, Terms};
use pactledger_core::{ContractId, ValueObject};

use super::r#trait::{ContractStore, StoreError};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS contracts (
    id         TEXT PRIMARY KEY,
    title      TEXT NOT NULL,
    status     TEXT NOT NULL,
    parties    TEXT NOT NULL,
    terms      TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now'))
);
"#;

const SELECT_COLUMNS: &str = "SELECT id, title, status, parties, terms FROM contracts";

/// Contract store persisted in a single SQLite file.
#[derive(Debug)]
pub struct SqliteContractStore {
    conn: Connection,
    path: PathBuf,
}

impl SqliteContractStore {
    /// Open (or create) the database at `path`, creating missing parent
    /// directories and the `contracts` table.
    #[instrument(skip(path), fields(path = %path.display()), err)]
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|source| StoreError::CreateDir {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        let conn = Connection::open(path).map_err(|source| StoreError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Self::init(conn, path.to_path_buf())
    }

    /// Open a private, non-durable database (tests, dry runs).
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(|source| StoreError::Open {
            path: PathBuf::from(":memory:"),
            source,
        })?;
        Self::init(conn, PathBuf::from(":memory:"))
    }

    fn init(conn: Connection, path: PathBuf) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA).map_err(StoreError::Schema)?;
        debug!(path = %path.display(), "contract store ready");
        Ok(Self { conn, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Close the connection, surfacing any error SQLite reports on close.
    ///
    /// Dropping the store also closes it; this only makes the error visible.
    pub fn close(self) -> Result<(), StoreError> {
        self.conn
            .close()
            .map_err(|(_, source)| StoreError::Database {
                operation: "close",
                source,
            })
    }
}

impl ContractStore for SqliteContractStore {
    #[instrument(skip(self, contract), fields(contract_id = %contract.id), err)]
    fn store(&self, contract: &Contract) -> Result<(), StoreError> {
        let parties = to_document(&contract.id, "parties", &contract.parties)?;
        let terms = to_document(&contract.id, "terms", &contract.terms)?;

        self.conn
            .execute(
                "INSERT OR REPLACE INTO contracts (id, title, status, parties, terms)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    contract.id.as_str(),
                    contract.title,
                    contract.status,
                    parties,
                    terms
                ],
            )
            .map_err(database("store"))?;
        Ok(())
    }

    #[instrument(skip(self, id), fields(contract_id = %id), err)]
    fn get(&self, id: &ContractId) -> Result<Contract, StoreError> {
        let row = self
            .conn
            .query_row(
                &format!("{SELECT_COLUMNS} WHERE id = ?1"),
                params![id.as_str()],
                ContractRow::from_row,
            )
            .optional()
            .map_err(database("get"))?;

        match row {
            Some(row) => row.into_contract(),
            None => Err(StoreError::NotFound(id.clone())),
        }
    }

    #[instrument(skip(self), err)]
    fn list_all(&self) -> Result<Vec<Contract>, StoreError> {
        let mut stmt = self
            .conn
            .prepare(&format!(
                "{SELECT_COLUMNS} ORDER BY created_at DESC, rowid DESC"
            ))
            .map_err(database("list_all"))?;

        let rows = stmt
            .query_map([], ContractRow::from_row)
            .map_err(database("list_all"))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(database("list_all"))?;

        debug!(count = rows.len(), "listed contracts");
        rows.into_iter().map(ContractRow::into_contract).collect()
    }

    #[instrument(skip(self, id), fields(contract_id = %id), err)]
    fn delete(&self, id: &ContractId) -> Result<(), StoreError> {
        let affected = self
            .conn
            .execute("DELETE FROM contracts WHERE id = ?1", params![id.as_str()])
            .map_err(database("delete"))?;

        if affected == 0 {
            return Err(StoreError::NotFound(id.clone()));
        }
        Ok(())
    }
}

/// Raw row with the embedded documents still serialized.
struct ContractRow {
    id: String,
    title: String,
    status: String,
    parties: String,
    terms: String,
}

impl ContractRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            status: row.get(2)?,
            parties: row.get(3)?,
            terms: row.get(4)?,
        })
    }

    fn into_contract(self) -> Result<Contract, StoreError> {
        let id = ContractId::new(self.id);
        let parties: Vec<Party> = from_document(&id, "parties", &self.parties)?;
        let terms: Terms = from_document(&id, "terms", &self.terms)?;
        Ok(Contract {
            id,
            title: self.title,
            status: self.status,
            parties,
            terms,
        })
    }
}

/// Embedded documents are value objects: they are only persisted inside a row.
fn to_document<T: ValueObject + serde::Serialize>(
    id: &ContractId,
    field: &'static str,
    value: &T,
) -> Result<String, StoreError> {
    serde_json::to_string(value).map_err(|source| StoreError::Serialize {
        id: id.clone(),
        field,
        source,
    })
}

fn from_document<T: ValueObject + serde::de::DeserializeOwned>(
    id: &ContractId,
    field: &'static str,
    raw: &str,
) -> Result<T, StoreError> {
    serde_json::from_str(raw).map_err(|source| StoreError::Deserialize {
        id: id.clone(),
        field,
        source,
    })
}

fn database(operation: &'static str) -> impl Fn(rusqlite::Error) -> StoreError {
    move |source| StoreError::Database { operation, source }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_contract(id: &str) -> Contract {
        Contract {
            id: ContractId::new(id),
            title: "Test Contract".to_string(),
            status: "active".to_string(),
            parties: vec![
                Party::new("Test Party 1", "Client").with_email("test1@example.com"),
                Party::new("Test Party 2", "Provider").with_email("test2@example.com"),
            ],
            terms: Terms {
                start_date: "2024-01-01".to_string(),
                end_date: "2024-12-31".to_string(),
                value: 1000.00,
                currency: "USD".to_string(),
            },
        }
    }

    fn ids(contracts: &[Contract]) -> Vec<&str> {
        contracts.iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn open_creates_missing_directories_and_file() {
        let tmp = tempfile::tempdir().unwrap();
        let db_path = tmp.path().join("nested").join("data").join("contracts.db");

        let store = SqliteContractStore::open(&db_path).unwrap();

        assert!(db_path.exists());
        assert_eq!(store.path(), db_path.as_path());
        store.close().unwrap();
    }

    #[test]
    fn open_fails_for_invalid_directory() {
        let err = SqliteContractStore::open(Path::new("invalid\0path/db.sqlite")).unwrap_err();
        assert!(matches!(err, StoreError::CreateDir { .. }), "got {err:?}");
    }

    #[test]
    fn open_fails_when_parent_is_a_file() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("not-a-dir");
        std::fs::write(&blocker, b"x").unwrap();

        let err = SqliteContractStore::open(&blocker.join("contracts.db")).unwrap_err();
        assert!(matches!(err, StoreError::CreateDir { .. }), "got {err:?}");
    }

    #[test]
    fn open_fails_when_path_is_a_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let err = SqliteContractStore::open(tmp.path()).unwrap_err();
        assert!(matches!(err, StoreError::Open { .. }), "got {err:?}");
    }

    #[test]
    fn store_then_get_round_trips_every_field() {
        let store = SqliteContractStore::open_in_memory().unwrap();
        let contract = test_contract("TEST-001");

        store.store(&contract).unwrap();
        let loaded = store.get(&contract.id).unwrap();

        assert_eq!(loaded, contract);
        assert_eq!(loaded.parties[1].name, "Test Party 2");
    }

    #[test]
    fn reopening_the_file_keeps_contracts() {
        let tmp = tempfile::tempdir().unwrap();
        let db_path = tmp.path().join("contracts.db");
        let contract = test_contract("TEST-001");

        {
            let store = SqliteContractStore::open(&db_path).unwrap();
            store.store(&contract).unwrap();
        }

        let store = SqliteContractStore::open(&db_path).unwrap();
        assert_eq!(store.get(&contract.id).unwrap(), contract);
    }

    #[test]
    fn storing_same_id_twice_overwrites() {
        let store = SqliteContractStore::open_in_memory().unwrap();
        let mut contract = test_contract("TEST-001");
        store.store(&contract).unwrap();

        contract.status = "terminated".to_string();
        contract.parties.truncate(1);
        store.store(&contract).unwrap();

        let all = store.list_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0], contract);
    }

    #[test]
    fn list_all_is_newest_first() {
        let store = SqliteContractStore::open_in_memory().unwrap();
        store.store(&test_contract("A")).unwrap();
        store.store(&test_contract("B")).unwrap();
        store.store(&test_contract("C")).unwrap();
        assert_eq!(ids(&store.list_all().unwrap()), ["C", "B", "A"]);

        // Re-storing replaces the row, so it becomes the newest.
        store.store(&test_contract("A")).unwrap();
        assert_eq!(ids(&store.list_all().unwrap()), ["A", "C", "B"]);
    }

    #[test]
    fn list_all_on_empty_store_is_empty() {
        let store = SqliteContractStore::open_in_memory().unwrap();
        assert!(store.list_all().unwrap().is_empty());
    }

    #[test]
    fn get_missing_is_not_found() {
        let store = SqliteContractStore::open_in_memory().unwrap();
        let err = store.get(&ContractId::new("NON-EXISTENT")).unwrap_err();
        assert!(matches!(&err, StoreError::NotFound(id) if id.as_str() == "NON-EXISTENT"));
    }

    #[test]
    fn delete_removes_row() {
        let store = SqliteContractStore::open_in_memory().unwrap();
        let contract = test_contract("TEST-001");
        store.store(&contract).unwrap();

        store.delete(&contract.id).unwrap();

        assert!(store.get(&contract.id).unwrap_err().is_not_found());
        assert!(store.list_all().unwrap().is_empty());
    }

    #[test]
    fn delete_missing_is_not_found() {
        let store = SqliteContractStore::open_in_memory().unwrap();
        let err = store.delete(&ContractId::new("NOPE")).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "contract not found: NOPE");
    }

    #[test]
    fn corrupt_embedded_document_is_a_deserialize_error() {
        let store = SqliteContractStore::open_in_memory().unwrap();
        store
            .conn
            .execute(
                "INSERT INTO contracts (id, title, status, parties, terms)
                 VALUES ('BAD', 'Broken', 'draft', 'not json', '{}')",
                [],
            )
            .unwrap();

        let err = store.get(&ContractId::new("BAD")).unwrap_err();
        assert!(
            matches!(err, StoreError::Deserialize { field: "parties", .. }),
            "got {err:?}"
        );

        let err = store.list_all().unwrap_err();
        assert!(matches!(err, StoreError::Deserialize { .. }), "got {err:?}");
    }

    #[test]
    fn embedded_documents_use_document_field_names() {
        let store = SqliteContractStore::open_in_memory().unwrap();
        store.store(&test_contract("TEST-001")).unwrap();

        let (parties, terms): (String, String) = store
            .conn
            .query_row(
                "SELECT parties, terms FROM contracts WHERE id = 'TEST-001'",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();

        let parties: serde_json::Value = serde_json::from_str(&parties).unwrap();
        let terms: serde_json::Value = serde_json::from_str(&terms).unwrap();
        assert_eq!(parties[0]["email"], "test1@example.com");
        assert_eq!(terms["startDate"], "2024-01-01");
        assert_eq!(terms["currency"], "USD");
    }

    #[test]
    fn created_at_is_filled_on_insert() {
        let store = SqliteContractStore::open_in_memory().unwrap();
        store.store(&test_contract("TEST-001")).unwrap();

        let created_at: String = store
            .conn
            .query_row("SELECT created_at FROM contracts", [], |row| row.get(0))
            .unwrap();
        // e.g. "2024-05-01 12:34:56.789"
        assert_eq!(created_at.len(), 23);
    }
}
