//! Document Store
//!
//! Key-value persistence for profiles, roadmaps, quizzes and assessment
//! history. Documents are whole JSON values keyed by (collection, id);
//! `put` always overwrites.

use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Invalid document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Store lock poisoned")]
    LockPoisoned,
}

pub type StoreResult<T> = Result<T, StoreError>;

pub trait DocumentStore: Send + Sync {
    fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Value>>;

    /// Full overwrite; no partial updates
    fn put(&self, collection: &str, id: &str, document: &Value) -> StoreResult<()>;

    /// Every document in a collection, in first-insertion order
    fn list(&self, collection: &str) -> StoreResult<Vec<Value>>;
}

/// Load and deserialize one document
pub fn load<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    collection: &str,
    id: &str,
) -> StoreResult<Option<T>> {
    match store.get(collection, id)? {
        Some(value) => Ok(Some(serde_json::from_value(value)?)),
        None => Ok(None),
    }
}

/// Serialize and overwrite one document
pub fn save<T: Serialize>(
    store: &dyn DocumentStore,
    collection: &str,
    id: &str,
    document: &T,
) -> StoreResult<()> {
    store.put(collection, id, &serde_json::to_value(document)?)
}

pub fn load_all<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    collection: &str,
) -> StoreResult<Vec<T>> {
    store
        .list(collection)?
        .into_iter()
        .map(|value| serde_json::from_value(value).map_err(StoreError::from))
        .collect()
}

// ============================================================
// SQLITE STORE
// ============================================================

pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let conn = Connection::open(path.as_ref())?;
        log::debug!("Opened document store at {}", path.as_ref().display());
        Self::init(conn)
    }

    /// Create an in-memory store for testing
    pub fn in_memory() -> StoreResult<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> StoreResult<Self> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS documents (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                collection TEXT NOT NULL,
                id TEXT NOT NULL,
                body TEXT NOT NULL,
                UNIQUE (collection, id)
            )",
            [],
        )?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn conn(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }
}

impl DocumentStore for SqliteStore {
    fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Value>> {
        let conn = self.conn()?;
        let body: Option<String> = conn
            .query_row(
                "SELECT body FROM documents WHERE collection = ?1 AND id = ?2",
                params![collection, id],
                |row| row.get(0),
            )
            .optional()?;

        match body {
            Some(body) => Ok(Some(serde_json::from_str(&body)?)),
            None => Ok(None),
        }
    }

    fn put(&self, collection: &str, id: &str, document: &Value) -> StoreResult<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO documents (collection, id, body) VALUES (?1, ?2, ?3)
             ON CONFLICT (collection, id) DO UPDATE SET body = excluded.body",
            params![collection, id, document.to_string()],
        )?;
        Ok(())
    }

    fn list(&self, collection: &str) -> StoreResult<Vec<Value>> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare("SELECT body FROM documents WHERE collection = ?1 ORDER BY seq ASC")?;
        let bodies = stmt.query_map([collection], |row| row.get::<_, String>(0))?;

        let mut documents = Vec::new();
        for body in bodies {
            documents.push(serde_json::from_str(&body?)?);
        }
        Ok(documents)
    }
}

// ============================================================
// IN-MEMORY STORE
// ============================================================

#[derive(Default)]
pub struct InMemoryStore {
    collections: Mutex<HashMap<String, Vec<(String, Value)>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentStore for InMemoryStore {
    fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Value>> {
        let collections = self.collections.lock().map_err(|_| StoreError::LockPoisoned)?;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|(doc_id, _)| doc_id == id))
            .map(|(_, value)| value.clone()))
    }

    fn put(&self, collection: &str, id: &str, document: &Value) -> StoreResult<()> {
        let mut collections = self.collections.lock().map_err(|_| StoreError::LockPoisoned)?;
        let docs = collections.entry(collection.to_string()).or_default();
        match docs.iter_mut().find(|(doc_id, _)| doc_id == id) {
            Some((_, existing)) => *existing = document.clone(),
            None => docs.push((id.to_string(), document.clone())),
        }
        Ok(())
    }

    fn list(&self, collection: &str) -> StoreResult<Vec<Value>> {
        let collections = self.collections.lock().map_err(|_| StoreError::LockPoisoned)?;
        Ok(collections
            .get(collection)
            .map(|docs| docs.iter().map(|(_, value)| value.clone()).collect())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn exercise(store: &dyn DocumentStore) {
        assert!(store.get("profiles", "u1").unwrap().is_none());

        store.put("profiles", "u1", &json!({"v": 1})).unwrap();
        store.put("profiles", "u2", &json!({"v": 2})).unwrap();
        store.put("other", "u1", &json!({"v": 9})).unwrap();
        assert_eq!(store.get("profiles", "u1").unwrap(), Some(json!({"v": 1})));

        // overwrite keeps the original position
        store.put("profiles", "u1", &json!({"v": 3})).unwrap();
        assert_eq!(store.get("profiles", "u1").unwrap(), Some(json!({"v": 3})));
        assert_eq!(
            store.list("profiles").unwrap(),
            vec![json!({"v": 3}), json!({"v": 2})]
        );
        assert!(store.list("missing").unwrap().is_empty());
    }

    #[test]
    fn test_sqlite_store() {
        exercise(&SqliteStore::in_memory().unwrap());
    }

    #[test]
    fn test_in_memory_store() {
        exercise(&InMemoryStore::new());
    }

    #[test]
    fn test_sqlite_store_persists_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("career.db");
        {
            let store = SqliteStore::open(&path).unwrap();
            save(&store, "notes", "a", &vec!["x".to_string()]).unwrap();
        }
        let store = SqliteStore::open(&path).unwrap();
        let notes: Option<Vec<String>> = load(&store, "notes", "a").unwrap();
        assert_eq!(notes, Some(vec!["x".to_string()]));
        let all: Vec<Vec<String>> = load_all(&store, "notes").unwrap();
        assert_eq!(all.len(), 1);
    }

    #[test]
    fn test_typed_load_rejects_wrong_shape() {
        let store = InMemoryStore::new();
        store.put("numbers", "n", &json!("not a number")).unwrap();
        let result: StoreResult<Option<u32>> = load(&store, "numbers", "n");
        assert!(matches!(result, Err(StoreError::Json(_))));
    }
}
