//! Per-project document collections, persisted as one ordered JSON list per
//! collection.

use crate::error::{Error, Result};
use crate::ident;
use crate::locks::LockTable;
use crate::storage::FileStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

const MAX_NAME_LEN: usize = 40;

/// Validate a caller-supplied collection name: 1-40 characters drawn from
/// `[A-Za-z0-9_-]`.
///
/// This is the only barrier between caller input and a filesystem path
/// segment, so rejection must short-circuit all downstream file access.
pub fn validate_name(name: &str) -> Result<&str> {
    let ok = !name.is_empty()
        && name.len() <= MAX_NAME_LEN
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if ok {
        Ok(name)
    } else {
        Err(Error::InvalidInput("invalid collection name".into()))
    }
}

/// Storage prefix holding all collections of one project.
pub fn project_prefix(project_id: &str) -> String {
    format!("db/{}", project_id)
}

fn collection_key(project_id: &str, collection: &str) -> String {
    format!("db/{}/{}", project_id, collection)
}

/// A stored document: caller-supplied data wrapped with identity and
/// timestamps.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub data: Value,
}

/// CRUD over the collections of one store.
///
/// Every operation loads the whole collection list, works on it in memory
/// and persists it back; mutations hold the collection's lock across that
/// cycle and reads take the same lock briefly (see [`LockTable`]). A
/// collection springs into existence on first insert and is never removed.
pub struct CollectionStore {
    store: FileStore,
    locks: Arc<LockTable>,
}

impl CollectionStore {
    pub fn new(store: FileStore, locks: Arc<LockTable>) -> Self {
        Self { store, locks }
    }

    fn load(&self, key: &str) -> Vec<Document> {
        self.store.read(key, Vec::new())
    }

    /// Names of the collections persisted under `project_id`, sorted.
    pub fn collection_names(&self, project_id: &str) -> Result<Vec<String>> {
        self.store.list(&project_prefix(project_id))
    }

    /// Wrap `data` in a new document and append it to the collection.
    pub fn create(&self, project_id: &str, collection: &str, data: Value) -> Result<Document> {
        let data = match data {
            Value::Null => Value::Object(serde_json::Map::new()),
            other => other,
        };
        let key = collection_key(project_id, collection);
        let lock = self.locks.get(&key);
        let _guard = lock.lock();
        let mut docs = self.load(&key);
        let now = Utc::now();
        let doc = Document {
            id: ident::generate("doc"),
            created_at: now,
            updated_at: now,
            data,
        };
        docs.push(doc.clone());
        self.store.write(&key, &docs)?;
        Ok(doc)
    }

    /// The full persisted list, oldest first.
    pub fn list(&self, project_id: &str, collection: &str) -> Vec<Document> {
        let key = collection_key(project_id, collection);
        let lock = self.locks.get(&key);
        let _guard = lock.lock();
        self.load(&key)
    }

    pub fn get(&self, project_id: &str, collection: &str, id: &str) -> Result<Document> {
        self.list(project_id, collection)
            .into_iter()
            .find(|d| d.id == id)
            .ok_or_else(|| Error::NotFound("document not found".into()))
    }

    /// Shallow-merge `partial` into the document's data: top-level keys of
    /// `partial` overwrite same-named keys, everything else is preserved,
    /// nested values are replaced wholesale.
    pub fn merge_update(
        &self,
        project_id: &str,
        collection: &str,
        id: &str,
        partial: Value,
    ) -> Result<Document> {
        let key = collection_key(project_id, collection);
        let lock = self.locks.get(&key);
        let _guard = lock.lock();
        let mut docs = self.load(&key);
        let doc = docs
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| Error::NotFound("document not found".into()))?;
        let mut data = match doc.data.take() {
            Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };
        if let Value::Object(extra) = partial {
            data.extend(extra);
        }
        doc.data = Value::Object(data);
        doc.updated_at = Utc::now();
        let updated = doc.clone();
        self.store.write(&key, &docs)?;
        Ok(updated)
    }

    /// Remove the document with `id`. `NotFound` when no document matched,
    /// leaving the stored list untouched.
    pub fn delete(&self, project_id: &str, collection: &str, id: &str) -> Result<()> {
        let key = collection_key(project_id, collection);
        let lock = self.locks.get(&key);
        let _guard = lock.lock();
        let mut docs = self.load(&key);
        let before = docs.len();
        docs.retain(|d| d.id != id);
        if docs.len() == before {
            return Err(Error::NotFound("document not found".into()));
        }
        self.store.write(&key, &docs)?;
        Ok(())
    }
}
