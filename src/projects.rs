//! Project registry: the durable list of all projects across owners.

use crate::collections;
use crate::error::Result;
use crate::ident;
use crate::locks::LockTable;
use crate::storage::FileStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Storage key of the project list.
pub const PROJECTS_KEY: &str = "projects";

const MAX_NAME_LEN: usize = 50;
const DEFAULT_NAME: &str = "My Project";

/// An isolated document namespace owned by one user. Never mutated or
/// deleted once created.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    /// Permanent bearer secret scoping document operations to this project.
    pub api_key: String,
    pub created_at: DateTime<Utc>,
}

/// Whole-file registry of projects.
pub struct ProjectRegistry {
    store: FileStore,
    locks: Arc<LockTable>,
}

impl ProjectRegistry {
    pub fn new(store: FileStore, locks: Arc<LockTable>) -> Self {
        Self { store, locks }
    }

    fn load(&self) -> Vec<Project> {
        self.store.read(PROJECTS_KEY, Vec::new())
    }

    /// All projects, oldest first. Takes the registry lock briefly so a
    /// concurrent writer is never observed mid-cycle.
    pub fn list(&self) -> Vec<Project> {
        let lock = self.locks.get(PROJECTS_KEY);
        let _guard = lock.lock();
        self.load()
    }

    /// Create a project owned by `owner_id`, issue its API key and
    /// provision its storage area. Names are truncated to 50 characters;
    /// an absent or empty name falls back to "My Project".
    pub fn create(&self, owner_id: &str, name: Option<&str>) -> Result<Project> {
        let name = match name {
            Some(n) if !n.is_empty() => n.chars().take(MAX_NAME_LEN).collect(),
            _ => DEFAULT_NAME.to_string(),
        };
        let lock = self.locks.get(PROJECTS_KEY);
        let _guard = lock.lock();
        let mut projects = self.load();
        let project = Project {
            id: ident::generate("proj"),
            owner_id: owner_id.to_string(),
            name,
            api_key: ident::generate("ABDB_KEY"),
            created_at: Utc::now(),
        };
        projects.push(project.clone());
        self.store.write(PROJECTS_KEY, &projects)?;
        self.store
            .ensure_prefix(&collections::project_prefix(&project.id))?;
        info!(project = %project.id, owner = %project.owner_id, "project created");
        Ok(project)
    }

    /// Exact API-key lookup.
    pub fn find_by_api_key(&self, key: &str) -> Option<Project> {
        self.list().into_iter().find(|p| p.api_key == key)
    }

    /// Projects owned by `owner_id`, oldest first.
    pub fn owned_by(&self, owner_id: &str) -> Vec<Project> {
        self.list()
            .into_iter()
            .filter(|p| p.owner_id == owner_id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::FsBackend;
    use tempfile::TempDir;

    fn registry(dir: &TempDir) -> ProjectRegistry {
        let backend = Arc::new(FsBackend::new(dir.path()).unwrap());
        ProjectRegistry::new(FileStore::new(backend), Arc::new(LockTable::new()))
    }

    #[test]
    fn create_defaults_and_truncates_name() {
        let dir = TempDir::new().unwrap();
        let registry = registry(&dir);
        let unnamed = registry.create("user_1", None).unwrap();
        assert_eq!(unnamed.name, "My Project");
        let blank = registry.create("user_1", Some("")).unwrap();
        assert_eq!(blank.name, "My Project");
        let long = "x".repeat(80);
        let truncated = registry.create("user_1", Some(&long)).unwrap();
        assert_eq!(truncated.name.chars().count(), 50);
    }

    #[test]
    fn create_provisions_storage_area() {
        let dir = TempDir::new().unwrap();
        let registry = registry(&dir);
        let project = registry.create("user_1", Some("Demo")).unwrap();
        assert!(dir.path().join("db").join(&project.id).is_dir());
    }

    #[test]
    fn api_key_lookup_and_owner_filter() {
        let dir = TempDir::new().unwrap();
        let registry = registry(&dir);
        let mine = registry.create("user_1", Some("Mine")).unwrap();
        let theirs = registry.create("user_2", Some("Theirs")).unwrap();
        assert_eq!(registry.find_by_api_key(&mine.api_key).unwrap(), mine);
        assert!(registry.find_by_api_key("ABDB_KEY_bogus").is_none());
        assert_eq!(registry.owned_by("user_1"), vec![mine]);
        assert_eq!(registry.owned_by("user_2"), vec![theirs]);
    }
}
