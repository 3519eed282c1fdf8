//! The operation surface invoked by an external transport layer.
//!
//! Every document operation resolves a project identity from the raw
//! `Authorization` value, validates the collection name, then delegates to
//! the collection store; project-management operations resolve a user
//! identity instead.

use crate::auth;
use crate::collections::{self, CollectionStore, Document};
use crate::config::StoreConfig;
use crate::error::{Error, Result};
use crate::locks::LockTable;
use crate::projects::{Project, ProjectRegistry};
use crate::storage::{FileStore, FsBackend, StorageBackend};
use crate::users::UserRegistry;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;

const SERVICE_NAME: &str = "abdb (file-backed document store)";

/// Credentials returned by sign-up and log-in.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub user_id: String,
    pub token: String,
}

/// Response to project creation.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInfo {
    pub project_id: String,
    pub api_key: String,
    pub name: String,
}

/// Response to collection listing.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionList {
    pub project_id: String,
    pub collections: Vec<String>,
}

/// Service identity and current time, for an external health endpoint.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInfo {
    pub ok: bool,
    pub name: String,
    pub time: DateTime<Utc>,
}

/// A multi-tenant document store over one storage root.
///
/// `Store` is `Send + Sync`; operations take `&self` and serialize
/// conflicting writers internally, so one instance can be shared across
/// request handlers.
pub struct Store {
    users: UserRegistry,
    projects: ProjectRegistry,
    collections: CollectionStore,
}

impl Store {
    /// Open a store rooted at `data_dir` on the local filesystem.
    pub fn open(data_dir: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::with_backend(Arc::new(FsBackend::new(data_dir)?)))
    }

    pub fn from_config(config: &StoreConfig) -> Result<Self> {
        Self::open(&config.data_dir)
    }

    /// Open over any byte-level backend.
    pub fn with_backend(backend: Arc<dyn StorageBackend>) -> Self {
        let store = FileStore::new(backend);
        let locks = Arc::new(LockTable::new());
        Self {
            users: UserRegistry::new(store.clone(), locks.clone()),
            projects: ProjectRegistry::new(store.clone(), locks.clone()),
            collections: CollectionStore::new(store, locks),
        }
    }

    /// Register a username and issue a permanent bearer token.
    pub fn sign_up(&self, username: &str) -> Result<Credentials> {
        let user = self.users.create(username)?;
        Ok(Credentials {
            user_id: user.id,
            token: user.token,
        })
    }

    /// Return the existing credentials for a username, any casing.
    pub fn log_in(&self, username: &str) -> Result<Credentials> {
        if username.is_empty() {
            return Err(Error::InvalidInput("username required".into()));
        }
        let user = self
            .users
            .find_by_username(username)
            .ok_or_else(|| Error::NotFound("user not found".into()))?;
        Ok(Credentials {
            user_id: user.id,
            token: user.token,
        })
    }

    /// Create a project owned by the authenticated user.
    pub fn create_project(
        &self,
        credential: Option<&str>,
        name: Option<&str>,
    ) -> Result<ProjectInfo> {
        let user = auth::resolve_user(&self.users, credential)?;
        let project = self.projects.create(&user.id, name)?;
        Ok(ProjectInfo {
            project_id: project.id,
            api_key: project.api_key,
            name: project.name,
        })
    }

    /// Projects owned by the authenticated user.
    pub fn list_projects(&self, credential: Option<&str>) -> Result<Vec<Project>> {
        let user = auth::resolve_user(&self.users, credential)?;
        Ok(self.projects.owned_by(&user.id))
    }

    /// Names of the collections persisted under the authenticated project.
    pub fn list_collections(&self, credential: Option<&str>) -> Result<CollectionList> {
        let project = auth::resolve_project(&self.projects, credential)?;
        let collections = self.collections.collection_names(&project.id)?;
        Ok(CollectionList {
            project_id: project.id,
            collections,
        })
    }

    /// Store `data` as a new document in `collection`.
    pub fn create_document(
        &self,
        credential: Option<&str>,
        collection: &str,
        data: Value,
    ) -> Result<Document> {
        let project = auth::resolve_project(&self.projects, credential)?;
        let collection = collections::validate_name(collection)?;
        self.collections.create(&project.id, collection, data)
    }

    /// All documents in `collection`, oldest first.
    pub fn list_documents(
        &self,
        credential: Option<&str>,
        collection: &str,
    ) -> Result<Vec<Document>> {
        let project = auth::resolve_project(&self.projects, credential)?;
        let collection = collections::validate_name(collection)?;
        Ok(self.collections.list(&project.id, collection))
    }

    pub fn get_document(
        &self,
        credential: Option<&str>,
        collection: &str,
        id: &str,
    ) -> Result<Document> {
        let project = auth::resolve_project(&self.projects, credential)?;
        let collection = collections::validate_name(collection)?;
        self.collections.get(&project.id, collection, id)
    }

    /// Shallow-merge `partial` into the document's data.
    pub fn update_document(
        &self,
        credential: Option<&str>,
        collection: &str,
        id: &str,
        partial: Value,
    ) -> Result<Document> {
        let project = auth::resolve_project(&self.projects, credential)?;
        let collection = collections::validate_name(collection)?;
        self.collections
            .merge_update(&project.id, collection, id, partial)
    }

    pub fn delete_document(
        &self,
        credential: Option<&str>,
        collection: &str,
        id: &str,
    ) -> Result<()> {
        let project = auth::resolve_project(&self.projects, credential)?;
        let collection = collections::validate_name(collection)?;
        self.collections.delete(&project.id, collection, id)
    }

    /// Service identity and current time.
    pub fn info(&self) -> ServiceInfo {
        ServiceInfo {
            ok: true,
            name: SERVICE_NAME.to_string(),
            time: Utc::now(),
        }
    }
}
