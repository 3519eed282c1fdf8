//! User registry: the durable list of all accounts.

use crate::error::{Error, Result};
use crate::ident;
use crate::locks::LockTable;
use crate::storage::FileStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Storage key of the account list.
pub const USERS_KEY: &str = "users";

const MIN_USERNAME_LEN: usize = 3;

/// A registered account. Never mutated or deleted once created.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    /// Permanent bearer secret issued at signup.
    pub token: String,
    pub created_at: DateTime<Utc>,
}

/// Whole-file registry of accounts. Lookups are linear scans over the
/// loaded list, which doubles as the uniqueness check on creation.
pub struct UserRegistry {
    store: FileStore,
    locks: Arc<LockTable>,
}

impl UserRegistry {
    pub fn new(store: FileStore, locks: Arc<LockTable>) -> Self {
        Self { store, locks }
    }

    fn load(&self) -> Vec<User> {
        self.store.read(USERS_KEY, Vec::new())
    }

    /// All accounts, oldest first. Empty before the first signup. Takes the
    /// registry lock briefly so a concurrent writer is never observed
    /// mid-cycle.
    pub fn list(&self) -> Vec<User> {
        let lock = self.locks.get(USERS_KEY);
        let _guard = lock.lock();
        self.load()
    }

    /// Register a new account and issue its bearer token. Usernames must be
    /// at least three characters and unique under case-insensitive
    /// comparison.
    pub fn create(&self, username: &str) -> Result<User> {
        if username.chars().take(MIN_USERNAME_LEN).count() < MIN_USERNAME_LEN {
            return Err(Error::InvalidInput(
                "username required (min 3 chars)".into(),
            ));
        }
        let lock = self.locks.get(USERS_KEY);
        let _guard = lock.lock();
        let mut users = self.load();
        let needle = username.to_lowercase();
        if users.iter().any(|u| u.username.to_lowercase() == needle) {
            return Err(Error::Conflict("username already exists".into()));
        }
        let user = User {
            id: ident::generate("user"),
            username: username.to_string(),
            token: ident::generate("usrToken"),
            created_at: Utc::now(),
        };
        users.push(user.clone());
        self.store.write(USERS_KEY, &users)?;
        info!(username = %user.username, id = %user.id, "user created");
        Ok(user)
    }

    /// Case-insensitive username lookup.
    pub fn find_by_username(&self, username: &str) -> Option<User> {
        let needle = username.to_lowercase();
        self.list()
            .into_iter()
            .find(|u| u.username.to_lowercase() == needle)
    }

    /// Exact token lookup.
    pub fn find_by_token(&self, token: &str) -> Option<User> {
        self.list().into_iter().find(|u| u.token == token)
    }
}
