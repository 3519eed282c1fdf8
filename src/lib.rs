//! File-backed multi-tenant document store.
//!
//! Users sign up and own projects; each project is an isolated namespace
//! addressed by a permanent API key; documents live in named collections
//! persisted as one JSON list per collection. [`Store`] exposes the whole
//! operation surface for an external transport layer.

pub mod auth;
pub mod collections;
pub mod config;
pub mod error;
pub mod ident;
pub mod locks;
pub mod projects;
pub mod storage;
pub mod store;
pub mod users;

pub use config::StoreConfig;
pub use error::{Error, Result};
pub use store::Store;
