//! Bearer-credential resolution.
//!
//! A caller presents either a user token or a project API key in the
//! `Authorization` header; the two paths are independent and a
//! project-scoped operation never re-checks user identity. A missing
//! credential is `Unauthorized`; a credential that matches nothing is
//! `Forbidden`.

use crate::error::{Error, Result};
use crate::projects::{Project, ProjectRegistry};
use crate::users::{User, UserRegistry};
use tracing::debug;

/// Extract the bearer secret from a raw `Authorization` value, stripping an
/// optional `Bearer ` prefix and surrounding whitespace.
pub fn bearer(credential: Option<&str>) -> Option<&str> {
    let value = credential?.trim();
    let secret = value.strip_prefix("Bearer").unwrap_or(value).trim();
    if secret.is_empty() {
        None
    } else {
        Some(secret)
    }
}

/// Resolve a user identity from a raw `Authorization` value.
pub fn resolve_user(users: &UserRegistry, credential: Option<&str>) -> Result<User> {
    let token =
        bearer(credential).ok_or_else(|| Error::Unauthorized("missing user token".into()))?;
    users.find_by_token(token).ok_or_else(|| {
        debug!("credential matched no user token");
        Error::Forbidden("invalid user token".into())
    })
}

/// Resolve a project identity from a raw `Authorization` value.
pub fn resolve_project(projects: &ProjectRegistry, credential: Option<&str>) -> Result<Project> {
    let key =
        bearer(credential).ok_or_else(|| Error::Unauthorized("missing project api key".into()))?;
    projects.find_by_api_key(key).ok_or_else(|| {
        debug!("credential matched no project api key");
        Error::Forbidden("invalid api key".into())
    })
}
