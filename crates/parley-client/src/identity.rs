//! Local user identity.
//!
//! The identity is read once, before any room is entered, and handed to the
//! [`crate::Client`] as a constructor argument. The client never looks it up
//! on its own.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ClientError;

/// The local user as other room members see them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    name: String,
}

impl Identity {
    /// Create an identity. A blank name counts as no identity.
    pub fn new(name: impl Into<String>) -> Result<Self, ClientError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ClientError::PreconditionMissing { detail: "user name is empty".into() });
        }
        Ok(Self { name })
    }

    /// Display name sent with every join and chat line.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Somewhere a previously stored identity can be read from.
pub trait IdentitySource {
    /// Load the identity, or report [`ClientError::PreconditionMissing`].
    fn load(&self) -> Result<Identity, ClientError>;
}

/// Persisted user record.
///
/// Only `name` is read. Other fields written by the sign-in flow are ignored.
#[derive(Debug, Deserialize)]
struct StoredUser {
    name: Option<String>,
}

/// Identity stored as a JSON user record on disk.
#[derive(Debug, Clone)]
pub struct IdentityFile {
    path: PathBuf,
}

impl IdentityFile {
    /// Identity source backed by the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the user record.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl IdentitySource for IdentityFile {
    fn load(&self) -> Result<Identity, ClientError> {
        let missing = |detail: String| ClientError::PreconditionMissing { detail };

        let raw = std::fs::read_to_string(&self.path)
            .map_err(|e| missing(format!("cannot read {}: {e}", self.path.display())))?;
        let user: StoredUser = serde_json::from_str(&raw)
            .map_err(|e| missing(format!("invalid user record {}: {e}", self.path.display())))?;

        let name = user.name.ok_or_else(|| missing("user record has no name".into()))?;
        Identity::new(name)
    }
}
