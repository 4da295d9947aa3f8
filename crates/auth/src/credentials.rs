//! Credential store contract and the in-memory implementation.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use zeroize::Zeroizing;

use gatehouse_core::Username;

use crate::RoleSet;

/// A presented secret (password).
///
/// The bytes are wiped on drop and never printed.
#[derive(Clone)]
pub struct Secret(Zeroizing<Vec<u8>>);

impl Secret {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(Zeroizing::new(bytes.into()))
    }

    pub fn expose(&self) -> &[u8] {
        &self.0
    }
}

impl core::fmt::Debug for Secret {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("Secret(***)")
    }
}

impl From<&str> for Secret {
    fn from(value: &str) -> Self {
        Self::new(value.as_bytes())
    }
}

impl From<String> for Secret {
    fn from(value: String) -> Self {
        Self::new(value.into_bytes())
    }
}

/// Username + secret as extracted from a request.
///
/// The username is kept raw: an empty or unknown name is a verification
/// failure, not a parse error the caller could tell apart.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub secret: Secret,
}

impl Credentials {
    pub fn new(username: impl Into<String>, secret: impl Into<Secret>) -> Self {
        Self {
            username: username.into(),
            secret: secret.into(),
        }
    }
}

/// Stored account data. Only the hash of the secret is ever kept.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialRecord {
    pub username: Username,
    pub password_hash: String,
    pub roles: RoleSet,
}

impl core::fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CredentialRecord")
            .field("username", &self.username)
            .field("password_hash", &"<redacted>")
            .field("roles", &self.roles)
            .finish()
    }
}

/// Lookup of credential records by exact username.
///
/// Implementations must be safe to call from many request tasks at once; any
/// runtime mutation is the implementation's own synchronization problem.
pub trait CredentialStore: Send + Sync {
    fn lookup(&self, username: &str) -> Option<CredentialRecord>;
}

impl<T: CredentialStore + ?Sized> CredentialStore for Arc<T> {
    fn lookup(&self, username: &str) -> Option<CredentialRecord> {
        (**self).lookup(username)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CredentialStoreError {
    #[error("duplicate user '{0}'")]
    DuplicateUser(Username),
}

/// Immutable-after-startup store backed by a `HashMap`.
#[derive(Debug, Default, Clone)]
pub struct InMemoryCredentialStore {
    records: HashMap<String, CredentialRecord>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the store from seed records, refusing duplicate usernames.
    pub fn from_records<I>(records: I) -> Result<Self, CredentialStoreError>
    where
        I: IntoIterator<Item = CredentialRecord>,
    {
        let mut store = Self::new();
        for record in records {
            let key = record.username.as_str().to_string();
            if store.records.contains_key(&key) {
                return Err(CredentialStoreError::DuplicateUser(record.username));
            }
            store.records.insert(key, record);
        }
        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records, sorted by username.
    pub fn records(&self) -> Vec<&CredentialRecord> {
        let mut out: Vec<&CredentialRecord> = self.records.values().collect();
        out.sort_by(|a, b| a.username.cmp(&b.username));
        out
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn lookup(&self, username: &str) -> Option<CredentialRecord> {
        self.records.get(username).cloned()
    }
}
