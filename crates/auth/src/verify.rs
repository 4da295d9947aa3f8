//! Credential verification: username + secret → principal.

use std::sync::Arc;

use thiserror::Error;

use crate::{CredentialStore, Credentials, PasswordHashVerifier, Principal, Secret};

/// Why a credential check failed.
///
/// Both variants render the same message. Callers outside this crate should
/// only ever surface that message, so a client cannot probe which usernames
/// exist.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthenticationFailure {
    #[error("bad credentials")]
    UnknownUser,

    #[error("bad credentials")]
    InvalidCredentials,
}

/// Resolves principals against an injected credential store.
///
/// Stateless: every call is a read of the store plus one hash comparison.
#[derive(Clone)]
pub struct CredentialVerifier {
    store: Arc<dyn CredentialStore>,
    hasher: Arc<dyn PasswordHashVerifier>,
}

impl CredentialVerifier {
    pub fn new(store: Arc<dyn CredentialStore>, hasher: Arc<dyn PasswordHashVerifier>) -> Self {
        Self { store, hasher }
    }

    /// Resolve the principal for a request.
    ///
    /// No credentials at all yields the anonymous principal; whether that is
    /// enough is up to the rule table.
    pub fn authenticate(
        &self,
        credentials: Option<&Credentials>,
    ) -> Result<Principal, AuthenticationFailure> {
        match credentials {
            None => Ok(Principal::anonymous()),
            Some(c) => self.verify(&c.username, &c.secret),
        }
    }

    pub fn verify(
        &self,
        username: &str,
        secret: &Secret,
    ) -> Result<Principal, AuthenticationFailure> {
        let Some(record) = self.store.lookup(username) else {
            // Spend the same hash work as a real comparison.
            if let Some(decoy) = self.hasher.decoy_hash() {
                let _ = self.hasher.matches(secret.expose(), decoy);
            }
            tracing::debug!(username, "authentication failed: unknown user");
            return Err(AuthenticationFailure::UnknownUser);
        };

        if !self.hasher.matches(secret.expose(), &record.password_hash) {
            tracing::debug!(username, "authentication failed: invalid credentials");
            return Err(AuthenticationFailure::InvalidCredentials);
        }

        Ok(Principal::authenticated(record.username, record.roles))
    }
}

impl core::fmt::Debug for CredentialVerifier {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CredentialVerifier").finish_non_exhaustive()
    }
}
