//! Password hash verification (bcrypt).

use thiserror::Error;

/// Work factor used when hashing seed secrets.
pub const DEFAULT_COST: u32 = 10;

const DECOY_SECRET: &[u8] = b"gatehouse-user-not-found";

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),
}

/// Compares a presented secret against a stored hash.
///
/// Implementations must compare in constant time.
pub trait PasswordHashVerifier: Send + Sync {
    fn matches(&self, presented: &[u8], stored_hash: &str) -> bool;

    /// A valid hash of an unguessable secret, checked against when the user
    /// does not exist so both failure paths do the same amount of work.
    fn decoy_hash(&self) -> Option<&str> {
        None
    }
}

/// bcrypt verifier. Comparison is constant time inside the `bcrypt` crate.
#[derive(Debug, Clone)]
pub struct BcryptVerifier {
    decoy: String,
}

impl BcryptVerifier {
    /// `cost` must be the highest cost among the stored hashes, otherwise
    /// the decoy check finishes faster than a real one. See [`hash_cost`].
    pub fn new(cost: u32) -> Result<Self, PasswordError> {
        Ok(Self {
            decoy: hash_secret(DECOY_SECRET, cost)?,
        })
    }
}

impl PasswordHashVerifier for BcryptVerifier {
    fn matches(&self, presented: &[u8], stored_hash: &str) -> bool {
        match bcrypt::verify(presented, stored_hash) {
            Ok(ok) => ok,
            Err(e) => {
                tracing::warn!(error = %e, "stored password hash is malformed");
                false
            }
        }
    }

    fn decoy_hash(&self) -> Option<&str> {
        Some(&self.decoy)
    }
}

pub fn hash_secret(secret: &[u8], cost: u32) -> Result<String, PasswordError> {
    Ok(bcrypt::hash(secret, cost)?)
}

/// Work factor recorded in a stored bcrypt hash, `None` if it does not parse.
pub fn hash_cost(stored_hash: &str) -> Option<u32> {
    stored_hash
        .parse::<bcrypt::HashParts>()
        .ok()
        .map(|parts| parts.get_cost())
}
