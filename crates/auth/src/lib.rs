//! `gatehouse-auth` — pure authentication/authorization core.
//!
//! This crate is decoupled from HTTP and storage: the credential store and
//! the password hash verifier are injected, and every decision is a pure
//! function of its inputs.

pub mod authorize;
pub mod credentials;
pub mod gate;
pub mod password;
pub mod pattern;
pub mod principal;
pub mod roles;
pub mod rules;
pub mod verify;

pub use authorize::{
    AccessDecision, AccessDecisionEngine, AccessDenied, Evaluation, decide, evaluate,
};
pub use credentials::{
    CredentialRecord, CredentialStore, CredentialStoreError, Credentials, InMemoryCredentialStore,
    Secret,
};
pub use gate::{Gatekeeper, Rejection, RejectionStatus};
pub use password::{
    BcryptVerifier, DEFAULT_COST, PasswordError, PasswordHashVerifier, hash_cost, hash_secret,
};
pub use pattern::{PathPattern, PatternError, Specificity};
pub use principal::Principal;
pub use roles::{Role, RoleSet, role_set};
pub use rules::{AccessPredicate, AccessRule, RuleOrdering, RuleTable, RuleTableError};
pub use verify::{AuthenticationFailure, CredentialVerifier};
