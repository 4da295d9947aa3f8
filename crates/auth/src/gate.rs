//! Request admission: authenticate, then authorize.

use thiserror::Error;

use gatehouse_core::RequestPath;

use crate::{
    AccessDecisionEngine, AccessDenied, AuthenticationFailure, CredentialVerifier, Credentials,
    Principal,
};

/// Terminal outcome for a refused request.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    #[error(transparent)]
    Authentication(#[from] AuthenticationFailure),

    #[error(transparent)]
    Access(#[from] AccessDenied),
}

/// Transport-neutral status class of a rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionStatus {
    /// Identity missing or wrong (HTTP 401).
    Unauthorized,
    /// Identity fine, roles insufficient (HTTP 403).
    Forbidden,
}

impl Rejection {
    pub fn status(&self) -> RejectionStatus {
        match self {
            Rejection::Authentication(_) | Rejection::Access(AccessDenied::Unauthenticated) => {
                RejectionStatus::Unauthorized
            }
            Rejection::Access(AccessDenied::Forbidden) => RejectionStatus::Forbidden,
        }
    }
}

/// Verifier + decision engine, assembled once at startup and shared by all
/// requests.
#[derive(Debug, Clone)]
pub struct Gatekeeper {
    verifier: CredentialVerifier,
    engine: AccessDecisionEngine,
}

impl Gatekeeper {
    pub fn new(verifier: CredentialVerifier, engine: AccessDecisionEngine) -> Self {
        Self { verifier, engine }
    }

    pub fn engine(&self) -> &AccessDecisionEngine {
        &self.engine
    }

    /// Admit or reject a request.
    ///
    /// Credentials that are present but wrong reject the request outright,
    /// even on paths that would admit an anonymous caller.
    pub fn admit(
        &self,
        credentials: Option<&Credentials>,
        path: &RequestPath,
    ) -> Result<Principal, Rejection> {
        let principal = self.verifier.authenticate(credentials)?;
        self.engine.decide(&principal, path).into_result()?;
        Ok(principal)
    }
}
