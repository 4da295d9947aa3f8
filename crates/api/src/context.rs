use gatehouse_auth::{Principal, RoleSet};
use gatehouse_core::Username;

/// Principal context for a request (identity + roles), inserted by the auth
/// middleware once a request is admitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalContext {
    principal: Principal,
}

impl PrincipalContext {
    pub fn new(principal: Principal) -> Self {
        Self { principal }
    }

    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    pub fn username(&self) -> Option<&Username> {
        self.principal.username()
    }

    pub fn roles(&self) -> &RoleSet {
        self.principal.roles()
    }

    pub fn is_anonymous(&self) -> bool {
        self.principal.is_anonymous()
    }
}
