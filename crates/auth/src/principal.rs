use gatehouse_core::Username;

use crate::RoleSet;

static NO_ROLES: RoleSet = RoleSet::new();

/// The identity a request acts as.
///
/// Built once per request by the credential verifier and dropped with the
/// request. The anonymous principal never carries roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Principal {
    Anonymous,
    Authenticated { username: Username, roles: RoleSet },
}

impl Principal {
    pub fn anonymous() -> Self {
        Self::Anonymous
    }

    pub fn authenticated(username: Username, roles: RoleSet) -> Self {
        Self::Authenticated { username, roles }
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, Self::Anonymous)
    }

    pub fn username(&self) -> Option<&Username> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated { username, .. } => Some(username),
        }
    }

    pub fn roles(&self) -> &RoleSet {
        match self {
            Self::Anonymous => &NO_ROLES,
            Self::Authenticated { roles, .. } => roles,
        }
    }

    /// True when the principal holds at least one of `required`.
    pub fn has_any_role(&self, required: &RoleSet) -> bool {
        !self.roles().is_disjoint(required)
    }
}

impl core::fmt::Display for Principal {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Anonymous => f.write_str("anonymous"),
            Self::Authenticated { username, .. } => core::fmt::Display::fmt(username, f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::role_set;

    #[test]
    fn anonymous_has_no_roles() {
        let p = Principal::anonymous();
        assert!(p.is_anonymous());
        assert!(p.roles().is_empty());
        assert!(p.username().is_none());
        assert!(!p.has_any_role(&role_set(["USER"])));
    }

    #[test]
    fn role_intersection() {
        let p = Principal::authenticated(Username::parse("user").unwrap(), role_set(["USER"]));
        assert!(p.has_any_role(&role_set(["USER", "ADMIN"])));
        assert!(!p.has_any_role(&role_set(["ADMIN"])));
        assert_eq!(p.to_string(), "user");
    }
}
