use std::borrow::Cow;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Role identifier used for RBAC.
///
/// Roles are opaque, case-sensitive tags (`"USER"`, `"ADMIN"`). What a role
/// may reach is decided entirely by the rule table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ordered set of roles. Ordering keeps logs and responses deterministic.
pub type RoleSet = BTreeSet<Role>;

/// Build a [`RoleSet`] from role names.
pub fn role_set<I, R>(roles: I) -> RoleSet
where
    I: IntoIterator<Item = R>,
    R: Into<Cow<'static, str>>,
{
    roles.into_iter().map(Role::new).collect()
}
