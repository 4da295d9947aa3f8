//! Startup configuration: bind address, rule table and seed users.
//!
//! Loaded once from a TOML file named by `GATEHOUSE_CONFIG`. Without one the
//! service runs the built-in development setup.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;

use gatehouse_auth::{
    AccessDecisionEngine, AccessPredicate, AccessRule, BcryptVerifier, CredentialRecord,
    CredentialStoreError, CredentialVerifier, DEFAULT_COST, Gatekeeper, InMemoryCredentialStore,
    PasswordError, RuleOrdering, RuleTable, RuleTableError, hash_cost, hash_secret, role_set,
};
use gatehouse_core::{DomainError, Username};

pub const CONFIG_ENV: &str = "GATEHOUSE_CONFIG";
pub const BIND_ENV: &str = "GATEHOUSE_BIND";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("rule {index}: {reason}")]
    Rule { index: usize, reason: String },

    #[error(transparent)]
    Table(#[from] RuleTableError),

    #[error("duplicate user '{0}'")]
    DuplicateUser(String),

    #[error("invalid realm {0:?}: must be printable ASCII without quotes")]
    Realm(String),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Password(#[from] PasswordError),
}

impl From<CredentialStoreError> for ConfigError {
    fn from(value: CredentialStoreError) -> Self {
        match value {
            CredentialStoreError::DuplicateUser(name) => {
                ConfigError::DuplicateUser(name.to_string())
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessKind {
    PermitAll,
    Authenticated,
    DenyAll,
}

/// One `[[rules]]` entry. Exactly one of `access` / `any_of` is set.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleConfig {
    pub pattern: String,
    #[serde(default)]
    pub access: Option<AccessKind>,
    #[serde(default)]
    pub any_of: Option<Vec<String>>,
}

impl RuleConfig {
    fn predicate(&self, index: usize) -> Result<AccessPredicate, ConfigError> {
        match (&self.access, &self.any_of) {
            (Some(AccessKind::PermitAll), None) => Ok(AccessPredicate::PermitAll),
            (Some(AccessKind::Authenticated), None) => Ok(AccessPredicate::RequireAuthenticated),
            (Some(AccessKind::DenyAll), None) => Ok(AccessPredicate::DenyAll),
            (None, Some(roles)) => {
                if roles.iter().any(|r| r.trim().is_empty()) {
                    return Err(ConfigError::Rule {
                        index,
                        reason: "role names must not be empty".to_string(),
                    });
                }
                Ok(AccessPredicate::RequireAnyOf(role_set(roles.iter().cloned())))
            }
            (Some(_), Some(_)) => Err(ConfigError::Rule {
                index,
                reason: "set either 'access' or 'any_of', not both".to_string(),
            }),
            (None, None) => Err(ConfigError::Rule {
                index,
                reason: "missing 'access' or 'any_of'".to_string(),
            }),
        }
    }
}

/// One `[[users]]` entry. `password_hash` is a bcrypt hash, never plain text.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserConfig {
    pub username: String,
    pub password_hash: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl core::fmt::Debug for UserConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("UserConfig")
            .field("username", &self.username)
            .field("roles", &self.roles)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    #[serde(default = "default_bind")]
    pub bind: String,

    #[serde(default = "default_realm")]
    pub realm: String,

    #[serde(default)]
    pub rule_order: RuleOrdering,

    /// Cost for hashing the built-in users, and for the unknown-user decoy
    /// check when no stored hash carries a readable cost.
    #[serde(default = "default_cost")]
    pub bcrypt_cost: u32,

    pub rules: Vec<RuleConfig>,

    #[serde(default)]
    pub users: Vec<UserConfig>,
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_realm() -> String {
    "gatehouse".to_string()
}

fn default_cost() -> u32 {
    DEFAULT_COST
}

impl GatewayConfig {
    /// Load from `GATEHOUSE_CONFIG`, or fall back to the built-in setup.
    /// `GATEHOUSE_BIND` overrides the bind address either way.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = match std::env::var_os(CONFIG_ENV) {
            Some(path) => {
                let path = PathBuf::from(path);
                tracing::info!(path = %path.display(), "loading configuration");
                Self::load(&path)?
            }
            None => {
                tracing::warn!("{CONFIG_ENV} not set; using built-in development users and rules");
                Self::builtin()?
            }
        };

        if let Ok(bind) = std::env::var(BIND_ENV) {
            config.bind = bind;
        }
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// The development setup: public, admin-only and user-or-admin API areas,
    /// everything else requires login; users `admin`/`admin123` and
    /// `user`/`user123`.
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::builtin_with_cost(DEFAULT_COST)
    }

    pub fn builtin_with_cost(cost: u32) -> Result<Self, ConfigError> {
        let rule = |pattern: &str, access: Option<AccessKind>, any_of: Option<&[&str]>| RuleConfig {
            pattern: pattern.to_string(),
            access,
            any_of: any_of.map(|roles| roles.iter().map(|r| r.to_string()).collect()),
        };

        let user = |name: &str, secret: &str, role: &str| -> Result<UserConfig, ConfigError> {
            Ok(UserConfig {
                username: name.to_string(),
                password_hash: hash_secret(secret.as_bytes(), cost)?,
                roles: vec![role.to_string()],
            })
        };

        let config = Self {
            bind: default_bind(),
            realm: default_realm(),
            rule_order: RuleOrdering::Declared,
            bcrypt_cost: cost,
            rules: vec![
                rule("/api/public/**", Some(AccessKind::PermitAll), None),
                rule("/api/admin/**", None, Some(&["ADMIN"][..])),
                rule("/api/user/**", None, Some(&["USER", "ADMIN"][..])),
                rule("**", Some(AccessKind::Authenticated), None),
            ],
            users: vec![user("admin", "admin123", "ADMIN")?, user("user", "user123", "USER")?],
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.realm.is_empty()
            || !self.realm.chars().all(|c| c.is_ascii_graphic() || c == ' ')
            || self.realm.contains(['"', '\\'])
        {
            return Err(ConfigError::Realm(self.realm.clone()));
        }

        self.rule_table()?;

        let mut seen = HashSet::new();
        for user in &self.users {
            Username::parse(user.username.as_str())?;
            if !seen.insert(user.username.as_str()) {
                return Err(ConfigError::DuplicateUser(user.username.clone()));
            }
        }
        Ok(())
    }

    pub fn rule_table(&self) -> Result<RuleTable, ConfigError> {
        let rules = self
            .rules
            .iter()
            .enumerate()
            .map(|(index, r)| -> Result<AccessRule, ConfigError> {
                Ok(AccessRule::parse(&r.pattern, r.predicate(index)?)?)
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        Ok(RuleTable::with_ordering(rules, self.rule_order)?)
    }

    pub fn credential_store(&self) -> Result<InMemoryCredentialStore, ConfigError> {
        let records = self
            .users
            .iter()
            .map(|u| -> Result<CredentialRecord, ConfigError> {
                Ok(CredentialRecord {
                    username: Username::parse(u.username.as_str())?,
                    password_hash: u.password_hash.clone(),
                    roles: role_set(u.roles.iter().cloned()),
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        Ok(InMemoryCredentialStore::from_records(records)?)
    }

    /// Cost of the unknown-user decoy: the highest cost among the stored
    /// hashes, so an unknown user never fails faster than a wrong secret.
    pub fn decoy_cost(&self) -> u32 {
        self.users
            .iter()
            .filter_map(|u| hash_cost(&u.password_hash))
            .max()
            .unwrap_or(self.bcrypt_cost)
    }

    /// Assemble the verifier and the decision engine around `store`.
    pub fn gatekeeper(
        &self,
        store: Arc<InMemoryCredentialStore>,
    ) -> Result<Gatekeeper, ConfigError> {
        let cost = self.decoy_cost();
        if cost != self.bcrypt_cost {
            tracing::debug!(cost, "decoy hash cost taken from stored hashes");
        }
        let verifier = CredentialVerifier::new(store, Arc::new(BcryptVerifier::new(cost)?));
        let engine = AccessDecisionEngine::new(self.rule_table()?);
        Ok(Gatekeeper::new(verifier, engine))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
bind = "127.0.0.1:9000"
realm = "test realm"

[[rules]]
pattern = "/api/public/**"
access = "permit_all"

[[rules]]
pattern = "/api/admin/**"
any_of = ["ADMIN"]

[[rules]]
pattern = "**"
access = "authenticated"

[[users]]
username = "admin"
password_hash = "$2b$04$abcdefghijklmnopqrstuu5Lz6h1HUtVT0c0dUX3mQS2q2E1T0yS6"
roles = ["ADMIN"]
"#;

    #[test]
    fn parses_sample() {
        let config = GatewayConfig::parse(SAMPLE).unwrap();
        assert_eq!(config.bind, "127.0.0.1:9000");
        assert_eq!(config.realm, "test realm");
        assert_eq!(config.rule_order, RuleOrdering::Declared);
        assert_eq!(config.bcrypt_cost, DEFAULT_COST);
        assert_eq!(config.rules.len(), 3);
        assert_eq!(config.rule_table().unwrap().rules().len(), 3);

        let store = config.credential_store().unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn rule_needs_exactly_one_predicate() {
        let both = r#"
[[rules]]
pattern = "**"
access = "permit_all"
any_of = ["ADMIN"]
"#;
        assert!(matches!(
            GatewayConfig::parse(both).unwrap_err(),
            ConfigError::Rule { index: 0, .. }
        ));

        let neither = r#"
[[rules]]
pattern = "**"
"#;
        assert!(matches!(
            GatewayConfig::parse(neither).unwrap_err(),
            ConfigError::Rule { index: 0, .. }
        ));
    }

    #[test]
    fn missing_catch_all_is_rejected() {
        let content = r#"
[[rules]]
pattern = "/api/**"
access = "permit_all"
"#;
        assert!(matches!(
            GatewayConfig::parse(content).unwrap_err(),
            ConfigError::Table(RuleTableError::MissingCatchAll)
        ));
    }

    #[test]
    fn specificity_order_accepts_unordered_rules() {
        let content = r#"
rule_order = "specificity"

[[rules]]
pattern = "**"
access = "authenticated"

[[rules]]
pattern = "/api/public/**"
access = "permit_all"
"#;
        let config = GatewayConfig::parse(content).unwrap();
        let table = config.rule_table().unwrap();
        assert_eq!(table.rules()[0].pattern().as_str(), "/api/public/**");
    }

    #[test]
    fn duplicate_users_are_rejected() {
        let content = r#"
[[rules]]
pattern = "**"
access = "authenticated"

[[users]]
username = "bob"
password_hash = "x"

[[users]]
username = "bob"
password_hash = "y"
"#;
        assert!(matches!(
            GatewayConfig::parse(content).unwrap_err(),
            ConfigError::DuplicateUser(name) if name == "bob"
        ));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let content = r#"
[[rules]]
pattern = "**"
acess = "authenticated"
"#;
        assert!(matches!(GatewayConfig::parse(content).unwrap_err(), ConfigError::Parse(_)));
    }

    #[test]
    fn realm_must_be_header_safe() {
        let content = r#"
realm = "bad\"realm"

[[rules]]
pattern = "**"
access = "authenticated"
"#;
        assert!(matches!(GatewayConfig::parse(content).unwrap_err(), ConfigError::Realm(_)));
    }

    #[test]
    fn builtin_setup_matches_documented_users() {
        let config = GatewayConfig::builtin_with_cost(4).unwrap();
        let store = Arc::new(config.credential_store().unwrap());
        let names: Vec<&str> = store.records().iter().map(|r| r.username.as_str()).collect();
        assert_eq!(names, vec!["admin", "user"]);

        let gate = config.gatekeeper(store).unwrap();
        assert_eq!(gate.engine().table().rules().len(), 4);
    }

    #[test]
    fn builtin_rules_follow_documented_order() {
        let config = GatewayConfig::builtin_with_cost(4).unwrap();
        let patterns: Vec<&str> = config.rules.iter().map(|r| r.pattern.as_str()).collect();
        assert_eq!(patterns, vec!["/api/public/**", "/api/admin/**", "/api/user/**", "**"]);
    }

    const COST_12_HASH: &str = "$2y$12$L6Bc/AlTQHyd9liGgGEZyOFLPHNgyxeEPfgYfBCVxJ7JIlwxyVU3u";

    fn with_users(users: &[(&str, &str)]) -> GatewayConfig {
        let mut content = String::from("[[rules]]\npattern = \"**\"\naccess = \"authenticated\"\n");
        for (name, hash) in users {
            content.push_str(&format!(
                "\n[[users]]\nusername = \"{name}\"\npassword_hash = \"{hash}\"\n"
            ));
        }
        GatewayConfig::parse(&content).unwrap()
    }

    #[test]
    fn decoy_cost_follows_stored_hashes() {
        let config = with_users(&[("alice", COST_12_HASH)]);
        assert_eq!(config.bcrypt_cost, DEFAULT_COST);
        assert_eq!(config.decoy_cost(), 12);

        let low = hash_secret(b"bob-secret", 4).unwrap();
        let config = with_users(&[("bob", low.as_str()), ("alice", COST_12_HASH)]);
        assert_eq!(config.decoy_cost(), 12);
    }

    #[test]
    fn decoy_cost_falls_back_to_configured_cost() {
        assert_eq!(with_users(&[]).decoy_cost(), DEFAULT_COST);
        assert_eq!(with_users(&[("carol", "not-a-bcrypt-hash")]).decoy_cost(), DEFAULT_COST);
    }

    #[test]
    fn user_debug_hides_hash() {
        let config = GatewayConfig::parse(SAMPLE).unwrap();
        let printed = format!("{:?}", config.users[0]);
        assert!(!printed.contains("$2b$"));
    }
}
