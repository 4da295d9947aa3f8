//! Ordered access rule table.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{PathPattern, PatternError, RoleSet};

/// What a matched rule demands of the principal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessPredicate {
    PermitAll,
    RequireAuthenticated,
    RequireAnyOf(RoleSet),
    DenyAll,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessRule {
    pattern: PathPattern,
    predicate: AccessPredicate,
}

impl AccessRule {
    pub fn new(pattern: PathPattern, predicate: AccessPredicate) -> Self {
        Self { pattern, predicate }
    }

    pub fn parse(pattern: &str, predicate: AccessPredicate) -> Result<Self, RuleTableError> {
        Ok(Self::new(PathPattern::parse(pattern)?, predicate))
    }

    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }

    pub fn predicate(&self) -> &AccessPredicate {
        &self.predicate
    }
}

/// How rules are ordered before first-match evaluation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleOrdering {
    /// Declaration order, as written by the table author.
    #[default]
    Declared,
    /// Most specific pattern first; ties keep declaration order.
    Specificity,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RuleTableError {
    #[error(transparent)]
    InvalidPattern(#[from] PatternError),

    #[error("rule table must end with a catch-all rule ('**')")]
    MissingCatchAll,

    #[error("rule {index} ('{pattern}') can never match: it follows a catch-all rule")]
    UnreachableRule { index: usize, pattern: String },

    #[error("rule {index} requires any of an empty role set")]
    EmptyRoleSet { index: usize },
}

/// Validated, immutable rule sequence.
///
/// # Invariants
/// - the last rule is a catch-all, so every path has a defined outcome
/// - no rule follows the catch-all
/// - every `RequireAnyOf` names at least one role
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleTable {
    rules: Vec<AccessRule>,
}

impl RuleTable {
    pub fn new(rules: Vec<AccessRule>) -> Result<Self, RuleTableError> {
        Self::with_ordering(rules, RuleOrdering::Declared)
    }

    pub fn with_ordering(
        mut rules: Vec<AccessRule>,
        ordering: RuleOrdering,
    ) -> Result<Self, RuleTableError> {
        if ordering == RuleOrdering::Specificity {
            // `sort_by` is stable.
            rules.sort_by(|a, b| b.pattern.specificity().cmp(&a.pattern.specificity()));
        }
        validate(&rules)?;
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[AccessRule] {
        &self.rules
    }

}

fn validate(rules: &[AccessRule]) -> Result<(), RuleTableError> {
    let mut catch_all_seen = false;

    for (index, rule) in rules.iter().enumerate() {
        if catch_all_seen {
            return Err(RuleTableError::UnreachableRule {
                index,
                pattern: rule.pattern.as_str().to_string(),
            });
        }
        if let AccessPredicate::RequireAnyOf(roles) = &rule.predicate {
            if roles.is_empty() {
                return Err(RuleTableError::EmptyRoleSet { index });
            }
        }
        catch_all_seen = rule.pattern.is_catch_all();
    }

    if !catch_all_seen {
        return Err(RuleTableError::MissingCatchAll);
    }
    Ok(())
}
