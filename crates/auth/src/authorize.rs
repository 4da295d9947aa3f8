//! Access decision engine.
//!
//! - No IO
//! - No panics
//! - Pure function of (rules, principal, path)

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use gatehouse_core::RequestPath;

use crate::{AccessPredicate, AccessRule, Principal, RuleTable};

/// Why access was refused.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessDenied {
    /// No usable identity: the caller should authenticate and retry.
    #[error("authentication required")]
    Unauthenticated,

    /// Authenticated, but none of the required roles are held.
    #[error("forbidden")]
    Forbidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessDecision {
    Permit,
    Deny(AccessDenied),
}

impl AccessDecision {
    pub fn into_result(self) -> Result<(), AccessDenied> {
        match self {
            Self::Permit => Ok(()),
            Self::Deny(reason) => Err(reason),
        }
    }
}

/// A decision together with the index of the rule that produced it.
///
/// `matched_rule` is `None` only when nothing matched and the engine failed
/// closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    pub decision: AccessDecision,
    pub matched_rule: Option<usize>,
}

/// Evaluate `rules` in order; the first matching rule decides.
pub fn evaluate(rules: &[AccessRule], principal: &Principal, path: &RequestPath) -> Evaluation {
    match rules
        .iter()
        .enumerate()
        .find(|(_, rule)| rule.pattern().matches(path))
    {
        Some((index, rule)) => Evaluation {
            decision: apply(rule.predicate(), principal),
            matched_rule: Some(index),
        },
        None => Evaluation {
            decision: AccessDecision::Deny(AccessDenied::Unauthenticated),
            matched_rule: None,
        },
    }
}

pub fn decide(rules: &[AccessRule], principal: &Principal, path: &RequestPath) -> AccessDecision {
    evaluate(rules, principal, path).decision
}

fn apply(predicate: &AccessPredicate, principal: &Principal) -> AccessDecision {
    use AccessDecision::{Deny, Permit};

    match predicate {
        AccessPredicate::PermitAll => Permit,
        _ if principal.is_anonymous() => Deny(AccessDenied::Unauthenticated),
        AccessPredicate::RequireAuthenticated => Permit,
        AccessPredicate::RequireAnyOf(required) if principal.has_any_role(required) => Permit,
        AccessPredicate::RequireAnyOf(_) | AccessPredicate::DenyAll => {
            Deny(AccessDenied::Forbidden)
        }
    }
}

/// Decision engine bound to one immutable rule table.
///
/// Cheap to clone; clones share the table.
#[derive(Debug, Clone)]
pub struct AccessDecisionEngine {
    table: Arc<RuleTable>,
}

impl AccessDecisionEngine {
    pub fn new(table: RuleTable) -> Self {
        Self {
            table: Arc::new(table),
        }
    }

    pub fn table(&self) -> &RuleTable {
        &self.table
    }

    pub fn decide(&self, principal: &Principal, path: &RequestPath) -> AccessDecision {
        self.evaluate(principal, path).decision
    }

    pub fn evaluate(&self, principal: &Principal, path: &RequestPath) -> Evaluation {
        let eval = evaluate(self.table.rules(), principal, path);
        tracing::trace!(
            principal = %principal,
            path = %path,
            matched_rule = ?eval.matched_rule,
            decision = ?eval.decision,
            "access evaluated"
        );
        eval
    }
}
