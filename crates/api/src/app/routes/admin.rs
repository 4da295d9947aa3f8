//! Admin routes: read-only views of the configured users and rule table.
//!
//! `explain` answers "what would the gate do with this path?" for the
//! calling principal, without touching the request path itself.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;
use serde_json::json;

use gatehouse_auth::{AccessDecision, AccessPredicate, Principal};

use crate::app::{AppState, errors};
use crate::context::PrincipalContext;
use crate::normalize::normalize_path;

#[derive(Debug, Deserialize)]
pub struct ExplainQuery {
    pub path: String,
    /// Evaluate as the anonymous principal instead of the caller.
    #[serde(default)]
    pub anonymous: bool,
}

pub fn router() -> Router {
    Router::new()
        .route("/users", get(list_users))
        .route("/rules", get(list_rules))
        .route("/explain", get(explain))
}

pub async fn list_users(Extension(state): Extension<Arc<AppState>>) -> impl IntoResponse {
    let users: Vec<_> = state
        .store
        .records()
        .into_iter()
        .map(|r| {
            json!({
                "username": r.username.as_str(),
                "roles": r.roles.iter().map(|role| role.as_str()).collect::<Vec<_>>(),
            })
        })
        .collect();

    Json(json!({ "users": users }))
}

pub async fn list_rules(Extension(state): Extension<Arc<AppState>>) -> impl IntoResponse {
    let rules: Vec<_> = state
        .gatekeeper
        .engine()
        .table()
        .rules()
        .iter()
        .map(|r| {
            json!({
                "pattern": r.pattern().as_str(),
                "access": predicate_json(r.predicate()),
            })
        })
        .collect();

    Json(json!({ "rules": rules }))
}

pub async fn explain(
    Extension(state): Extension<Arc<AppState>>,
    Extension(caller): Extension<PrincipalContext>,
    Query(q): Query<ExplainQuery>,
) -> axum::response::Response {
    let path = match normalize_path(&q.path) {
        Ok(p) => p,
        Err(e) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_path", e.to_string()),
    };

    let principal = if q.anonymous {
        Principal::anonymous()
    } else {
        caller.principal().clone()
    };

    let engine = state.gatekeeper.engine();
    let eval = engine.evaluate(&principal, &path);
    let matched = eval.matched_rule.and_then(|i| engine.table().rules().get(i));

    let decision = match eval.decision {
        AccessDecision::Permit => json!({ "permit": true }),
        AccessDecision::Deny(reason) => json!({ "permit": false, "reason": reason }),
    };

    Json(json!({
        "path": path.as_str(),
        "principal": principal.to_string(),
        "matched_rule": eval.matched_rule,
        "pattern": matched.map(|r| r.pattern().as_str()),
        "decision": decision,
    }))
    .into_response()
}

fn predicate_json(predicate: &AccessPredicate) -> serde_json::Value {
    match predicate {
        AccessPredicate::PermitAll => json!("permit_all"),
        AccessPredicate::RequireAuthenticated => json!("authenticated"),
        AccessPredicate::DenyAll => json!("deny_all"),
        AccessPredicate::RequireAnyOf(roles) => json!({
            "any_of": roles.iter().map(|r| r.as_str()).collect::<Vec<_>>(),
        }),
    }
}
