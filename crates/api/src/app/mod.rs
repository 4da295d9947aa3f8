//! HTTP application wiring (Axum router + gatekeeper wiring).
//!
//! - `routes/`: HTTP handlers (one file per area)
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use gatehouse_auth::{Gatekeeper, InMemoryCredentialStore};

use crate::config::{ConfigError, GatewayConfig};
use crate::middleware;

pub mod errors;
pub mod routes;

/// Shared, read-only state handed to handlers.
#[derive(Debug)]
pub struct AppState {
    pub store: Arc<InMemoryCredentialStore>,
    pub gatekeeper: Arc<Gatekeeper>,
}

/// Build the full HTTP router (public entrypoint used by `main.rs`).
///
/// Every route, and the 404 fallback, sits behind the auth middleware, so a
/// path with no handler is still subject to the rule table.
pub fn build_app(config: &GatewayConfig) -> Result<Router, ConfigError> {
    let store = Arc::new(config.credential_store()?);
    let gatekeeper = Arc::new(config.gatekeeper(store.clone())?);

    tracing::info!(
        rules = gatekeeper.engine().table().rules().len(),
        users = store.len(),
        rule_order = ?config.rule_order,
        "gatekeeper ready"
    );

    let auth_state = middleware::AuthState {
        gatekeeper: gatekeeper.clone(),
        realm: Arc::from(config.realm.as_str()),
    };
    let state = Arc::new(AppState { store, gatekeeper });

    Ok(Router::new()
        .route("/", get(routes::system::health))
        .route("/health", get(routes::system::health))
        .route("/whoami", get(routes::system::whoami))
        .nest("/api", routes::router())
        .fallback(routes::system::not_found)
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn_with_state(
                    auth_state,
                    middleware::auth_middleware,
                ))
                .layer(Extension(state)),
        ))
}
