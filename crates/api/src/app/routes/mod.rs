use axum::{Router, routing::get};

pub mod admin;
pub mod public;
pub mod system;

/// Router for everything under `/api`.
pub fn router() -> Router {
    Router::new()
        .nest("/public", public::router())
        .route("/user/me", get(system::whoami))
        .nest("/admin", admin::router())
}
