use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};
use serde_json::json;

use crate::app::errors;
use crate::context::PrincipalContext;

pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "UP" }))
}

pub async fn whoami(Extension(principal): Extension<PrincipalContext>) -> impl IntoResponse {
    Json(json!({
        "username": principal.username().map(|u| u.as_str()),
        "anonymous": principal.is_anonymous(),
        "roles": principal.roles().iter().map(|r| r.as_str()).collect::<Vec<_>>(),
    }))
}

pub async fn not_found() -> axum::response::Response {
    errors::json_error(StatusCode::NOT_FOUND, "not_found", "not found")
}
