use axum::http::{HeaderValue, StatusCode, header};
use axum::response::IntoResponse;
use serde_json::json;

use gatehouse_auth::{AccessDenied, Rejection, RejectionStatus};

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

/// 401 with a Basic challenge.
fn unauthorized(realm: &str, message: &'static str) -> axum::response::Response {
    let mut res = json_error(StatusCode::UNAUTHORIZED, "unauthorized", message);
    if let Ok(challenge) = HeaderValue::from_str(&format!("Basic realm=\"{realm}\"")) {
        res.headers_mut().insert(header::WWW_AUTHENTICATE, challenge);
    }
    res
}

/// The single response for every credential failure: unknown user, wrong
/// secret and undecodable header all look alike.
pub fn bad_credentials(realm: &str) -> axum::response::Response {
    unauthorized(realm, "bad credentials")
}

pub fn rejection_response(rejection: Rejection, realm: &str) -> axum::response::Response {
    match (rejection, rejection.status()) {
        (Rejection::Authentication(_), _) => bad_credentials(realm),
        (_, RejectionStatus::Unauthorized) => unauthorized(realm, "authentication required"),
        (_, RejectionStatus::Forbidden) => json_error(
            StatusCode::FORBIDDEN,
            "forbidden",
            AccessDenied::Forbidden.to_string(),
        ),
    }
}
