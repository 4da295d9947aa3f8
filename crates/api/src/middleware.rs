use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use base64::{Engine as _, engine::general_purpose::STANDARD};

use gatehouse_auth::{Credentials, Gatekeeper, Secret};

use crate::app::errors;
use crate::context::PrincipalContext;
use crate::normalize::normalize_path;

#[derive(Clone)]
pub struct AuthState {
    pub gatekeeper: Arc<Gatekeeper>,
    pub realm: Arc<str>,
}

/// Authenticate (HTTP Basic) and authorize every request before routing.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let path = match normalize_path(req.uri().path()) {
        Ok(path) => path,
        Err(e) => {
            tracing::info!(error = %e, "request rejected: unacceptable path");
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_path", e.to_string());
        }
    };

    let credentials = match extract_basic(req.headers()) {
        Ok(credentials) => credentials,
        Err(reason) => {
            tracing::info!(
                path = %path,
                reason,
                "request rejected: malformed authorization header"
            );
            return errors::bad_credentials(&state.realm);
        }
    };

    match state.gatekeeper.admit(credentials.as_ref(), &path) {
        Ok(principal) => {
            tracing::debug!(path = %path, principal = %principal, "request admitted");
            req.extensions_mut().insert(PrincipalContext::new(principal));
            next.run(req).await
        }
        Err(rejection) => {
            tracing::info!(
                path = %path,
                status = ?rejection.status(),
                reason = %rejection,
                "request rejected"
            );
            errors::rejection_response(rejection, &state.realm)
        }
    }
}

/// Parse `Authorization: Basic <base64(username:secret)>`.
///
/// No header, or a header with another scheme, means no credentials. A Basic
/// header that cannot be decoded is an error. The secret is passed on as raw
/// bytes; only the username has to be UTF-8.
fn extract_basic(headers: &HeaderMap) -> Result<Option<Credentials>, &'static str> {
    let Some(header) = headers.get(axum::http::header::AUTHORIZATION) else {
        return Ok(None);
    };

    let header = header.to_str().map_err(|_| "header is not visible ASCII")?.trim();

    let (scheme, token) = header.split_once(' ').unwrap_or((header, ""));
    if !scheme.eq_ignore_ascii_case("basic") {
        return Ok(None);
    }

    let token = token.trim();
    if token.is_empty() {
        return Err("empty basic token");
    }

    let decoded = STANDARD.decode(token).map_err(|_| "basic token is not base64")?;
    let colon = decoded
        .iter()
        .position(|&b| b == b':')
        .ok_or("basic token has no ':'")?;
    let (username, secret) = decoded.split_at(colon);
    let username = std::str::from_utf8(username).map_err(|_| "basic username is not UTF-8")?;

    Ok(Some(Credentials::new(username, Secret::new(&secret[1..]))))
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;
    use base64::Engine as _;

    use super::*;

    fn headers(value: &str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(axum::http::header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        h
    }

    fn basic(raw: impl AsRef<[u8]>) -> HeaderMap {
        headers(&format!("Basic {}", STANDARD.encode(raw)))
    }

    #[test]
    fn no_header_is_anonymous() {
        assert!(extract_basic(&HeaderMap::new()).unwrap().is_none());
    }

    #[test]
    fn other_schemes_are_ignored() {
        assert!(extract_basic(&headers("Bearer abc.def")).unwrap().is_none());
    }

    #[test]
    fn decodes_username_and_secret() {
        let creds = extract_basic(&basic("admin:admin123")).unwrap().unwrap();
        assert_eq!(creds.username, "admin");
        assert_eq!(creds.secret.expose(), b"admin123");
    }

    #[test]
    fn secret_may_contain_colons() {
        let creds = extract_basic(&basic("user:a:b:c")).unwrap().unwrap();
        assert_eq!(creds.username, "user");
        assert_eq!(creds.secret.expose(), b"a:b:c");
    }

    #[test]
    fn secret_bytes_need_not_be_utf8() {
        let creds = extract_basic(&basic(b"user:\xff\xfe\x00")).unwrap().unwrap();
        assert_eq!(creds.username, "user");
        assert_eq!(creds.secret.expose(), b"\xff\xfe\x00");

        let creds = extract_basic(&basic(b"user:")).unwrap().unwrap();
        assert!(creds.secret.expose().is_empty());
    }

    #[test]
    fn username_must_be_utf8() {
        assert!(extract_basic(&basic(b"\xffuser:secret")).is_err());
    }

    #[test]
    fn scheme_is_case_insensitive() {
        let value = format!("bAsIc {}", STANDARD.encode("user:user123"));
        assert!(extract_basic(&headers(&value)).unwrap().is_some());
    }

    #[test]
    fn malformed_basic_tokens_are_errors() {
        assert!(extract_basic(&headers("Basic")).is_err());
        assert!(extract_basic(&headers("Basic !!!")).is_err());
        assert!(extract_basic(&basic("no-colon")).is_err());
    }
}
