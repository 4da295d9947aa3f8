//! Normalized request paths.
//!
//! Normalization itself happens at the transport boundary. This type only
//! checks that the boundary did its job, so the decision engine can match
//! segment-by-segment without re-deriving anything.

use crate::error::DomainError;
use crate::value_object::ValueObject;

/// An absolute, normalized request path.
///
/// # Invariants
/// - starts with `/`
/// - carries no query string or fragment
/// - contains no empty, `.` or `..` segments (the root `/` is the only path
///   with zero segments)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestPath(String);

impl RequestPath {
    /// Accept a path that the caller has already normalized.
    pub fn from_normalized(raw: impl Into<String>) -> Result<Self, DomainError> {
        let raw = raw.into();

        if !raw.starts_with('/') {
            return Err(DomainError::validation(format!(
                "path must be absolute: {raw:?}"
            )));
        }
        if raw.contains(['?', '#']) {
            return Err(DomainError::validation(format!(
                "path must not carry a query or fragment: {raw:?}"
            )));
        }
        if raw == "/" {
            return Ok(Self(raw));
        }

        for segment in raw[1..].split('/') {
            match segment {
                "" => {
                    return Err(DomainError::validation(format!(
                        "path has an empty segment: {raw:?}"
                    )));
                }
                "." | ".." => {
                    return Err(DomainError::validation(format!(
                        "path has an unresolved dot segment: {raw:?}"
                    )));
                }
                _ => {}
            }
        }

        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Non-empty segments in order. The root yields nothing.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|s| !s.is_empty())
    }
}

impl ValueObject for RequestPath {}

impl core::fmt::Display for RequestPath {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_normalized_paths() {
        for p in ["/", "/health", "/api/user/x", "/a/b.txt", "/a/..b"] {
            assert!(RequestPath::from_normalized(p).is_ok(), "{p}");
        }
    }

    #[test]
    fn rejects_unnormalized_paths() {
        for p in ["", "api", "/a//b", "/a/", "/a/./b", "/a/../b", "/a?x=1", "/a#f"] {
            assert!(RequestPath::from_normalized(p).is_err(), "{p}");
        }
    }

    #[test]
    fn segments_skip_root() {
        assert_eq!(RequestPath::from_normalized("/").unwrap().segments().count(), 0);

        let p = RequestPath::from_normalized("/api/admin/x").unwrap();
        assert_eq!(p.segments().collect::<Vec<_>>(), vec!["api", "admin", "x"]);
    }
}
