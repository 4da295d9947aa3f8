//! Request path normalization (boundary side of the `RequestPath` contract).

use gatehouse_core::{DomainError, RequestPath};

/// Encoded sequences that could smuggle a separator or dot segment past
/// normalization.
const FORBIDDEN_ENCODINGS: [&str; 4] = ["%2e", "%2f", "%5c", "%00"];

/// Turn a raw URI path into a [`RequestPath`].
///
/// Drops any query or fragment, collapses repeated `/`, removes `.` and
/// resolves `..` (never above the root). Backslashes and encoded separators
/// or dots are refused rather than guessed at.
pub fn normalize_path(raw: &str) -> Result<RequestPath, DomainError> {
    let path = raw.split(['?', '#']).next().unwrap_or_default();

    if path.contains('\\') {
        return Err(DomainError::validation("path contains a backslash"));
    }
    let lower = path.to_ascii_lowercase();
    if FORBIDDEN_ENCODINGS.iter().any(|enc| lower.contains(enc)) {
        return Err(DomainError::validation("path contains an encoded separator or dot"));
    }

    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }

    RequestPath::from_normalized(format!("/{}", segments.join("/")))
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn norm(p: &str) -> String {
        normalize_path(p).unwrap().as_str().to_string()
    }

    #[test]
    fn resolves_dot_segments() {
        assert_eq!(norm("/api/public/../admin/x"), "/api/admin/x");
        assert_eq!(norm("/api/./user//x/"), "/api/user/x");
        assert_eq!(norm("/../../etc"), "/etc");
        assert_eq!(norm(""), "/");
        assert_eq!(norm("/"), "/");
        assert_eq!(norm("//"), "/");
    }

    #[test]
    fn strips_query_and_fragment() {
        assert_eq!(norm("/api/user/x?y=1"), "/api/user/x");
        assert_eq!(norm("/api/user/x#frag"), "/api/user/x");
    }

    #[test]
    fn refuses_encoded_traversal() {
        for p in ["/api/public/%2e%2e/admin", "/api/public/..%2Fadmin", "/a\\b", "/a%00"] {
            assert!(normalize_path(p).is_err(), "{p}");
        }
    }

    proptest! {
        /// Property: whatever comes in, a successful result satisfies the
        /// `RequestPath` invariants and is a fixed point.
        #[test]
        fn output_is_normalized(raw in "[a-z./?#]{0,32}") {
            let out = normalize_path(&raw).unwrap();
            prop_assert!(RequestPath::from_normalized(out.as_str()).is_ok());
            prop_assert_eq!(normalize_path(out.as_str()).unwrap(), out);
        }
    }
}
