//! Ant-style path patterns (`/api/admin/**`, `/files/*/meta`, `**`).

use gatehouse_core::RequestPath;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid path pattern '{pattern}': {reason}")]
pub struct PatternError {
    pub pattern: String,
    pub reason: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    /// `*`: exactly one segment.
    Any,
}

impl Segment {
    fn matches(&self, candidate: &str) -> bool {
        match self {
            Segment::Literal(lit) => lit == candidate,
            Segment::Any => true,
        }
    }
}

/// Rank used to order patterns from most to least specific.
///
/// Compared field by field: more literal segments first, then longer
/// patterns, then exact before prefix (`/**`) patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Specificity {
    literals: usize,
    segments: usize,
    exact: bool,
}

/// A compiled path pattern.
///
/// - `**` / `/**` match every path
/// - `/a/b/**` matches `/a/b` and everything below it
/// - `*` matches exactly one whole segment
/// - anything else matches literally (case-sensitive)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
    prefix: bool,
}

impl PathPattern {
    pub fn parse(raw: &str) -> Result<Self, PatternError> {
        let err = |reason| PatternError {
            pattern: raw.to_string(),
            reason,
        };

        if raw == "**" || raw == "/**" {
            return Ok(Self {
                raw: raw.to_string(),
                segments: Vec::new(),
                prefix: true,
            });
        }
        let Some(body) = raw.strip_prefix('/') else {
            return Err(err("pattern must start with '/'"));
        };
        if body.is_empty() {
            return Ok(Self {
                raw: raw.to_string(),
                segments: Vec::new(),
                prefix: false,
            });
        }

        let parts: Vec<&str> = body.split('/').collect();
        let last = parts.len() - 1;
        let mut segments = Vec::with_capacity(parts.len());
        let mut prefix = false;

        for (i, part) in parts.into_iter().enumerate() {
            match part {
                "" => return Err(err("pattern has an empty segment")),
                "**" if i == last => prefix = true,
                "**" => return Err(err("'**' is only allowed as the last segment")),
                "*" => segments.push(Segment::Any),
                p if p.contains('*') => {
                    return Err(err("wildcards must span a whole segment"));
                }
                p => segments.push(Segment::Literal(p.to_string())),
            }
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
            prefix,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Matches every possible path.
    pub fn is_catch_all(&self) -> bool {
        self.prefix && self.segments.is_empty()
    }

    pub fn matches(&self, path: &RequestPath) -> bool {
        let mut candidate = path.segments();
        for seg in &self.segments {
            match candidate.next() {
                Some(s) if seg.matches(s) => {}
                _ => return false,
            }
        }
        self.prefix || candidate.next().is_none()
    }

    pub fn specificity(&self) -> Specificity {
        Specificity {
            literals: self
                .segments
                .iter()
                .filter(|s| matches!(s, Segment::Literal(_)))
                .count(),
            segments: self.segments.len(),
            exact: !self.prefix,
        }
    }
}

impl core::fmt::Display for PathPattern {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.raw)
    }
}
