//! Token shapes accumulated over time.
//!
//! Current tokens are opaque random strings. Legacy tokens were issued as
//! `{uuid}-{timestamp}` and the stored copy was truncated to 40 characters,
//! so a stored token may be a strict prefix of what the client presents.

use serde::Serialize;

/// Segments of a hyphenated UUID (8-4-4-4-12)
pub const UUID_SEGMENTS: usize = 5;

/// How a stored token was matched to the requested one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchRule {
    /// Stored token equals the requested token
    Exact,
    /// Stored token equals the UUID part of the requested token
    UuidExact,
    /// Stored token is a truncated prefix of the requested token
    StoredPrefix,
    /// Stored token starts with the UUID part and carries a suffix
    UuidPrefix,
}

/// First five hyphen-delimited segments re-joined with hyphens.
/// Tokens with fewer segments come back whole.
pub fn uuid_part(token: &str) -> String {
    token.split('-').take(UUID_SEGMENTS).collect::<Vec<_>>().join("-")
}

/// A hyphen is required for any legacy format
pub fn is_fallback_eligible(token: &str) -> bool {
    token.contains('-')
}

/// Legacy predicate for one requested token, reused across a whole scan
#[derive(Debug, Clone)]
pub struct LegacyMatcher<'a> {
    requested: &'a str,
    uuid_part: String,
}

impl<'a> LegacyMatcher<'a> {
    pub fn new(requested: &'a str) -> Self {
        Self { requested, uuid_part: uuid_part(requested) }
    }

    pub fn uuid_part(&self) -> &str {
        &self.uuid_part
    }

    /// Empty stored tokens never match; every requested token starts with "".
    pub fn matches(&self, stored: &str) -> Option<MatchRule> {
        if stored.is_empty() {
            None
        } else if stored == self.uuid_part {
            Some(MatchRule::UuidExact)
        } else if self.requested.starts_with(stored) {
            Some(MatchRule::StoredPrefix)
        } else if stored.starts_with(self.uuid_part.as_str()) {
            Some(MatchRule::UuidPrefix)
        } else {
            None
        }
    }
}

pub fn legacy_match(requested: &str, stored: &str) -> Option<MatchRule> {
    LegacyMatcher::new(requested).matches(stored)
}
