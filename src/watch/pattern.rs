//! Glob filters over slash-delimited keys.

use crate::error::{Result, VaultError};
use regex::Regex;

/// A compiled subscription filter.
///
/// Grammar, evaluated against a `/`-delimited key:
/// - a literal segment matches itself exactly,
/// - `*` matches within a single segment (never crosses a `/`),
/// - `**` matches any number of complete segments.
///
/// Matches are anchored at both ends and case-sensitive.
///
/// # Examples
///
/// ```rust
/// use config_vault::watch::KeyPattern;
///
/// let pattern = KeyPattern::compile("production/*/host").unwrap();
/// assert!(pattern.matches("production/database/host"));
/// assert!(!pattern.matches("production/database/nested/host"));
/// ```
#[derive(Debug, Clone)]
pub struct KeyPattern {
    pattern: String,
    regex: Regex,
}

impl KeyPattern {
    /// Compile a filter pattern into an anchored matcher.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::InvalidPattern`] when the translated pattern
    /// is rejected by the regex engine.
    pub fn compile(pattern: &str) -> Result<Self> {
        let translated = format!(
            "^{}$",
            regex::escape(pattern)
                .replace(r"\*\*", ".*")
                .replace(r"\*", "[^/]*")
        );

        let regex = Regex::new(&translated).map_err(|e| VaultError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            pattern: pattern.to_string(),
            regex,
        })
    }

    /// Whether the given key matches this filter.
    pub fn matches(&self, key: &str) -> bool {
        self.regex.is_match(key)
    }

    /// The filter string as supplied at compile time.
    pub fn as_str(&self) -> &str {
        &self.pattern
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_segment_wildcard() {
        let pattern = KeyPattern::compile("production/*/host").unwrap();
        assert!(pattern.matches("production/database/host"));
        assert!(!pattern.matches("production/database/nested/host"));
        assert!(!pattern.matches("staging/database/host"));
    }

    #[test]
    fn test_multi_segment_wildcard() {
        let pattern = KeyPattern::compile("production/**").unwrap();
        assert!(pattern.matches("production/cache/redis/url"));
        assert!(pattern.matches("production/timeout"));
        assert!(!pattern.matches("staging/anything"));
    }

    #[test]
    fn test_leading_wildcard() {
        let pattern = KeyPattern::compile("*/database/host").unwrap();
        assert!(pattern.matches("production/database/host"));
        assert!(pattern.matches("staging/database/host"));
        assert!(!pattern.matches("production/cache/host"));
    }

    #[test]
    fn test_literal_pattern() {
        let pattern = KeyPattern::compile("production/timeout").unwrap();
        assert!(pattern.matches("production/timeout"));
        assert!(!pattern.matches("production/timeouts"));
        assert!(!pattern.matches("a/production/timeout"));
    }

    #[test]
    fn test_match_is_anchored() {
        let pattern = KeyPattern::compile("database").unwrap();
        assert!(!pattern.matches("production/database"));
        assert!(!pattern.matches("database/host"));
        assert!(pattern.matches("database"));
    }

    #[test]
    fn test_match_is_case_sensitive() {
        let pattern = KeyPattern::compile("Production/*").unwrap();
        assert!(!pattern.matches("production/timeout"));
        assert!(pattern.matches("Production/timeout"));
    }

    #[test]
    fn test_regex_metacharacters_are_literal() {
        let pattern = KeyPattern::compile("production/a.b+c").unwrap();
        assert!(pattern.matches("production/a.b+c"));
        assert!(!pattern.matches("production/aXbbc"));
    }

    #[test]
    fn test_as_str_preserves_source() {
        let pattern = KeyPattern::compile("production/**").unwrap();
        assert_eq!(pattern.as_str(), "production/**");
    }
}
