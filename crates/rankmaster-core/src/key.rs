//! Normalized site identifiers.
//!
//! A [`SiteKey`] is the only key used by the report cache and the history
//! list. It can only be built through [`SiteKey::normalize`], so every
//! boundary that accepts user input goes through the same lower-case + trim
//! rule.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lower-cased, trimmed form of a user-entered site identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SiteKey(String);

impl SiteKey {
    /// Normalize raw input into a key.
    ///
    /// Returns `None` when nothing but whitespace remains.
    ///
    /// ```rust
    /// use rankmaster_core::SiteKey;
    ///
    /// let key = SiteKey::normalize("  Example.COM ").unwrap();
    /// assert_eq!(key.as_str(), "example.com");
    /// assert!(SiteKey::normalize(" \t ").is_none());
    /// ```
    pub fn normalize(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_lowercase();
        if normalized.is_empty() {
            None
        } else {
            Some(Self(normalized))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SiteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl AsRef<str> for SiteKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_and_whitespace_variants_share_a_key() {
        let variants = [
            "example.com",
            "Example.com",
            "EXAMPLE.COM",
            "  example.com",
            "example.com \n",
            "\tExAmPlE.CoM  ",
        ];
        let expected = SiteKey::normalize("example.com").unwrap();
        for v in variants {
            assert_eq!(SiteKey::normalize(v).unwrap(), expected, "variant {:?}", v);
        }
    }

    #[test]
    fn normalizing_twice_is_a_no_op() {
        let once = SiteKey::normalize(" Site.Com ").unwrap();
        let twice = SiteKey::normalize(once.as_str()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn blank_input_has_no_key() {
        assert!(SiteKey::normalize("").is_none());
        assert!(SiteKey::normalize("   ").is_none());
    }

    #[test]
    fn inner_whitespace_is_kept() {
        let key = SiteKey::normalize(" My Site ").unwrap();
        assert_eq!(key.as_str(), "my site");
    }

    #[test]
    fn serializes_as_plain_string() {
        let key = SiteKey::normalize("Example.com").unwrap();
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"example.com\"");
    }
}
