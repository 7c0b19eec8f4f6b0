use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a practice set.
///
/// Backed by a string because upstream content identifiers are opaque
/// API-issued strings, not integers.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SetId(String);

impl SetId {
    /// Creates a new `SetId`
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the underlying string value
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Unique identifier for a question within a practice set.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QuestionId(String);

impl QuestionId {
    /// Creates a new `QuestionId`
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the underlying string value
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Key identifying one option of a choice question (e.g. `"A"`, `"B"`).
///
/// Comparison is case-sensitive throughout; scoring relies on exact key
/// equality.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OptionKey(String);

impl OptionKey {
    /// Creates a new `OptionKey`
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the underlying string value
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SetId({})", self.0)
    }
}

impl fmt::Debug for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QuestionId({})", self.0)
    }
}

impl fmt::Debug for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OptionKey({})", self.0)
    }
}

// ─── Display Implementations ───────────────────────────────────────────────────

impl fmt::Display for SetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SetId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<&str> for QuestionId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<&str> for OptionKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_id_display_round_trips() {
        let id = SetId::new("dpp-42");
        assert_eq!(id.to_string(), "dpp-42");
        assert_eq!(SetId::new(id.to_string()), id);
    }

    #[test]
    fn question_id_preserves_value() {
        let id = QuestionId::new("q-001");
        assert_eq!(id.as_str(), "q-001");
    }

    #[test]
    fn option_keys_compare_case_sensitively() {
        assert_ne!(OptionKey::new("a"), OptionKey::new("A"));
        assert_eq!(OptionKey::new("B"), OptionKey::from("B"));
    }

    #[test]
    fn all_ids_convert_from_str() {
        assert_eq!(SetId::from("dpp-1"), SetId::new("dpp-1"));
        assert_eq!(QuestionId::from("q1"), QuestionId::new("q1"));
        assert_eq!(OptionKey::from("A"), OptionKey::new("A"));
    }
}
