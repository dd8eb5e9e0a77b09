//! Common types for the pattern harness.

use serde::{Deserialize, Serialize};

/// Identity of a participant: the pattern it belongs to and its variant.
///
/// Scripts refer to participants only through keys, never through object
/// references, so a script can be replayed against any compatible registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ParticipantKey {
    /// Pattern name (e.g. "shipping")
    pub pattern: String,

    /// Variant name within the pattern (e.g. "distance")
    pub variant: String,
}

impl ParticipantKey {
    /// Creates a key from a pattern and a variant name.
    pub fn new(pattern: impl Into<String>, variant: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            variant: variant.into(),
        }
    }
}

impl std::fmt::Display for ParticipantKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.pattern, self.variant)
    }
}

impl From<(&str, &str)> for ParticipantKey {
    fn from((pattern, variant): (&str, &str)) -> Self {
        Self::new(pattern, variant)
    }
}

impl std::str::FromStr for ParticipantKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('.') {
            Some((pattern, variant)) if !pattern.is_empty() && !variant.is_empty() => {
                Ok(Self::new(pattern, variant))
            }
            _ => Err(format!("Invalid participant key: {} (expected pattern.variant)", s)),
        }
    }
}
