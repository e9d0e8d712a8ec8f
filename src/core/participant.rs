use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a trip participant.
///
/// Identifiers are opaque strings, unique within a trip. Their ordering is
/// the lexicographic order used to break ties during settlement.
///
/// # Examples
///
/// ```
/// use trip_settle::core::participant::ParticipantId;
///
/// let alice = ParticipantId::new("alice");
/// let bob = ParticipantId::new("bob");
/// assert_ne!(alice, bob);
/// assert!(alice < bob);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(String);

impl ParticipantId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ParticipantId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ParticipantId {
    fn from(s: String) -> Self {
        Self(s)
    }
}
