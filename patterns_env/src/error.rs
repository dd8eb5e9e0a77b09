//! Error types for the pattern harness.

use crate::types::ParticipantKey;
use thiserror::Error;

/// Errors raised by the registry, the script builder and the runner.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// No binding exists for the requested (pattern, variant)
    #[error("Participant not found: {0}")]
    NotFound(ParticipantKey),

    /// A built script was modified
    #[error("Script '{0}' is already built and cannot be modified")]
    Immutable(String),

    /// A variant declared a different capability than its pattern's other variants
    #[error("Capability mismatch for pattern '{pattern}': registered as {existing}, got {requested}")]
    CapabilityMismatch {
        pattern: String,
        existing: &'static str,
        requested: &'static str,
    },

    /// The method is not part of the participant's declared capability
    #[error("{key} does not support method '{method}' (capability {capability})")]
    UnsupportedMethod {
        key: ParticipantKey,
        method: String,
        capability: &'static str,
    },

    /// A participant method faulted
    #[error("{key} faulted: {fault}")]
    Participant {
        key: ParticipantKey,
        fault: ParticipantFault,
    },

    /// The script asks for something no registry can satisfy (e.g. asserting
    /// a result before anything was invoked)
    #[error("Invalid script: {0}")]
    InvalidScript(String),

    /// Writing or encoding an export failed
    #[error("Export error: {0}")]
    Export(String),
}

impl HarnessError {
    /// Creates a not-found error.
    pub fn not_found(key: &ParticipantKey) -> Self {
        Self::NotFound(key.clone())
    }

    /// Creates an immutability error for a named script.
    pub fn immutable(script: impl Into<String>) -> Self {
        Self::Immutable(script.into())
    }

    /// Creates an invalid-script error.
    pub fn invalid_script(msg: impl Into<String>) -> Self {
        Self::InvalidScript(msg.into())
    }

    /// Wraps a participant fault with the key of the participant that raised it.
    pub fn participant(key: &ParticipantKey, fault: ParticipantFault) -> Self {
        Self::Participant {
            key: key.clone(),
            fault,
        }
    }
}

impl From<serde_json::Error> for HarnessError {
    fn from(err: serde_json::Error) -> Self {
        Self::Export(err.to_string())
    }
}

impl From<std::io::Error> for HarnessError {
    fn from(err: std::io::Error) -> Self {
        Self::Export(err.to_string())
    }
}

/// A fault raised by a participant method (precondition violation, bad argument).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ParticipantFault {
    message: String,
}

impl ParticipantFault {
    /// Creates a fault with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The participant has no method with this name.
    pub fn unknown_method(method: &str) -> Self {
        Self::new(format!("unknown method '{}'", method))
    }

    /// An argument was missing or of the wrong shape.
    pub fn bad_argument(index: usize, expected: &str) -> Self {
        Self::new(format!("argument {} must be {}", index, expected))
    }

    /// Returns the fault message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = HarnessError::not_found(&ParticipantKey::new("strategy", "unknown"));
        assert_eq!(err.to_string(), "Participant not found: strategy.unknown");
    }

    #[test]
    fn test_participant_fault_preserves_message() {
        let key = ParticipantKey::new("factory", "food");
        let err = HarnessError::participant(&key, ParticipantFault::new("no such dish: tofu"));
        assert_eq!(err.to_string(), "factory.food faulted: no such dish: tofu");
    }
}
