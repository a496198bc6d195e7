use thiserror::Error;

/// Failures reported by tree commands and snapshot loading.
///
/// Every variant leaves the tree untouched: a rejected command is a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// Name was empty or whitespace only
    #[error("{kind} name must not be empty")]
    InvalidName { kind: &'static str },

    #[error("structure '{0}' not found")]
    UnknownStructure(String),

    #[error("goal '{goal}' not found in structure '{structure}'")]
    UnknownGoal { structure: String, goal: String },

    #[error("malformed snapshot: {0}")]
    MalformedSnapshot(String),
}

impl TreeError {
    /// True for stale references (selection outlived a clear, etc.)
    pub fn is_unknown_reference(&self) -> bool {
        matches!(self, TreeError::UnknownStructure(_) | TreeError::UnknownGoal { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = TreeError::InvalidName { kind: "structure" };
        assert_eq!(err.to_string(), "structure name must not be empty");

        let err = TreeError::UnknownGoal {
            structure: "s-1".to_string(),
            goal: "g-9".to_string(),
        };
        assert!(err.to_string().contains("g-9"));
        assert!(err.is_unknown_reference());
    }

    #[test]
    fn test_invalid_name_is_not_reference_error() {
        assert!(!TreeError::InvalidName { kind: "goal" }.is_unknown_reference());
        assert!(TreeError::UnknownStructure("x".into()).is_unknown_reference());
    }
}
