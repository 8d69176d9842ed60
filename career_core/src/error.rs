//! Engine error taxonomy.
//!
//! Every engine operation reports failures to its immediate caller.
//! Nothing is retried internally.

/// Failure reading a YAML catalog or configuration file
#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("Failed to read YAML file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(thiserror::Error, Debug)]
pub enum EngineError {
    /// Malformed profile, job, quiz or configuration values
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A referenced track, week, day, task or quiz does not exist
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// Quiz submitted while some questions are still unanswered
    #[error("Submission blocked: {} question(s) unanswered", .unanswered.len())]
    IncompleteSubmission { unanswered: Vec<usize> },

    #[error(transparent)]
    Load(#[from] LoadError),
}

impl EngineError {
    pub fn invalid(message: impl Into<String>) -> Self {
        EngineError::InvalidInput(message.into())
    }

    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        EngineError::NotFound {
            kind,
            id: id.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = EngineError::not_found("Task", "abc");
        assert_eq!(err.to_string(), "Task not found: abc");

        let err = EngineError::IncompleteSubmission {
            unanswered: vec![1, 3],
        };
        assert_eq!(
            err.to_string(),
            "Submission blocked: 2 question(s) unanswered"
        );
    }
}
