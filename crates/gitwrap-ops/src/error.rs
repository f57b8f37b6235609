//! Error types for gitwrap operations.

use thiserror::Error;

/// Errors that can occur while building or running a git command.
#[derive(Debug, Error)]
pub enum GitOpsError {
    /// The requested options cannot be expressed as a safe command line.
    #[error("Invalid option: {message}")]
    InvalidOption { message: String },

    /// git ran and exited with a nonzero status.
    #[error("git {command} failed with exit code {exit_code}: {output}")]
    ExecutionFailed {
        command: String,
        exit_code: i32,
        output: String,
    },

    /// The git binary could not be started.
    #[error("Failed to spawn git: {0}")]
    Spawn(#[from] std::io::Error),

    /// The requested tag does not exist in the repository.
    #[error("Tag not found: {0}")]
    TagNotFound(String),

    /// git output did not have the expected shape.
    #[error("Failed to parse git output: {message}")]
    Parse { message: String },
}

impl GitOpsError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidOption {
            message: message.into(),
        }
    }

    /// Exit code reported by git, if the error came from a finished process.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::ExecutionFailed { exit_code, .. } => Some(*exit_code),
            _ => None,
        }
    }
}

/// Result type for gitwrap operations.
pub type GitOpsResult<T> = Result<T, GitOpsError>;
