//! Application-level errors (wraps domain errors)

use thiserror::Error;

use crate::domain::DomainError;

/// Application errors wrap domain errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("config error: {message}")]
    Config { message: String },

    #[error("token mismatch in {model}: expected {expected:?}, found {found:?}")]
    TokenMismatch {
        model: String,
        expected: String,
        found: Option<String>,
    },

    #[error("hosted environment {env_name} failed")]
    HostedEnvironmentFailed {
        env_name: String,
        #[source]
        source: Box<ApplicationError>,
    },

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ApplicationError {
    /// True if this error escaped from inside a hosted environment scope.
    pub fn is_hosted_failure(&self) -> bool {
        matches!(self, ApplicationError::HostedEnvironmentFailed { .. })
    }
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
