//! Infrastructure-level errors (wraps application errors)

use std::time::Duration;

use thiserror::Error;

use crate::application::ApplicationError;

/// Infrastructure errors wrap application errors and add I/O-level concerns.
#[derive(Error, Debug)]
pub enum InfraError {
    #[error(transparent)]
    Application(#[from] ApplicationError),

    #[error("I/O error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("juju {command} failed: {message}")]
    Juju {
        command: String,
        message: String,
        exit_code: Option<i32>,
    },

    #[error("timed out after {waited:?} waiting for {what}")]
    Timeout { what: String, waited: Duration },

    #[error("soft deadline exceeded: {0}")]
    SoftDeadlineExceeded(String),

    #[error("hosted models are not supported by {juju_bin}")]
    JesNotSupported { juju_bin: String },

    #[error("cannot parse status: {message}")]
    StatusParse { message: String },
}

impl InfraError {
    /// Create an I/O error with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

/// Result type for infrastructure layer operations.
pub type InfraResult<T> = Result<T, InfraError>;
