//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::HostedEnvPhase;

/// Domain errors represent violations of naming and lifecycle rules.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid model name: {name:?} ({reason})")]
    InvalidModelName { name: String, reason: String },

    #[error("invalid series: {0:?}")]
    InvalidSeries(String),

    #[error("invalid hosted environment transition: {from} -> {to}")]
    InvalidTransition {
        from: HostedEnvPhase,
        to: HostedEnvPhase,
    },

    #[error("soft deadline exceeded at {deadline}")]
    SoftDeadlineExceeded { deadline: String },
}
