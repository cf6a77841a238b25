//! Domain layer: names, tokens, deadlines and lifecycle rules
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod deadline;
pub mod entities;
pub mod error;
pub mod lifecycle;
pub mod token;

pub use deadline::SoftDeadline;
pub use entities::*;
pub use error::DomainError;
pub use lifecycle::{HostedEnvLifecycle, HostedEnvPhase};
pub use token::{env_token, parse_token_message, random_string};
