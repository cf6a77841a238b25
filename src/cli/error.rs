//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Infra(#[from] InfraError),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
}

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        CliError::Infra(InfraError::Application(e))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) => crate::exitcode::USAGE,
            CliError::Infra(e) => match e {
                InfraError::Application(app) => match app {
                    ApplicationError::HostedEnvironmentFailed { .. } => {
                        crate::exitcode::HOSTED_ENV_FAILURE
                    }
                    ApplicationError::Config { .. } => crate::exitcode::CONFIG,
                    _ => crate::exitcode::SOFTWARE,
                },
                InfraError::Io { .. } => crate::exitcode::IOERR,
                InfraError::Juju { .. }
                | InfraError::Timeout { .. }
                | InfraError::SoftDeadlineExceeded(_)
                | InfraError::JesNotSupported { .. }
                | InfraError::StatusParse { .. } => crate::exitcode::SOFTWARE,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainError;

    #[test]
    fn given_hosted_failure_when_mapping_exit_code_then_one() {
        let err: CliError = ApplicationError::HostedEnvironmentFailed {
            env_name: "ctrl-env1".into(),
            source: Box::new(ApplicationError::Config {
                message: "x".into(),
            }),
        }
        .into();
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_exit_codes_for_other_errors() {
        let config: CliError = ApplicationError::Config {
            message: "x".into(),
        }
        .into();
        assert_eq!(config.exit_code(), crate::exitcode::CONFIG);

        let domain: CliError =
            ApplicationError::Domain(DomainError::InvalidSeries("".into())).into();
        assert_eq!(domain.exit_code(), crate::exitcode::SOFTWARE);

        let usage = CliError::InvalidArgs("bad".into());
        assert_eq!(usage.exit_code(), crate::exitcode::USAGE);

        let io = CliError::Infra(InfraError::io(
            "create logs",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        ));
        assert_eq!(io.exit_code(), crate::exitcode::IOERR);
    }
}
