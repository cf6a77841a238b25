//! I/O boundary traits for testability
//!
//! These traits abstract external I/O operations, allowing services
//! to be tested with mock implementations.

use std::io;
use std::path::Path;
use std::process::Output;
use std::time::Duration;

use crate::infrastructure::InfraResult;

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Write string content to file.
    fn write(&self, path: &Path, content: &str) -> io::Result<()>;

    /// Check if path is a directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Create directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;
}

/// External command runner abstraction.
pub trait CommandRunner: Send + Sync {
    /// Run a command with arguments and extra environment variables.
    fn run_with_env(&self, cmd: &str, args: &[&str], env: &[(&str, &str)]) -> io::Result<Output>;
}

/// Everything needed to bootstrap a controller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BootstrapRequest {
    /// Cloud, optionally with region: `aws/us-east-1`, `manual/10.0.0.2`
    pub cloud: String,
    /// Model created alongside the controller
    pub default_model: String,
    /// Bootstrap series (controller machine)
    pub series: Option<String>,
    pub constraints: Option<String>,
    /// Extra `--config key=value` pairs (agent-metadata-url, agent-stream, ...)
    pub config: Vec<(String, String)>,
}

/// Capability for one orchestrated model (base or hosted).
///
/// Controller-level operations act on the controller the model lives in.
pub trait ModelClient {
    /// Model this client is scoped to.
    fn model_name(&self) -> &str;

    /// Controller hosting the model.
    fn controller_name(&self) -> &str;

    /// Whether the binary supports hosted models.
    fn is_jes_enabled(&self) -> InfraResult<bool>;

    /// Turn on hosted-model support for all subsequent commands.
    fn enable_jes(&mut self) -> InfraResult<()>;

    fn bootstrap(&self, request: &BootstrapRequest) -> InfraResult<()>;

    /// Enrol an existing machine (`ssh:host`) in the model.
    fn add_machine(&self, host: &str) -> InfraResult<()>;

    /// Tear down the controller and everything in it.
    fn kill_controller(&self) -> InfraResult<()>;

    /// Create a hosted model and return a client scoped to it.
    fn add_model(&self, name: &str) -> InfraResult<Box<dyn ModelClient>>;

    fn destroy_model(&self) -> InfraResult<()>;

    fn deploy(&self, charm: &str, series: &str) -> InfraResult<()>;

    fn add_relation(&self, first: &str, second: &str) -> InfraResult<()>;

    fn expose(&self, application: &str) -> InfraResult<()>;

    /// Block until machines and unit agents have settled.
    fn wait_for_started(&self, timeout: Duration) -> InfraResult<()>;

    fn set_config(&self, application: &str, key: &str, value: &str) -> InfraResult<()>;

    /// Workload status message of a unit, if it reports one.
    fn workload_message(&self, unit: &str) -> InfraResult<Option<String>>;

    /// Human-readable status of the model.
    fn status_text(&self) -> InfraResult<String>;

    /// Replayed debug log of the model.
    fn debug_log(&self) -> InfraResult<String>;

    /// Fail once the soft deadline has passed.
    fn check_deadline(&self) -> InfraResult<()> {
        Ok(())
    }
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        std::fs::write(path, content)
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }
}

/// Real command runner implementation.
#[derive(Debug, Default)]
pub struct RealCommandRunner;

impl CommandRunner for RealCommandRunner {
    fn run_with_env(
        &self,
        cmd: &str,
        args: &[&str],
        env: &[(&str, &str)],
    ) -> io::Result<Output> {
        std::process::Command::new(cmd)
            .args(args)
            .envs(env.iter().copied())
            .output()
    }
}
