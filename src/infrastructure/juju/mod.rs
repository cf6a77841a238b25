//! Orchestration client backed by the `juju` command line

mod status;

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, instrument};

pub use status::{ApplicationStatus, MachineStatus, ModelStatus, StatusInfo, UnitStatus};

use crate::domain::SoftDeadline;
use crate::infrastructure::traits::{BootstrapRequest, CommandRunner, ModelClient};
use crate::infrastructure::{InfraError, InfraResult};

/// Environment variable carrying developer feature flags.
pub const FEATURE_FLAGS_VAR: &str = "JUJU_DEV_FEATURE_FLAGS";

/// Feature flag enabling hosted models on older binaries.
pub const JES_FEATURE_FLAG: &str = "jes";

/// Options shared by every client derived from the same invocation.
#[derive(Debug, Clone)]
pub struct JujuOptions {
    pub juju_bin: String,
    pub debug: bool,
    pub controller: String,
    pub model: String,
    pub deadline: SoftDeadline,
    pub poll_interval: Duration,
}

/// `ModelClient` that shells out to the juju binary.
#[derive(Clone)]
pub struct JujuClient {
    runner: Arc<dyn CommandRunner>,
    options: JujuOptions,
    feature_flags: Vec<String>,
}

impl std::fmt::Debug for JujuClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JujuClient")
            .field("options", &self.options)
            .field("feature_flags", &self.feature_flags)
            .finish()
    }
}

impl JujuClient {
    pub fn new(runner: Arc<dyn CommandRunner>, options: JujuOptions) -> Self {
        Self {
            runner,
            options,
            feature_flags: Vec::new(),
        }
    }

    /// Same binary and controller, scoped to another model.
    pub fn for_model(&self, model: &str) -> Self {
        let mut client = self.clone();
        client.options.model = model.to_string();
        client
    }

    pub fn feature_flags(&self) -> &[String] {
        &self.feature_flags
    }

    fn model_ref(&self) -> String {
        format!("{}:{}", self.options.controller, self.options.model)
    }

    /// Run `juju <command> [--debug] <args>` and return stdout.
    fn juju_output(&self, command: &str, args: &[&str]) -> InfraResult<String> {
        let mut argv: Vec<&str> = vec![command];
        if self.options.debug {
            argv.push("--debug");
        }
        argv.extend_from_slice(args);

        let flags = self.feature_flags.join(",");
        let env: Vec<(&str, &str)> = if flags.is_empty() {
            Vec::new()
        } else {
            vec![(FEATURE_FLAGS_VAR, flags.as_str())]
        };

        debug!("juju_output: {} {}", self.options.juju_bin, argv.join(" "));
        let output = self
            .runner
            .run_with_env(&self.options.juju_bin, &argv, &env)
            .map_err(|e| {
                InfraError::io(format!("run {} {}", self.options.juju_bin, command), e)
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(InfraError::Juju {
                command: command.to_string(),
                message: stderr.trim().to_string(),
                exit_code: output.status.code(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Run a command scoped to this client's model.
    fn model_output(&self, command: &str, args: &[&str]) -> InfraResult<String> {
        let model = self.model_ref();
        let mut scoped: Vec<&str> = vec!["-m", model.as_str()];
        scoped.extend_from_slice(args);
        self.juju_output(command, &scoped)
    }

    pub fn model_status(&self) -> InfraResult<ModelStatus> {
        let json = self.model_output("status", &["--format", "json"])?;
        ModelStatus::parse(&json)
    }
}

impl ModelClient for JujuClient {
    fn model_name(&self) -> &str {
        &self.options.model
    }

    fn controller_name(&self) -> &str {
        &self.options.controller
    }

    fn is_jes_enabled(&self) -> InfraResult<bool> {
        let commands = self.juju_output("help", &["commands"])?;
        Ok(commands
            .lines()
            .any(|line| line.split_whitespace().next() == Some("add-model")))
    }

    fn enable_jes(&mut self) -> InfraResult<()> {
        if self.is_jes_enabled()? {
            return Ok(());
        }
        if !self.feature_flags.iter().any(|f| f == JES_FEATURE_FLAG) {
            self.feature_flags.push(JES_FEATURE_FLAG.to_string());
        }
        if !self.is_jes_enabled()? {
            return Err(InfraError::JesNotSupported {
                juju_bin: self.options.juju_bin.clone(),
            });
        }
        Ok(())
    }

    #[instrument(skip(self), fields(controller = %self.options.controller))]
    fn bootstrap(&self, request: &BootstrapRequest) -> InfraResult<()> {
        let config: Vec<String> = request
            .config
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect();

        let mut args: Vec<&str> = vec![
            request.cloud.as_str(),
            self.options.controller.as_str(),
            "--default-model",
            request.default_model.as_str(),
        ];
        if let Some(series) = &request.series {
            args.extend(["--bootstrap-series", series.as_str()]);
        }
        if let Some(constraints) = &request.constraints {
            args.extend(["--constraints", constraints.as_str()]);
        }
        for kv in &config {
            args.extend(["--config", kv.as_str()]);
        }
        self.juju_output("bootstrap", &args).map(|_| ())
    }

    fn add_machine(&self, host: &str) -> InfraResult<()> {
        let target = format!("ssh:{host}");
        self.model_output("add-machine", &[target.as_str()]).map(|_| ())
    }

    fn kill_controller(&self) -> InfraResult<()> {
        self.juju_output("kill-controller", &[self.options.controller.as_str(), "-y"])
            .map(|_| ())
    }

    fn add_model(&self, name: &str) -> InfraResult<Box<dyn ModelClient>> {
        self.juju_output("add-model", &["-c", self.options.controller.as_str(), name])?;
        Ok(Box::new(self.for_model(name)))
    }

    fn destroy_model(&self) -> InfraResult<()> {
        let model = self.model_ref();
        self.juju_output("destroy-model", &[model.as_str(), "-y"])
            .map(|_| ())
    }

    fn deploy(&self, charm: &str, series: &str) -> InfraResult<()> {
        self.model_output("deploy", &[charm, "--series", series])
            .map(|_| ())
    }

    fn add_relation(&self, first: &str, second: &str) -> InfraResult<()> {
        self.model_output("add-relation", &[first, second]).map(|_| ())
    }

    fn expose(&self, application: &str) -> InfraResult<()> {
        self.model_output("expose", &[application]).map(|_| ())
    }

    #[instrument(skip(self), fields(model = %self.options.model))]
    fn wait_for_started(&self, timeout: Duration) -> InfraResult<()> {
        let start = Instant::now();
        loop {
            let status = self.model_status()?;
            let errored = status.errored();
            if !errored.is_empty() {
                return Err(InfraError::Juju {
                    command: "status".into(),
                    message: format!("units in error: {}", errored.join(", ")),
                    exit_code: None,
                });
            }
            let pending = status.pending();
            if pending.is_empty() {
                return Ok(());
            }
            if start.elapsed() >= timeout {
                return Err(InfraError::Timeout {
                    what: format!("{} to start ({})", self.options.model, pending.join(", ")),
                    waited: timeout,
                });
            }
            self.check_deadline()?;
            debug!("wait_for_started: pending={:?}", pending);
            thread::sleep(self.options.poll_interval);
        }
    }

    fn set_config(&self, application: &str, key: &str, value: &str) -> InfraResult<()> {
        let setting = format!("{key}={value}");
        self.model_output("config", &[application, setting.as_str()])
            .map(|_| ())
    }

    fn workload_message(&self, unit: &str) -> InfraResult<Option<String>> {
        let status = self.model_status()?;
        Ok(status.unit(unit).and_then(|u| u.workload.message.clone()))
    }

    fn status_text(&self) -> InfraResult<String> {
        self.model_output("status", &["--format", "tabular"])
    }

    fn debug_log(&self) -> InfraResult<String> {
        self.model_output("debug-log", &["--replay", "--no-tail"])
    }

    fn check_deadline(&self) -> InfraResult<()> {
        self.options
            .deadline
            .check()
            .map_err(|e| InfraError::SoftDeadlineExceeded(e.to_string()))
    }
}
