//! Scoped controller and hosted-model lifecycles
//!
//! Both scopes take the body as a closure: acquisition happens before the
//! body runs, release after it returns, so nested scopes unwind LIFO and
//! every release step runs whatever the body returned.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, error, info, instrument, warn};

use crate::application::error_ext::error_chain;
use crate::application::services::DiagnosticsService;
use crate::application::{ApplicationError, ApplicationResult, ClientResultExt};
use crate::config::EnvironmentConfig;
use crate::domain::{HostedEnvLifecycle, HostedEnvPhase, ModelName};
use crate::infrastructure::traits::{BootstrapRequest, ModelClient};

/// How to bootstrap the base controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootPlan {
    /// Environment the controller is cloned from
    pub environment: EnvironmentConfig,
    /// Controller and default model name
    pub temp_env_name: ModelName,
    /// Host for the manual provider
    pub bootstrap_host: Option<String>,
    /// Extra hosts enrolled after bootstrap
    pub machines: Vec<String>,
    /// Controller series; falls back to the environment's default series
    pub series: Option<String>,
    pub agent_url: Option<String>,
    pub agent_stream: Option<String>,
    /// Controller diagnostics land here
    pub log_dir: PathBuf,
    /// Leave the controller running after the run
    pub keep_env: bool,
    /// Overrides the environment's region
    pub region: Option<String>,
}

impl BootPlan {
    /// Translate the plan into a bootstrap request.
    pub fn bootstrap_request(&self) -> BootstrapRequest {
        let cloud = match &self.bootstrap_host {
            Some(host) => format!("manual/{host}"),
            None => match self.region.as_ref().or(self.environment.region.as_ref()) {
                Some(region) => format!("{}/{}", self.environment.cloud, region),
                None => self.environment.cloud.clone(),
            },
        };

        let mut config: Vec<(String, String)> = self
            .environment
            .config
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        if let Some(url) = &self.agent_url {
            config.push(("agent-metadata-url".into(), url.clone()));
        }
        if let Some(stream) = &self.agent_stream {
            config.push(("agent-stream".into(), stream.clone()));
        }

        BootstrapRequest {
            cloud,
            default_model: self.temp_env_name.to_string(),
            series: self
                .series
                .clone()
                .or_else(|| self.environment.default_series.clone()),
            constraints: self.environment.constraints.clone(),
            config,
        }
    }
}

/// Service owning controller and hosted-model scopes.
pub struct LifecycleService {
    diagnostics: Arc<DiagnosticsService>,
}

impl LifecycleService {
    pub fn new(diagnostics: Arc<DiagnosticsService>) -> Self {
        Self { diagnostics }
    }

    /// Bootstrap a controller, run `body`, then collect logs and tear down.
    ///
    /// Teardown runs even if bootstrap itself failed. A body error wins
    /// over a teardown error.
    #[instrument(skip_all, fields(controller = %plan.temp_env_name))]
    pub fn with_boot_context<T, F>(
        &self,
        client: &dyn ModelClient,
        plan: &BootPlan,
        body: F,
    ) -> ApplicationResult<T>
    where
        F: FnOnce(&dyn ModelClient) -> ApplicationResult<T>,
    {
        if let Err(e) = client.kill_controller() {
            debug!("no leftover controller to clean: {}", e);
        }

        let result = self.bootstrap(client, plan).and_then(|()| body(client));
        if let Err(e) = &result {
            error!("run failed on controller {}: {}", plan.temp_env_name, error_chain(e));
        }

        self.diagnostics.dump_env_logs(client, None, &plan.log_dir);
        let teardown = if plan.keep_env {
            info!("keeping controller {}", plan.temp_env_name);
            Ok(())
        } else {
            client
                .kill_controller()
                .with_model_context("kill-controller", client.controller_name())
        };

        match (result, teardown) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(e)) => Err(e),
            (Err(e), Err(t)) => {
                warn!("teardown also failed: {}", error_chain(&t));
                Err(e)
            }
            (Err(e), Ok(())) => Err(e),
        }
    }

    fn bootstrap(&self, client: &dyn ModelClient, plan: &BootPlan) -> ApplicationResult<()> {
        let request = plan.bootstrap_request();
        info!("bootstrapping {} on {}", plan.temp_env_name, request.cloud);
        client
            .bootstrap(&request)
            .with_model_context("bootstrap", client.controller_name())?;
        for host in &plan.machines {
            client
                .add_machine(host)
                .with_model_context(&format!("add-machine {host}"), client.model_name())?;
        }
        Ok(())
    }

    /// Create hosted model `{parent}-{suffix}`, run `body` with it, then
    /// print status, collect logs into `{log_dir}/{suffix}` and destroy it.
    ///
    /// A body error is logged and returned as `HostedEnvironmentFailed`
    /// after teardown has run.
    #[instrument(skip_all, fields(parent = %parent.model_name(), suffix = %suffix))]
    pub fn with_hosted_environment<T, F>(
        &self,
        parent: &dyn ModelClient,
        log_dir: &Path,
        suffix: &str,
        body: F,
    ) -> ApplicationResult<T>
    where
        F: FnOnce(&dyn ModelClient) -> ApplicationResult<T>,
    {
        let name = ModelName::new(parent.model_name())?.hosted(suffix)?;
        let mut lifecycle = HostedEnvLifecycle::new();

        let child = parent
            .add_model(name.as_str())
            .with_model_context("add-model", parent.controller_name())?;
        advance(&mut lifecycle, HostedEnvPhase::Active, &name);

        advance(&mut lifecycle, HostedEnvPhase::DeployAttempted, &name);
        let result = body(child.as_ref());
        if let Err(e) = &result {
            error!(
                "Exception while environment \"{}\" active: {}",
                name,
                error_chain(e)
            );
        }

        let status = self.diagnostics.safe_print_status(child.as_ref());
        advance(&mut lifecycle, HostedEnvPhase::Inspected, &name);

        let hosted_log_dir = log_dir.join(suffix);
        self.diagnostics
            .dump_env_logs(child.as_ref(), status.as_deref(), &hosted_log_dir);
        advance(&mut lifecycle, HostedEnvPhase::LogsCollected, &name);

        let destroyed = child
            .destroy_model()
            .with_model_context("destroy-model", name.as_str());
        if destroyed.is_ok() {
            advance(&mut lifecycle, HostedEnvPhase::Destroyed, &name);
        }
        debug!("{}: phases {:?}", name, lifecycle.history());

        match (result, destroyed) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(e)) => Err(e),
            (Err(e), destroyed) => {
                if let Err(d) = destroyed {
                    warn!("cannot destroy {}: {}", name, error_chain(&d));
                }
                Err(ApplicationError::HostedEnvironmentFailed {
                    env_name: name.to_string(),
                    source: Box::new(e),
                })
            }
        }
    }
}

fn advance(lifecycle: &mut HostedEnvLifecycle, next: HostedEnvPhase, name: &ModelName) {
    match lifecycle.advance(next) {
        Ok(()) => debug!("{}: {}", name, next),
        Err(e) => warn!("{}: {}", name, e),
    }
}
