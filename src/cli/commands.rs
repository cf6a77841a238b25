//! Command execution: resolve arguments into a run plan and execute it

use std::path::PathBuf;

use chrono::Local;
use tracing::{debug, instrument};

use crate::application::services::BootPlan;
use crate::cli::args::Cli;
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::Settings;
use crate::domain::{ModelName, Series, SoftDeadline};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::juju::JujuOptions;
use crate::infrastructure::InfraError;

/// Everything derived from the command line and settings.
#[derive(Debug, Clone)]
pub struct RunPlan {
    pub boot: BootPlan,
    /// Charm series
    pub series: Series,
    pub juju: JujuOptions,
}

/// Default controller name: `<env>-<YYYYmmddHHMMSS>-temp-env`.
pub fn default_temp_env_name(env: &str) -> String {
    format!("{}-{}-temp-env", env, Local::now().format("%Y%m%d%H%M%S"))
}

/// Resolve arguments against settings without touching the outside world.
pub fn resolve(cli: &Cli, settings: &Settings, deadline: SoftDeadline) -> CliResult<RunPlan> {
    let environment = settings.environment(&cli.env)?.clone();

    let temp_env_name = cli
        .temp_env_name
        .clone()
        .unwrap_or_else(|| default_temp_env_name(&cli.env));
    let temp_env_name = ModelName::new(temp_env_name)
        .map_err(|e| CliError::InvalidArgs(e.to_string()))?;

    let series = Series::or_default(cli.series.as_deref())
        .map_err(|e| CliError::InvalidArgs(e.to_string()))?;

    let log_dir = match &cli.logs {
        Some(path) => expand_path(path)?,
        None => std::env::temp_dir()
            .join(temp_env_name.as_str())
            .join("logs"),
    };

    let boot = BootPlan {
        environment,
        temp_env_name: temp_env_name.clone(),
        bootstrap_host: cli.bootstrap_host.clone(),
        machines: cli.machines.clone(),
        series: cli.series.clone(),
        agent_url: cli.agent_url.clone(),
        agent_stream: cli.agent_stream.clone(),
        log_dir,
        keep_env: cli.keep_env,
        region: cli.region.clone(),
    };

    let juju = JujuOptions {
        juju_bin: cli.juju_bin.clone(),
        debug: cli.debug,
        controller: temp_env_name.to_string(),
        model: temp_env_name.to_string(),
        deadline,
        poll_interval: settings.poll_interval(),
    };

    Ok(RunPlan { boot, series, juju })
}

/// Expand `~` and `$VAR` in a user-supplied path.
fn expand_path(path: &std::path::Path) -> CliResult<PathBuf> {
    let raw = path.to_string_lossy();
    shellexpand::full(&raw)
        .map(|p| PathBuf::from(p.as_ref()))
        .map_err(|e| CliError::InvalidArgs(format!("cannot expand {}: {}", raw, e)))
}

/// Entry point used by `main`.
#[instrument(skip_all, fields(env = %cli.env))]
pub fn execute_command(cli: &Cli) -> CliResult<()> {
    // Deadline starts ticking at process start, before settings are read.
    let deadline = SoftDeadline::from_timeout(cli.deadline);
    let settings = Settings::load(cli.config.as_deref())?;
    let container = ServiceContainer::new(settings);
    let plan = resolve(cli, &container.settings, deadline)?;
    run_plan(&container, &plan)
}

/// Run a resolved plan with the container's services.
pub fn run_plan(container: &ServiceContainer, plan: &RunPlan) -> CliResult<()> {
    debug!("run_plan: {:?}", plan);
    container
        .fs
        .create_dir_all(&plan.boot.log_dir)
        .map_err(|e| InfraError::io(format!("create {}", plan.boot.log_dir.display()), e))?;

    output::header(&format!(
        "Assessing hosted models on {} (series {})",
        plan.boot.temp_env_name, plan.series
    ));
    let mut client = container.juju_client(plan.juju.clone());
    container
        .assessment
        .run(&mut client, &plan.boot, &plan.series)?;
    output::success(&format!(
        "dummy stack reachable in {} and its hosted models",
        plan.boot.temp_env_name
    ));
    Ok(())
}
