//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueHint};

/// Deploy a dummy stack into a controller and two nested hosted models
#[derive(Parser, Debug, Clone)]
#[command(name = "assess-jes-deploy")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Name of the environment to clone
    pub env: String,

    /// Path to the juju binary
    #[arg(default_value = "juju", value_hint = ValueHint::CommandName)]
    pub juju_bin: String,

    /// Directory for collected logs (default: <tmp>/<temp_env_name>/logs)
    #[arg(value_hint = ValueHint::DirPath)]
    pub logs: Option<PathBuf>,

    /// Name of the temporary controller (default: <env>-<timestamp>-temp-env)
    pub temp_env_name: Option<String>,

    /// Pass --debug to juju
    #[arg(long)]
    pub debug: bool,

    /// Verbose logging (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Series for charms and the controller machine
    #[arg(long)]
    pub series: Option<String>,

    /// Bootstrap host (manual provider)
    #[arg(long)]
    pub bootstrap_host: Option<String>,

    /// Extra machine to enrol after bootstrap (repeatable)
    #[arg(long = "machine", value_name = "HOST")]
    pub machines: Vec<String>,

    /// URL of agent binaries
    #[arg(long, value_hint = ValueHint::Url)]
    pub agent_url: Option<String>,

    /// Stream of agent binaries
    #[arg(long)]
    pub agent_stream: Option<String>,

    /// Keep the controller running after the run
    #[arg(long)]
    pub keep_env: bool,

    /// Override the environment's region
    #[arg(long)]
    pub region: Option<String>,

    /// Soft deadline for the whole run, in seconds
    #[arg(long = "timeout", value_name = "SECONDS")]
    pub deadline: Option<u64>,

    /// Config file (default: ~/.config/jes-assess/jes-assess.toml)
    #[arg(long, value_hint = ValueHint::FilePath, env = "JES_ASSESS_CONFIG")]
    pub config: Option<PathBuf>,
}
