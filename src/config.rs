//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/jes-assess/jes-assess.toml`
//!    (or an explicit file given with `--config`)
//! 3. Environment variables: `JES_ASSESS__*` prefix

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::Deserialize;

use crate::application::ApplicationError;

/// Named environment: where and how to bootstrap a controller.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct EnvironmentConfig {
    /// Cloud to bootstrap on (e.g. "aws", "lxd", "manual")
    pub cloud: String,
    /// Cloud region; `--region` overrides it
    pub region: Option<String>,
    /// Controller machine series when `--series` is not given
    pub default_series: Option<String>,
    /// Bootstrap constraints (e.g. "mem=2G")
    pub constraints: Option<String>,
    /// Extra model config passed as `--config key=value` at bootstrap
    pub config: BTreeMap<String, String>,
}

/// Unified configuration for jes-assess.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Prefix of the dummy charm URLs: `{charm_prefix}{series}/dummy-source`
    pub charm_prefix: String,
    /// How long to wait for a deployed stack to settle
    pub start_timeout_secs: u64,
    /// How long to wait for a token to reach the sink
    pub token_timeout_secs: u64,
    /// Delay between status polls
    pub poll_interval_secs: u64,
    /// Environments by name
    pub environments: BTreeMap<String, EnvironmentConfig>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            charm_prefix: "cs:~juju-qa/".into(),
            start_timeout_secs: 300,
            token_timeout_secs: 120,
            poll_interval_secs: 5,
            environments: BTreeMap::new(),
        }
    }
}

/// Raw settings for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub charm_prefix: Option<String>,
    pub start_timeout_secs: Option<u64>,
    pub token_timeout_secs: Option<u64>,
    pub poll_interval_secs: Option<u64>,
    pub environments: BTreeMap<String, EnvironmentConfig>,
}

/// Get the XDG config directory for jes-assess.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "jes-assess").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("jes-assess.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    pub fn start_timeout(&self) -> Duration {
        Duration::from_secs(self.start_timeout_secs)
    }

    pub fn token_timeout(&self) -> Duration {
        Duration::from_secs(self.token_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// Look up a named environment.
    pub fn environment(&self, name: &str) -> Result<&EnvironmentConfig, ApplicationError> {
        self.environments
            .get(name)
            .ok_or_else(|| ApplicationError::Config {
                message: format!(
                    "environment {:?} not found (known: {})",
                    name,
                    if self.environments.is_empty() {
                        "none".to_string()
                    } else {
                        self.environments
                            .keys()
                            .cloned()
                            .collect::<Vec<_>>()
                            .join(", ")
                    }
                ),
            })
    }

    /// Merge overlay config onto self (base).
    ///
    /// - Scalar options: overlay wins if Some, otherwise keep base
    /// - Environments: overlay entries replace base entries of the same name
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        let mut environments = self.environments.clone();
        for (name, env) in &overlay.environments {
            environments.insert(name.clone(), env.clone());
        }
        Self {
            charm_prefix: overlay
                .charm_prefix
                .clone()
                .unwrap_or_else(|| self.charm_prefix.clone()),
            start_timeout_secs: overlay
                .start_timeout_secs
                .unwrap_or(self.start_timeout_secs),
            token_timeout_secs: overlay
                .token_timeout_secs
                .unwrap_or(self.token_timeout_secs),
            poll_interval_secs: overlay
                .poll_interval_secs
                .unwrap_or(self.poll_interval_secs),
            environments,
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Explicit config file; replaces the global file when given
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. Explicit file, else global config `$XDG_CONFIG_HOME/jes-assess/jes-assess.toml`
    /// 3. Environment variables: `JES_ASSESS__*` prefix
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        match config_file {
            Some(path) => {
                if !path.exists() {
                    return Err(ApplicationError::Config {
                        message: format!("config file not found: {}", path.display()),
                    });
                }
                current = current.merge_with(&load_raw_settings(path)?);
            }
            None => {
                if let Some(global_path) = global_config_path() {
                    if global_path.exists() {
                        current = current.merge_with(&load_raw_settings(&global_path)?);
                    }
                }
            }
        }

        current = Self::apply_env_overrides(current)?;
        Ok(current)
    }

    /// Apply JES_ASSESS__* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        // Use config crate just for env var parsing
        let builder = Config::builder().add_source(
            Environment::with_prefix("JES_ASSESS")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().map_err(config_err)?;

        if let Ok(val) = config.get_string("charm_prefix") {
            settings.charm_prefix = val;
        }
        if let Ok(val) = config.get::<u64>("start_timeout_secs") {
            settings.start_timeout_secs = val;
        }
        if let Ok(val) = config.get::<u64>("token_timeout_secs") {
            settings.token_timeout_secs = val;
        }
        if let Ok(val) = config.get::<u64>("poll_interval_secs") {
            settings.poll_interval_secs = val;
        }

        Ok(settings)
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_no_config_when_loading_defaults_then_has_expected_values() {
        let settings = Settings::default();
        assert_eq!(settings.charm_prefix, "cs:~juju-qa/");
        assert_eq!(settings.token_timeout(), Duration::from_secs(120));
        assert_eq!(settings.start_timeout(), Duration::from_secs(300));
        assert!(settings.environments.is_empty());
    }

    #[test]
    fn given_overlay_when_merging_then_scalars_and_environments_override() {
        let mut base = Settings::default();
        base.environments.insert(
            "lxd".into(),
            EnvironmentConfig {
                cloud: "lxd".into(),
                ..Default::default()
            },
        );

        let mut overlay = RawSettings {
            token_timeout_secs: Some(10),
            ..Default::default()
        };
        overlay.environments.insert(
            "aws".into(),
            EnvironmentConfig {
                cloud: "aws".into(),
                region: Some("us-east-1".into()),
                ..Default::default()
            },
        );

        let merged = base.merge_with(&overlay);

        assert_eq!(merged.token_timeout_secs, 10);
        assert_eq!(merged.start_timeout_secs, 300);
        assert_eq!(merged.charm_prefix, "cs:~juju-qa/");
        assert_eq!(merged.environments.len(), 2);
        assert_eq!(
            merged.environment("aws").unwrap().region.as_deref(),
            Some("us-east-1")
        );
    }

    #[test]
    fn given_unknown_environment_when_looking_up_then_config_error() {
        let settings = Settings::default();
        let err = settings.environment("missing").unwrap_err();
        assert!(matches!(err, ApplicationError::Config { .. }));
        assert!(err.to_string().contains("missing"));
    }
}
