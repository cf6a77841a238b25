//! Domain entities: model names, series and the reference stack

use std::fmt;

use crate::domain::DomainError;

/// Series used for charms when none is given on the command line.
pub const DEFAULT_SERIES: &str = "precise";

/// Application that receives the token via its configuration.
pub const DUMMY_SOURCE: &str = "dummy-source";

/// Application that reports the relayed token in its workload status.
pub const DUMMY_SINK: &str = "dummy-sink";

/// Unit of the sink that is polled for the token.
pub const DUMMY_SINK_UNIT: &str = "dummy-sink/0";

/// Configuration key written on the source application.
pub const TOKEN_KEY: &str = "token";

/// Name of an orchestrated model (base or hosted).
///
/// Hosted models derive their name from the *immediate* parent:
/// `ctrl` -> `ctrl-env1` -> `ctrl-env1-env2`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModelName(String);

impl ModelName {
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();
        if name.is_empty() {
            return Err(DomainError::InvalidModelName {
                name,
                reason: "name is empty".into(),
            });
        }
        let invalid = name
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_' || *c == '.'));
        if let Some(c) = invalid {
            return Err(DomainError::InvalidModelName {
                reason: format!("unexpected character {c:?}"),
                name,
            });
        }
        Ok(Self(name))
    }

    /// Name of a hosted model nested under this one.
    pub fn hosted(&self, suffix: &str) -> Result<Self, DomainError> {
        Self::new(format!("{}-{}", self.0, suffix))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ModelName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Charm series (e.g. `bionic`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Series(String);

impl Series {
    pub fn new(series: impl Into<String>) -> Result<Self, DomainError> {
        let series = series.into();
        if series.is_empty() || !series.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(DomainError::InvalidSeries(series));
        }
        Ok(Self(series))
    }

    /// Explicit series if given, the fixed fallback otherwise.
    pub fn or_default(series: Option<&str>) -> Result<Self, DomainError> {
        Self::new(series.unwrap_or(DEFAULT_SERIES))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Series {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Charm URL for `name` built against `series`: `{prefix}{series}/{name}`.
pub fn charm_url(prefix: &str, series: &Series, name: &str) -> String {
    format!("{}{}/{}", prefix, series, name)
}
