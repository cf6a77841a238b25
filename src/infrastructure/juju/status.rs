//! Model status as reported by `juju status --format json`

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::infrastructure::{InfraError, InfraResult};

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct StatusInfo {
    #[serde(default)]
    pub current: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl StatusInfo {
    fn is(&self, value: &str) -> bool {
        self.current.as_deref() == Some(value)
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct MachineStatus {
    #[serde(rename = "juju-status", alias = "agent-status", default)]
    pub agent: StatusInfo,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct UnitStatus {
    #[serde(rename = "workload-status", default)]
    pub workload: StatusInfo,
    #[serde(rename = "juju-status", alias = "agent-status", default)]
    pub agent: StatusInfo,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct ApplicationStatus {
    #[serde(default)]
    pub units: BTreeMap<String, UnitStatus>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct ModelStatus {
    #[serde(default)]
    pub machines: BTreeMap<String, MachineStatus>,
    #[serde(default)]
    pub applications: BTreeMap<String, ApplicationStatus>,
}

impl ModelStatus {
    pub fn parse(json: &str) -> InfraResult<Self> {
        serde_json::from_str(json).map_err(|e| InfraError::StatusParse {
            message: e.to_string(),
        })
    }

    pub fn unit(&self, name: &str) -> Option<&UnitStatus> {
        let application = name.split('/').next()?;
        self.applications.get(application)?.units.get(name)
    }

    fn units(&self) -> impl Iterator<Item = (&String, &UnitStatus)> {
        self.applications.values().flat_map(|a| a.units.iter())
    }

    /// Machines and units that have not settled yet.
    pub fn pending(&self) -> Vec<String> {
        let machines = self
            .machines
            .iter()
            .filter(|(_, m)| !m.agent.is("started"))
            .map(|(id, _)| format!("machine-{id}"));
        let units = self
            .units()
            .filter(|(_, u)| !u.agent.is("idle"))
            .map(|(name, _)| name.clone());
        machines.chain(units).collect()
    }

    /// Units whose workload or agent reports an error.
    pub fn errored(&self) -> Vec<String> {
        self.units()
            .filter(|(_, u)| u.workload.is("error") || u.agent.is("failed"))
            .map(|(name, u)| match &u.workload.message {
                Some(msg) => format!("{name}: {msg}"),
                None => name.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SETTLED: &str = r#"{
        "model": {"name": "ctrl"},
        "machines": {"0": {"juju-status": {"current": "started"}}},
        "applications": {
            "dummy-sink": {"units": {"dummy-sink/0": {
                "workload-status": {"current": "active", "message": "Token is abc"},
                "juju-status": {"current": "idle"}
            }}},
            "dummy-source": {"units": {"dummy-source/0": {
                "workload-status": {"current": "active"},
                "juju-status": {"current": "idle"}
            }}}
        }
    }"#;

    #[test]
    fn given_settled_model_when_parsing_then_nothing_pending() {
        let status = ModelStatus::parse(SETTLED).unwrap();
        assert!(status.pending().is_empty());
        assert!(status.errored().is_empty());
        assert_eq!(
            status.unit("dummy-sink/0").unwrap().workload.message.as_deref(),
            Some("Token is abc")
        );
    }

    #[test]
    fn given_pending_machine_and_unit_when_parsing_then_reports_both() {
        let json = r#"{
            "machines": {"1": {"agent-status": {"current": "pending"}}},
            "applications": {"dummy-sink": {"units": {"dummy-sink/0": {
                "agent-status": {"current": "allocating"}
            }}}}
        }"#;
        let status = ModelStatus::parse(json).unwrap();
        assert_eq!(status.pending(), vec!["machine-1", "dummy-sink/0"]);
    }

    #[test]
    fn given_errored_unit_when_parsing_then_reports_message() {
        let json = r#"{"applications": {"dummy-sink": {"units": {"dummy-sink/0": {
            "workload-status": {"current": "error", "message": "hook failed: install"},
            "juju-status": {"current": "idle"}
        }}}}}"#;
        let status = ModelStatus::parse(json).unwrap();
        assert_eq!(status.errored(), vec!["dummy-sink/0: hook failed: install"]);
    }

    #[test]
    fn given_garbage_when_parsing_then_status_parse_error() {
        assert!(matches!(
            ModelStatus::parse("not json"),
            Err(InfraError::StatusParse { .. })
        ));
    }
}
