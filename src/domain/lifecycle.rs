//! Hosted environment lifecycle

use std::fmt;

use crate::domain::DomainError;

/// Phase of a hosted environment inside its scope.
///
/// `Requested -> Active -> DeployAttempted -> Inspected -> LogsCollected -> Destroyed`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HostedEnvPhase {
    Requested,
    Active,
    DeployAttempted,
    Inspected,
    LogsCollected,
    Destroyed,
}

impl HostedEnvPhase {
    pub fn is_terminal(self) -> bool {
        self == HostedEnvPhase::Destroyed
    }

    fn can_advance_to(self, next: HostedEnvPhase) -> bool {
        use HostedEnvPhase::*;
        matches!(
            (self, next),
            (Requested, Active)
                | (Active, DeployAttempted)
                // body never ran (or failed before touching the model)
                | (Active, Inspected)
                | (DeployAttempted, Inspected)
                | (Inspected, LogsCollected)
                | (LogsCollected, Destroyed)
        )
    }
}

impl fmt::Display for HostedEnvPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HostedEnvPhase::Requested => "requested",
            HostedEnvPhase::Active => "active",
            HostedEnvPhase::DeployAttempted => "deploy-attempted",
            HostedEnvPhase::Inspected => "inspected",
            HostedEnvPhase::LogsCollected => "logs-collected",
            HostedEnvPhase::Destroyed => "destroyed",
        };
        f.write_str(s)
    }
}

/// Tracks one hosted environment through its phases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostedEnvLifecycle {
    phase: HostedEnvPhase,
    history: Vec<HostedEnvPhase>,
}

impl Default for HostedEnvLifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl HostedEnvLifecycle {
    pub fn new() -> Self {
        Self {
            phase: HostedEnvPhase::Requested,
            history: vec![HostedEnvPhase::Requested],
        }
    }

    pub fn phase(&self) -> HostedEnvPhase {
        self.phase
    }

    pub fn history(&self) -> &[HostedEnvPhase] {
        &self.history
    }

    pub fn advance(&mut self, next: HostedEnvPhase) -> Result<(), DomainError> {
        if !self.phase.can_advance_to(next) {
            return Err(DomainError::InvalidTransition {
                from: self.phase,
                to: next,
            });
        }
        self.phase = next;
        self.history.push(next);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::HostedEnvPhase::*;
    use super::*;
    use rstest::rstest;

    #[test]
    fn given_full_lifecycle_when_advancing_then_ends_destroyed() {
        let mut lc = HostedEnvLifecycle::new();
        for next in [Active, DeployAttempted, Inspected, LogsCollected, Destroyed] {
            lc.advance(next).unwrap();
        }
        assert!(lc.phase().is_terminal());
        assert_eq!(lc.history().len(), 6);
    }

    #[test]
    fn given_body_never_ran_when_inspecting_then_allowed() {
        let mut lc = HostedEnvLifecycle::new();
        lc.advance(Active).unwrap();
        assert!(lc.advance(Inspected).is_ok());
    }

    #[rstest]
    #[case(Requested, Destroyed)]
    #[case(Active, Destroyed)]
    #[case(Inspected, Active)]
    #[case(LogsCollected, Inspected)]
    #[case(Destroyed, Requested)]
    fn given_out_of_order_phase_when_advancing_then_rejected(
        #[case] from: HostedEnvPhase,
        #[case] to: HostedEnvPhase,
    ) {
        assert!(!from.can_advance_to(to));
    }
}
