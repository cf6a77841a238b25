//! Soft deadline threaded from process start into the orchestration client

use chrono::{DateTime, Duration, Utc};

use crate::domain::DomainError;

/// Advisory time budget.
///
/// Waiting operations consult it and give up once it has passed;
/// teardown ignores it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SoftDeadline(Option<DateTime<Utc>>);

impl SoftDeadline {
    /// No deadline at all.
    pub fn none() -> Self {
        Self(None)
    }

    pub fn at(deadline: DateTime<Utc>) -> Self {
        Self(Some(deadline))
    }

    /// Deadline `seconds` from now; `None` means unlimited.
    pub fn from_timeout(seconds: Option<u64>) -> Self {
        match seconds {
            Some(secs) => {
                let secs = i64::try_from(secs).unwrap_or(i64::MAX);
                let delta = Duration::try_seconds(secs).unwrap_or(Duration::MAX);
                Self(Utc::now().checked_add_signed(delta))
            }
            None => Self(None),
        }
    }

    pub fn deadline(&self) -> Option<DateTime<Utc>> {
        self.0
    }

    pub fn is_exceeded_at(&self, now: DateTime<Utc>) -> bool {
        self.0.is_some_and(|d| now > d)
    }

    pub fn check_at(&self, now: DateTime<Utc>) -> Result<(), DomainError> {
        match self.0 {
            Some(d) if self.is_exceeded_at(now) => Err(DomainError::SoftDeadlineExceeded {
                deadline: d.to_rfc3339(),
            }),
            _ => Ok(()),
        }
    }

    pub fn check(&self) -> Result<(), DomainError> {
        self.check_at(Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_no_deadline_when_checking_then_never_exceeded() {
        let d = SoftDeadline::none();
        assert!(d.check().is_ok());
        assert!(!d.is_exceeded_at(Utc::now() + Duration::days(365)));
    }

    #[test]
    fn given_past_deadline_when_checking_then_fails() {
        let d = SoftDeadline::at(Utc::now() - Duration::seconds(1));
        assert!(matches!(
            d.check(),
            Err(DomainError::SoftDeadlineExceeded { .. })
        ));
    }

    #[test]
    fn given_timeout_when_created_then_deadline_in_future() {
        let d = SoftDeadline::from_timeout(Some(3600));
        let deadline = d.deadline().unwrap();
        assert!(deadline > Utc::now());
        assert!(d.check().is_ok());
        assert!(d.is_exceeded_at(deadline + Duration::seconds(1)));
    }

    #[test]
    fn given_huge_timeout_when_created_then_does_not_panic() {
        let _ = SoftDeadline::from_timeout(Some(u64::MAX));
    }
}
