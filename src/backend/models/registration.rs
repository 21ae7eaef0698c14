// src/backend/models/registration.rs
use crate::models::common::{PrincipalId, TimestampNs, EXCLUSIVITY_WINDOW_SEC, NANOS_PER_SEC};
use candid::CandidType;
use serde::{Deserialize, Serialize};

/// Per-principal liveness record. Created once by `register`; only
/// `last_check_in` ever changes afterwards (on ping).
#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Registration {
    pub owner: PrincipalId,
    /// Max allowed silence before presumed-deceased eligibility. > 0.
    pub check_in_period_sec: u64,
    /// Additional buffer before a deceased mark is accepted. > 0.
    pub grace_period_sec: u64,
    pub last_check_in: TimestampNs,
    pub registered_at: TimestampNs,
}

impl Registration {
    /// Full silence window in nanoseconds: check-in period plus grace.
    pub fn liveness_window_ns(&self) -> u64 {
        self.check_in_period_sec
            .saturating_add(self.grace_period_sec)
            .saturating_mul(NANOS_PER_SEC)
    }

    /// True once `now >= last_check_in + check_in_period + grace_period`.
    pub fn is_overdue(&self, now: TimestampNs) -> bool {
        now >= self.last_check_in.saturating_add(self.liveness_window_ns())
    }
}

/// Recorded at most once per principal, by the first successful
/// `mark_deceased`. Immutable; there is no resurrection path.
#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct DeceasedMark {
    pub notified_by: PrincipalId,
    pub notified_at: TimestampNs,
}

impl DeceasedMark {
    /// Within this window only `notified_by` may claim.
    pub fn is_exclusive_to_notifier(&self, now: TimestampNs) -> bool {
        now.saturating_sub(self.notified_at) < EXCLUSIVITY_WINDOW_SEC * NANOS_PER_SEC
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use candid::Principal;

    fn registration(last_check_in: TimestampNs, period_sec: u64, grace_sec: u64) -> Registration {
        Registration {
            owner: Principal::from_slice(&[1]),
            check_in_period_sec: period_sec,
            grace_period_sec: grace_sec,
            last_check_in,
            registered_at: last_check_in,
        }
    }

    #[test]
    fn test_overdue_boundary() {
        let reg = registration(1_000 * NANOS_PER_SEC, 5, 2);
        let deadline = (1_000 + 5 + 2) * NANOS_PER_SEC;

        assert!(!reg.is_overdue(deadline - 1));
        assert!(reg.is_overdue(deadline));
        assert!(reg.is_overdue(deadline + 1));
    }

    #[test]
    fn test_not_overdue_at_registration() {
        let reg = registration(1_000 * NANOS_PER_SEC, 1, 1);
        assert!(!reg.is_overdue(reg.last_check_in));
    }

    #[test]
    fn test_window_saturates() {
        let reg = registration(u64::MAX - 1, u64::MAX, u64::MAX);
        // Must not overflow; a saturated window simply never elapses.
        assert!(!reg.is_overdue(u64::MAX - 1));
    }

    #[test]
    fn test_exclusivity_boundary() {
        let mark = DeceasedMark {
            notified_by: Principal::from_slice(&[2]),
            notified_at: 50 * NANOS_PER_SEC,
        };
        let window_end = mark.notified_at + EXCLUSIVITY_WINDOW_SEC * NANOS_PER_SEC;

        assert!(mark.is_exclusive_to_notifier(mark.notified_at));
        assert!(mark.is_exclusive_to_notifier(window_end - 1));
        assert!(!mark.is_exclusive_to_notifier(window_end));
        assert!(!mark.is_exclusive_to_notifier(window_end + 1));
    }
}
