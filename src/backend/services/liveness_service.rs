// src/backend/services/liveness_service.rs
//
// Liveness state machine per principal:
// Unregistered -> Alive (register) -> Deceased-Pending (mark_deceased,
// reachable only once the check-in window plus grace has elapsed).
// Deceased-Pending is terminal; ping is rejected there. Ping never
// transitions state, it only resets the timer within Alive.

use crate::error::SwitchError;
use crate::metrics;
use crate::models::audit_log::LogAction;
use crate::models::common::{
    LivenessStatus, PrincipalId, TimestampNs, DEFAULT_CHECK_IN_PERIOD_SEC,
    DEFAULT_GRACE_PERIOD_SEC,
};
use crate::models::registration::{DeceasedMark, Registration};
use crate::services::record_audit;
use crate::storage;
use crate::utils::log;

/// Creates the caller's liveness record.
///
/// # Errors
///
/// * `SwitchError::InvalidPeriod` - either period is zero.
/// * `SwitchError::AlreadyRegistered` - the caller already has a record;
///   registrations are immutable, there is no re-registration.
pub fn register(
    caller: PrincipalId,
    now: TimestampNs,
    check_in_period_sec: u64,
    grace_period_sec: u64,
) -> Result<(), SwitchError> {
    if check_in_period_sec == 0 || grace_period_sec == 0 {
        return Err(SwitchError::InvalidPeriod);
    }
    if storage::registrations::contains_registration(&caller) {
        return Err(SwitchError::AlreadyRegistered);
    }

    let registration = Registration {
        owner: caller,
        check_in_period_sec,
        grace_period_sec,
        last_check_in: now,
        registered_at: now,
    };
    let _ = storage::registrations::insert_registration(&registration);

    record_audit(
        &caller,
        caller,
        now,
        LogAction::Registered,
        Some(
            serde_json::json!({
                "check_in_period_sec": check_in_period_sec,
                "grace_period_sec": grace_period_sec,
            })
            .to_string(),
        ),
    );
    metrics::record_registration();
    log::print(format!(
        "INFO: {} registered (check-in {}s, grace {}s)",
        caller, check_in_period_sec, grace_period_sec
    ));
    Ok(())
}

/// `register` with the built-in default periods.
pub fn register_default(caller: PrincipalId, now: TimestampNs) -> Result<(), SwitchError> {
    register(
        caller,
        now,
        DEFAULT_CHECK_IN_PERIOD_SEC,
        DEFAULT_GRACE_PERIOD_SEC,
    )
}

/// Proves liveness: resets the caller's check-in clock, nullifying any
/// pending deceased-eligibility.
///
/// # Errors
///
/// * `SwitchError::NotRegistered` - caller has no registration.
/// * `SwitchError::AlreadyDeceased` - a deceased mark exists; no
///   resurrection path.
pub fn ping(caller: PrincipalId, now: TimestampNs) -> Result<(), SwitchError> {
    let mut registration = storage::registrations::get_registration(&caller)
        .ok_or_else(|| SwitchError::NotRegistered(caller.to_text()))?;
    if storage::deceased_marks::contains_mark(&caller) {
        return Err(SwitchError::AlreadyDeceased(caller.to_text()));
    }

    registration.last_check_in = now;
    let _ = storage::registrations::insert_registration(&registration);

    record_audit(&caller, caller, now, LogAction::CheckInRecorded, None);
    metrics::record_check_in();
    Ok(())
}

/// Pure predicate: has the principal's silence window fully elapsed?
///
/// # Errors
///
/// Returns `SwitchError::NotRegistered` for an unknown principal.
pub fn is_overdue(principal: &PrincipalId, now: TimestampNs) -> Result<bool, SwitchError> {
    let registration = storage::registrations::get_registration(principal)
        .ok_or_else(|| SwitchError::NotRegistered(principal.to_text()))?;
    Ok(registration.is_overdue(now))
}

/// Records the one and only deceased mark for `principal`, flagged by
/// `caller`. This is the sole transition out of Alive.
///
/// # Errors
///
/// * `SwitchError::NotRegistered` - principal has no registration.
/// * `SwitchError::AlreadyDeceased` - a mark already exists; marks are
///   immutable and recorded once.
/// * `SwitchError::TooSoon` - the check-in window plus grace has not
///   elapsed yet.
pub fn mark_deceased(
    caller: PrincipalId,
    now: TimestampNs,
    principal: PrincipalId,
) -> Result<(), SwitchError> {
    let registration = storage::registrations::get_registration(&principal)
        .ok_or_else(|| SwitchError::NotRegistered(principal.to_text()))?;
    if storage::deceased_marks::contains_mark(&principal) {
        return Err(SwitchError::AlreadyDeceased(principal.to_text()));
    }
    if !registration.is_overdue(now) {
        return Err(SwitchError::TooSoon(principal.to_text()));
    }

    let mark = DeceasedMark {
        notified_by: caller,
        notified_at: now,
    };
    let _ = storage::deceased_marks::insert_mark(&principal, &mark);

    record_audit(
        &principal,
        caller,
        now,
        LogAction::DeceasedMarked,
        Some(serde_json::json!({ "notified_by": caller.to_text() }).to_string()),
    );
    metrics::record_deceased_mark();
    log::print(format!(
        "INFO: {} marked deceased by {} at {}",
        principal, caller, now
    ));
    Ok(())
}

/// Point-in-time view of the state machine for a registered principal.
///
/// # Errors
///
/// Returns `SwitchError::NotRegistered` for an unknown principal.
pub fn liveness_status(
    principal: &PrincipalId,
    now: TimestampNs,
) -> Result<LivenessStatus, SwitchError> {
    let registration = storage::registrations::get_registration(principal)
        .ok_or_else(|| SwitchError::NotRegistered(principal.to_text()))?;
    if storage::deceased_marks::contains_mark(principal) {
        return Ok(LivenessStatus::Deceased);
    }
    if registration.is_overdue(now) {
        return Ok(LivenessStatus::Overdue);
    }
    Ok(LivenessStatus::Alive)
}

pub fn get_registration(principal: &PrincipalId) -> Result<Registration, SwitchError> {
    storage::registrations::get_registration(principal)
        .ok_or_else(|| SwitchError::NotRegistered(principal.to_text()))
}

pub fn get_deceased_mark(principal: &PrincipalId) -> Option<DeceasedMark> {
    storage::deceased_marks::get_mark(principal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::common::NANOS_PER_SEC;
    use candid::Principal;

    fn p(n: u8) -> Principal {
        Principal::from_slice(&[n])
    }

    fn sec(s: u64) -> TimestampNs {
        s * NANOS_PER_SEC
    }

    #[test]
    fn test_register_rejects_zero_periods() {
        assert_eq!(
            register(p(1), sec(10), 0, 1),
            Err(SwitchError::InvalidPeriod)
        );
        assert_eq!(
            register(p(1), sec(10), 1, 0),
            Err(SwitchError::InvalidPeriod)
        );
    }

    #[test]
    fn test_double_registration_rejected() {
        let owner = p(1);
        register(owner, sec(10), 5, 2).unwrap();
        assert_eq!(
            register_default(owner, sec(11)),
            Err(SwitchError::AlreadyRegistered)
        );
    }

    #[test]
    fn test_not_overdue_after_register() {
        let owner = p(1);
        register(owner, sec(10), 5, 2).unwrap();
        assert!(!is_overdue(&owner, sec(10)).unwrap());
        assert_eq!(
            liveness_status(&owner, sec(10)).unwrap(),
            LivenessStatus::Alive
        );
    }

    #[test]
    fn test_ping_unregistered() {
        assert!(matches!(
            ping(p(1), sec(10)),
            Err(SwitchError::NotRegistered(_))
        ));
    }

    #[test]
    fn test_mark_deceased_gating() {
        let owner = p(1);
        let notifier = p(2);
        register(owner, sec(100), 5, 2).unwrap();

        // Window closes at exactly t0 + check_in + grace.
        assert!(matches!(
            mark_deceased(notifier, sec(107) - 1, owner),
            Err(SwitchError::TooSoon(_))
        ));
        mark_deceased(notifier, sec(107), owner).unwrap();

        let mark = get_deceased_mark(&owner).unwrap();
        assert_eq!(mark.notified_by, notifier);
        assert_eq!(mark.notified_at, sec(107));

        assert!(matches!(
            mark_deceased(p(3), sec(200), owner),
            Err(SwitchError::AlreadyDeceased(_))
        ));
    }

    #[test]
    fn test_mark_deceased_unregistered() {
        assert!(matches!(
            mark_deceased(p(2), sec(10), p(1)),
            Err(SwitchError::NotRegistered(_))
        ));
    }

    #[test]
    fn test_premature_mark_with_defaults() {
        let owner = p(1);
        register_default(owner, sec(1_000)).unwrap();

        assert!(matches!(
            mark_deceased(p(2), sec(1_000), owner),
            Err(SwitchError::TooSoon(_))
        ));

        let window = DEFAULT_CHECK_IN_PERIOD_SEC + DEFAULT_GRACE_PERIOD_SEC;
        mark_deceased(p(2), sec(1_000 + window), owner).unwrap();
    }

    #[test]
    fn test_ping_resets_timer() {
        let owner = p(1);
        register(owner, sec(0), 5, 2).unwrap();

        ping(owner, sec(3)).unwrap();
        assert_eq!(
            get_registration(&owner).unwrap().last_check_in,
            sec(3)
        );

        // 5s after registration but only 2s after the ping.
        assert!(matches!(
            mark_deceased(p(2), sec(5), owner),
            Err(SwitchError::TooSoon(_))
        ));
        // 8s after the ping clears the 5s + 2s window.
        mark_deceased(p(2), sec(11), owner).unwrap();
    }

    #[test]
    fn test_ping_monotonic_and_clears_overdue() {
        let owner = p(1);
        register(owner, sec(0), 5, 2).unwrap();

        // Already overdue, but not yet marked: ping still allowed.
        assert!(is_overdue(&owner, sec(20)).unwrap());
        assert_eq!(
            liveness_status(&owner, sec(20)).unwrap(),
            LivenessStatus::Overdue
        );
        ping(owner, sec(20)).unwrap();
        assert!(!is_overdue(&owner, sec(20)).unwrap());
    }

    #[test]
    fn test_ping_rejected_after_mark() {
        let owner = p(1);
        register(owner, sec(0), 1, 1).unwrap();
        mark_deceased(p(2), sec(2), owner).unwrap();

        assert!(matches!(
            ping(owner, sec(3)),
            Err(SwitchError::AlreadyDeceased(_))
        ));
        assert_eq!(
            liveness_status(&owner, sec(3)).unwrap(),
            LivenessStatus::Deceased
        );
    }

    #[test]
    fn test_audit_trail_records_lifecycle() {
        use crate::models::audit_log::LogAction;

        let owner = p(1);
        register(owner, sec(0), 1, 1).unwrap();
        ping(owner, sec(1)).unwrap();
        mark_deceased(p(2), sec(4), owner).unwrap();

        let actions: Vec<LogAction> = storage::audit_logs::get_entries(&owner.to_text())
            .into_iter()
            .map(|entry| entry.action)
            .collect();
        assert_eq!(
            actions,
            vec![
                LogAction::Registered,
                LogAction::CheckInRecorded,
                LogAction::DeceasedMarked,
            ]
        );
    }
}
