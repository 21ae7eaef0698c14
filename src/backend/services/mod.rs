pub mod claim_service;
pub mod liveness_service;
pub mod message_service;

use crate::models::audit_log::{AuditLogEntry, LogAction};
use crate::models::common::{PrincipalId, TimestampNs};
use crate::storage;

/// Appends one audit entry to the subject principal's trail.
pub(crate) fn record_audit(
    subject: &PrincipalId,
    actor: PrincipalId,
    now: TimestampNs,
    action: LogAction,
    details: Option<String>,
) {
    let subject_text = subject.to_text();
    storage::audit_logs::add_entry(
        &subject_text,
        AuditLogEntry {
            timestamp: now,
            actor,
            action,
            details,
            subject: subject_text.clone(),
        },
    );
}
