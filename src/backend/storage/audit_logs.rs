use crate::models::audit_log::AuditLogEntry;
use crate::storage::memory::{get_audit_logs_memory, Memory};
use crate::storage::storable::{Cbor, StorableString};
use ic_stable_structures::StableBTreeMap;
use std::cell::RefCell;

// Vec per principal. Consider StableLog if the per-switch trail grows.
type StorableAuditLogVec = Cbor<Vec<AuditLogEntry>>;

thread_local! {
    /// Audit Logs: Key = "audit:{principal}", Value = Vec<AuditLogEntry>
    pub static LOGS: RefCell<StableBTreeMap<StorableString, StorableAuditLogVec, Memory>> = RefCell::new(
        StableBTreeMap::init(get_audit_logs_memory())
    );
}

/// Generates a key for the LOGS map.
/// Format: "audit:{principal}"
fn create_audit_log_key(subject: &str) -> StorableString {
    Cbor(format!("audit:{}", subject))
}

/// Appends an audit log entry for a principal's switch. The caller fills in
/// the timestamp; this layer never reads the clock.
pub fn add_entry(subject: &str, entry: AuditLogEntry) {
    LOGS.with(|map_ref| {
        let key = create_audit_log_key(subject);
        let mut map = map_ref.borrow_mut();

        let mut current_log_vec = map.get(&key).map(|cbor| cbor.0).unwrap_or_default();
        current_log_vec.push(entry);
        let _ = map.insert(key, Cbor(current_log_vec));
    });
}

/// Retrieves the full audit trail for a principal's switch.
pub fn get_entries(subject: &str) -> Vec<AuditLogEntry> {
    LOGS.with(|map_ref| {
        let key = create_audit_log_key(subject);
        map_ref
            .borrow()
            .get(&key)
            .map(|cbor| cbor.0)
            .unwrap_or_default()
    })
}
