// src/backend/metrics.rs
use crate::storage;
use crate::utils::log;
use candid::CandidType;
use serde::{Deserialize, Serialize};

/// Global counters for the canister, persisted in a stable cell.
#[derive(CandidType, Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct SwitchMetrics {
    pub registrations_total: u64,
    pub check_ins_total: u64,
    pub messages_total: u64,
    pub deceased_marks_total: u64,
    pub claims_total: u64,
}

// Metrics must never fail a core operation; failures are logged and dropped.
fn record<F>(update_fn: F)
where
    F: FnOnce(&mut SwitchMetrics),
{
    if let Err(e) = storage::update_metrics(update_fn) {
        log::print(format!("WARNING: metrics update failed: {}", e));
    }
}

pub fn record_registration() {
    record(|m| m.registrations_total = m.registrations_total.saturating_add(1));
}

pub fn record_check_in() {
    record(|m| m.check_ins_total = m.check_ins_total.saturating_add(1));
}

pub fn record_message_added() {
    record(|m| m.messages_total = m.messages_total.saturating_add(1));
}

pub fn record_deceased_mark() {
    record(|m| m.deceased_marks_total = m.deceased_marks_total.saturating_add(1));
}

pub fn record_claim() {
    record(|m| m.claims_total = m.claims_total.saturating_add(1));
}

pub fn get_switch_metrics() -> SwitchMetrics {
    storage::get_metrics()
}
