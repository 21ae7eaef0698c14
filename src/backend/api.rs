// src/backend/api.rs
// Candid endpoint definitions. This layer reads the caller identity and the
// IC clock exactly once per call and threads both into the services as
// explicit parameters; everything below it is deterministic.

use crate::{
    adapter::confidential,
    error::SwitchError,
    metrics::{self, SwitchMetrics},
    models::{
        audit_log::AuditLogEntry,
        common::{
            LivenessStatus, MessageIndex, TimestampNs, MAX_PAYLOAD_BYTES, MAX_RECIPIENT_WORDS,
        },
        confidential::CiphertextHandle,
        message::SealedMessage,
        registration::{DeceasedMark, Registration},
    },
    services::{claim_service, liveness_service, message_service},
    storage,
    utils::{guards, rate_limit, time},
};
use candid::{CandidType, Principal};
use ic_cdk::api::caller;
use ic_cdk_macros::{query, update};
use serde::Deserialize;
use std::cell::RefCell;
use validator::Validate;

thread_local! {
    /// Admin principal for metrics/listing endpoints, set from init args.
    static ADMIN_PRINCIPAL: RefCell<Principal> = RefCell::new(Principal::anonymous());
}

/// Called from init/post_upgrade with the deployment's admin identity.
pub fn set_admin_principal(admin: Principal) {
    ADMIN_PRINCIPAL.with(|cell| *cell.borrow_mut() = admin);
}

fn admin_guard(current_caller: &Principal) -> Result<(), SwitchError> {
    ADMIN_PRINCIPAL.with(|cell| guards::check_admin(&cell.borrow(), current_caller))
}

// --- Validation Helper ---
fn validate_request<T: Validate>(req: &T) -> Result<(), SwitchError> {
    req.validate()
        .map_err(|e| SwitchError::InvalidInput(e.to_string()))
}

// --- Request/Response Structs ---

#[derive(CandidType, Deserialize, Clone, Debug, Validate)]
pub struct RegisterRequest {
    #[validate(range(min = 1))]
    pub check_in_period_sec: u64,
    #[validate(range(min = 1))]
    pub grace_period_sec: u64,
}

#[derive(CandidType, Deserialize, Clone, Debug, Validate)]
pub struct AddMessageRequest {
    #[validate(length(max = MAX_RECIPIENT_WORDS))]
    pub recipient_email_words: Vec<CiphertextHandle>,
    pub email_byte_len: u32,
    pub sk_share: CiphertextHandle,
    #[serde(with = "serde_bytes")]
    #[validate(length(max = MAX_PAYLOAD_BYTES))]
    pub payload: Vec<u8>,
    #[serde(with = "serde_bytes")]
    #[validate(length(min = 32, max = 32))]
    pub input_proof: Vec<u8>,
}

#[derive(CandidType, Deserialize, Clone, Debug)]
pub struct ClaimRequest {
    pub principal: Principal,
    pub index: MessageIndex,
}

#[derive(CandidType, Deserialize, Clone, Debug)]
pub struct GetMessageRequest {
    pub principal: Principal,
    pub index: MessageIndex,
}

#[derive(CandidType, Deserialize, Validate)]
pub struct ListRequest {
    pub offset: Option<u64>,
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<u32>,
}

#[derive(CandidType, Deserialize, Clone, Debug)]
pub struct RegistrationSummary {
    pub owner: Principal,
    pub check_in_period_sec: u64,
    pub grace_period_sec: u64,
    pub last_check_in: TimestampNs,
    pub status: LivenessStatus,
}

#[derive(CandidType, Deserialize, Clone, Debug, Default)]
pub struct ListRegistrationsResponse {
    pub registrations: Vec<RegistrationSummary>,
    pub total: u64,
}

// --- Liveness Endpoints ---

#[update]
fn register(req: RegisterRequest) -> Result<(), SwitchError> {
    let caller = caller();
    guards::check_not_anonymous(&caller)?;
    validate_request(&req)?;
    liveness_service::register(
        caller,
        time::get_current_time_ns(),
        req.check_in_period_sec,
        req.grace_period_sec,
    )
}

#[update]
fn register_default() -> Result<(), SwitchError> {
    let caller = caller();
    guards::check_not_anonymous(&caller)?;
    liveness_service::register_default(caller, time::get_current_time_ns())
}

#[update]
fn ping() -> Result<(), SwitchError> {
    let caller = caller();
    let now = time::get_current_time_ns();
    guards::check_not_anonymous(&caller)?;
    rate_limit::rate_guard(&caller, now)?;
    liveness_service::ping(caller, now)
}

#[update]
fn mark_deceased(principal: Principal) -> Result<(), SwitchError> {
    let caller = caller();
    guards::check_not_anonymous(&caller)?;
    liveness_service::mark_deceased(caller, time::get_current_time_ns(), principal)
}

#[query]
fn is_overdue(principal: Principal) -> Result<bool, SwitchError> {
    liveness_service::is_overdue(&principal, time::get_current_time_ns())
}

#[query]
fn liveness_status(principal: Principal) -> Result<LivenessStatus, SwitchError> {
    liveness_service::liveness_status(&principal, time::get_current_time_ns())
}

#[query]
fn get_registration(principal: Principal) -> Result<Registration, SwitchError> {
    liveness_service::get_registration(&principal)
}

#[query]
fn get_deceased_mark(principal: Principal) -> Option<DeceasedMark> {
    liveness_service::get_deceased_mark(&principal)
}

// --- Message Endpoints ---

#[update]
fn add_message(req: AddMessageRequest) -> Result<MessageIndex, SwitchError> {
    let caller = caller();
    let now = time::get_current_time_ns();
    guards::check_not_anonymous(&caller)?;
    rate_limit::rate_guard(&caller, now)?;
    validate_request(&req)?;
    message_service::add_message(
        caller,
        now,
        req.recipient_email_words,
        req.email_byte_len,
        req.sk_share,
        req.payload,
        req.input_proof,
    )
}

#[query]
fn message_count(principal: Principal) -> u64 {
    message_service::message_count(&principal)
}

#[query]
fn get_message(req: GetMessageRequest) -> Result<SealedMessage, SwitchError> {
    message_service::get_message(&req.principal, req.index)
}

// --- Claim Endpoint ---

#[update]
fn claim(req: ClaimRequest) -> Result<SealedMessage, SwitchError> {
    let caller = caller();
    guards::check_not_anonymous(&caller)?;
    claim_service::claim(caller, time::get_current_time_ns(), req.principal, req.index)
}

// --- Grant Ledger Endpoint ---

#[query]
fn has_decrypt_access(handle: CiphertextHandle, viewer: Principal) -> bool {
    confidential::has_decrypt_access(&handle, &viewer)
}

// --- Audit, Metrics & Admin Endpoints ---

#[query]
fn get_audit_log(principal: Principal) -> Vec<AuditLogEntry> {
    storage::audit_logs::get_entries(&principal.to_text())
}

#[query]
fn get_metrics() -> Result<SwitchMetrics, SwitchError> {
    admin_guard(&caller())?;
    Ok(metrics::get_switch_metrics())
}

#[query]
fn list_registrations(req: ListRequest) -> Result<ListRegistrationsResponse, SwitchError> {
    let caller = caller();
    admin_guard(&caller)?;
    validate_request(&req)?;

    let now = time::get_current_time_ns();
    let offset = req.offset.unwrap_or(0);
    let limit = req.limit.unwrap_or(10) as usize;

    let (page, total) = storage::registrations::list_registrations(offset, limit);
    let registrations = page
        .into_iter()
        .map(|registration| {
            let status = if storage::deceased_marks::contains_mark(&registration.owner) {
                LivenessStatus::Deceased
            } else if registration.is_overdue(now) {
                LivenessStatus::Overdue
            } else {
                LivenessStatus::Alive
            };
            RegistrationSummary {
                owner: registration.owner,
                check_in_period_sec: registration.check_in_period_sec,
                grace_period_sec: registration.grace_period_sec,
                last_check_in: registration.last_check_in,
                status,
            }
        })
        .collect();

    Ok(ListRegistrationsResponse {
        registrations,
        total,
    })
}
