// src/backend/lib.rs

pub mod adapter;
pub mod api;
pub mod error;
pub mod metrics;
pub mod models;
pub mod services;
pub mod storage;
pub mod utils;

use candid::Principal;

// Bring the endpoint request/response and model types into scope for the
// `export_candid!()` macro, which references them by bare name.
use crate::api::{
    AddMessageRequest, ClaimRequest, GetMessageRequest, ListRegistrationsResponse, ListRequest,
    RegisterRequest,
};
use crate::error::SwitchError;
use crate::metrics::SwitchMetrics;
use crate::models::audit_log::AuditLogEntry;
use crate::models::common::{LivenessStatus, MessageIndex};
use crate::models::confidential::CiphertextHandle;
use crate::models::message::SealedMessage;
use crate::models::registration::{DeceasedMark, Registration};

#[ic_cdk::init]
fn init(admin: Option<Principal>) {
    if let Some(admin) = admin {
        api::set_admin_principal(admin);
    }
    ic_cdk::println!("Sentinel switch canister initialized.");
}

#[ic_cdk::post_upgrade]
fn post_upgrade(admin: Option<Principal>) {
    if let Some(admin) = admin {
        api::set_admin_principal(admin);
    }
    let upgrades = storage::memory::record_upgrade();
    ic_cdk::println!("Sentinel switch canister upgraded ({} upgrades recorded).", upgrades);
}

// Export Candid interface
ic_cdk::export_candid!();
