use crate::models::common::TimestampNs;
use candid::{CandidType, Principal};
use serde::{Deserialize, Serialize};

/// Represents a single entry in the audit log for a principal's switch.
#[derive(CandidType, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct AuditLogEntry {
    /// Nanoseconds since epoch.
    pub timestamp: TimestampNs,
    /// Principal ID of the actor performing the action.
    pub actor: Principal,
    /// The specific action performed.
    pub action: LogAction,
    /// Optional details about the action (JSON-encoded).
    pub details: Option<String>,
    /// The principal whose switch this entry pertains to, as text.
    pub subject: String,
}

/// Enum representing the different types of actions that can be logged.
#[derive(CandidType, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub enum LogAction {
    Registered,
    CheckInRecorded,
    MessageAdded,
    DeceasedMarked,
    MessageClaimed,
}
