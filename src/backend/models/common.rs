// src/backend/models/common.rs
use candid::{CandidType, Principal};
use serde::{Deserialize, Serialize};

pub type PrincipalId = Principal; // Identity of a registrant, notifier or claimant
pub type TimestampNs = u64;       // Nanoseconds since epoch (IC time)
pub type MessageIndex = u64;      // Position in a principal's append-only message list

pub const NANOS_PER_SEC: u64 = 1_000_000_000;

/// Built-in periods used by `register_default`.
pub const DEFAULT_CHECK_IN_PERIOD_SEC: u64 = 30 * 24 * 60 * 60; // 30 days
pub const DEFAULT_GRACE_PERIOD_SEC: u64 = 7 * 24 * 60 * 60; // 7 days

/// After a deceased mark, only the notifier may claim for this long.
pub const EXCLUSIVITY_WINDOW_SEC: u64 = 24 * 60 * 60;

/// Ingestion caps enforced at the API boundary.
pub const MAX_RECIPIENT_WORDS: u64 = 8; // 256 bytes, enough for any RFC 5321 address
pub const MAX_PAYLOAD_BYTES: u64 = 64 * 1024;

#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq, Copy)]
pub enum LivenessStatus {
    Alive,    // Registered, check-in window still open
    Overdue,  // Window elapsed, eligible for a deceased mark
    Deceased, // Deceased mark recorded, terminal
}
