// src/backend/error.rs
use candid::CandidType;
use serde::Deserialize;
use thiserror::Error;

#[derive(CandidType, Deserialize, Error, Debug, PartialEq, Eq)]
pub enum SwitchError {
    #[error("Caller is already registered")]
    AlreadyRegistered,

    #[error("Principal is not registered: {0}")]
    NotRegistered(String),

    #[error("Check-in and grace periods must both be greater than zero")]
    InvalidPeriod,

    #[error("Principal already marked deceased: {0}")]
    AlreadyDeceased(String),

    #[error("Check-in window has not elapsed yet for principal {0}")]
    TooSoon(String),

    #[error("No message at index {0}")]
    MessageNotFound(u64),

    #[error("No deceased mark exists for principal {0}; messages are not deliverable")]
    NotDeliverable(String),

    #[error("Claim window is still exclusive to the notifier")]
    StillExclusiveForNotifier,

    #[error("Byte length {byte_len} is inconsistent with {word_count} ciphertext words")]
    InvalidLength { word_count: u64, byte_len: u64 },

    #[error("Encryption proof rejected: {0}")]
    InvalidProof(String),

    #[error("Not authorized: {0}")]
    NotAuthorized(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    #[error("Storage error: {0}")]
    StorageError(String),
}
