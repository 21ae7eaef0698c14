// src/backend/models/confidential.rs
use crate::models::common::TimestampNs;
use candid::CandidType;
use serde::{Deserialize, Serialize};

/// Width of one ciphertext handle minted by the confidential-computation
/// substrate.
pub const HANDLE_BYTES: usize = 32;

/// Opaque reference to a ciphertext held by the confidential-computation
/// substrate. The canister never sees plaintext: it stores handles, forwards
/// them to viewers, and tracks per-viewer decryption grants. Decryption
/// itself happens off-canister via the substrate's `userDecrypt`.
#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct CiphertextHandle(#[serde(with = "serde_bytes")] pub Vec<u8>);

impl CiphertextHandle {
    pub fn is_well_formed(&self) -> bool {
        self.0.len() == HANDLE_BYTES
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

/// One decryption grant: `viewer` may ask the substrate to decrypt the
/// ciphertext behind a handle. Grants are never revoked.
#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct GrantRecord {
    pub granted_at: TimestampNs,
}
