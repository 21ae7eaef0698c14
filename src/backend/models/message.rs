// src/backend/models/message.rs
use crate::models::common::{MessageIndex, PrincipalId, TimestampNs};
use crate::models::confidential::CiphertextHandle;
use candid::CandidType;
use serde::{Deserialize, Serialize};

/// One stored message of a principal's append-only list. `index` is the
/// stable identifier used by `get_message` and `claim`. Immutable once
/// added, except for the claim-lifecycle fields, which are written by the
/// first successful claim only.
#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct SealedMessage {
    pub owner: PrincipalId,
    pub index: MessageIndex,
    /// Confidential recipient identifier, chunked into 32-byte ciphertext
    /// slots. Handles only; the plaintext never enters the canister.
    pub recipient_email_words: Vec<CiphertextHandle>,
    /// Exact original byte length of the identifier, needed to trim the
    /// zero padding of the final word on reconstruction.
    pub email_byte_len: u32,
    /// Confidential 128-bit partial secret, released (as a decryption
    /// grant) only on a successful claim.
    pub sk_share: CiphertextHandle,
    /// Public bytes, stored and returned verbatim.
    #[serde(with = "serde_bytes")]
    pub payload: Vec<u8>,
    pub added_at: TimestampNs,
    pub claimed: bool,
    pub claimed_by: Option<PrincipalId>,
    pub claimed_at: Option<TimestampNs>,
}
