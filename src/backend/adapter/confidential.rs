// src/backend/adapter/confidential.rs
//
// Seam to the confidential-computation substrate. Ciphertexts are produced
// and decrypted entirely off-canister; this adapter verifies the batch
// attestation that accompanies submitted handles and keeps the per-viewer
// decryption-grant ledger the substrate consults before serving userDecrypt.

use crate::error::SwitchError;
use crate::models::common::{PrincipalId, TimestampNs};
use crate::models::confidential::CiphertextHandle;
use crate::storage;
use crate::utils::log;
use sha2::{Digest, Sha256};

/// Batch attestation over a set of handles in submission order. The
/// substrate emits this digest when it mints the handles; clients forward
/// it as the ingestion proof. The digest binds the batch, nothing more:
/// handle contents stay opaque to the canister.
pub fn batch_attestation(handles: &[&CiphertextHandle]) -> Vec<u8> {
    let mut hasher = Sha256::new();
    for handle in handles {
        hasher.update(&handle.0);
    }
    hasher.finalize().to_vec()
}

/// Verifies an ingestion proof for a batch of submitted handles.
///
/// # Errors
///
/// Returns `SwitchError::InvalidProof` if any handle is malformed or the
/// attestation digest does not match the submitted batch.
pub fn verify_input_proof(
    handles: &[&CiphertextHandle],
    proof: &[u8],
) -> Result<(), SwitchError> {
    for handle in handles {
        if !handle.is_well_formed() {
            return Err(SwitchError::InvalidProof(format!(
                "malformed ciphertext handle ({} bytes)",
                handle.0.len()
            )));
        }
    }
    if proof != batch_attestation(handles).as_slice() {
        return Err(SwitchError::InvalidProof(
            "attestation digest does not match submitted handles".to_string(),
        ));
    }
    Ok(())
}

/// Grants `viewer` decryption access to the ciphertext behind `handle`.
/// Idempotent; re-granting keeps the original grant timestamp.
pub fn grant_decrypt_access(
    handle: &CiphertextHandle,
    viewer: &PrincipalId,
    now: TimestampNs,
) {
    if storage::grants::insert_grant(handle, viewer, now) {
        log::print(format!(
            "INFO: decrypt access on {} granted to {}",
            handle.to_hex(),
            viewer
        ));
    }
}

/// The gate the substrate checks before serving userDecrypt.
pub fn has_decrypt_access(handle: &CiphertextHandle, viewer: &PrincipalId) -> bool {
    storage::grants::has_grant(handle, viewer)
}
