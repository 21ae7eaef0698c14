// src/backend/services/claim_service.rs
//
// Claim arbitration. A message becomes deliverable once its owner carries a
// deceased mark. For the first 24 hours the notifier who placed the mark
// has the exclusive right to claim; afterwards anyone may. A successful
// claim issues decryption grants to the requester; the lifecycle fields
// record the first claimant only and re-claims are idempotent re-grants.

use crate::adapter::confidential;
use crate::error::SwitchError;
use crate::metrics;
use crate::models::audit_log::LogAction;
use crate::models::common::{MessageIndex, PrincipalId, TimestampNs};
use crate::models::message::SealedMessage;
use crate::services::record_audit;
use crate::storage;
use crate::utils::log;

/// Arbitrates a claim for `principal`'s message at `index` by `requester`.
///
/// On success the requester is granted decryption access to every recipient
/// email word and to the secret share, and the returned record carries the
/// public payload plus the ciphertext handles the requester may now decrypt
/// through the substrate.
///
/// # Errors
///
/// * `SwitchError::MessageNotFound` - no message at `index`.
/// * `SwitchError::NotDeliverable` - owner has no deceased mark.
/// * `SwitchError::StillExclusiveForNotifier` - within the exclusivity
///   window and `requester` is not the notifier.
pub fn claim(
    requester: PrincipalId,
    now: TimestampNs,
    principal: PrincipalId,
    index: MessageIndex,
) -> Result<SealedMessage, SwitchError> {
    let mut message = storage::messages::get_message(&principal, index)
        .ok_or(SwitchError::MessageNotFound(index))?;

    let mark = storage::deceased_marks::get_mark(&principal)
        .ok_or_else(|| SwitchError::NotDeliverable(principal.to_text()))?;

    if mark.is_exclusive_to_notifier(now) && requester != mark.notified_by {
        return Err(SwitchError::StillExclusiveForNotifier);
    }

    // Grants are re-issued on every successful claim; eligibility was
    // re-checked above, so a repeat claim cannot widen access.
    for word in &message.recipient_email_words {
        confidential::grant_decrypt_access(word, &requester, now);
    }
    confidential::grant_decrypt_access(&message.sk_share, &requester, now);

    if !message.claimed {
        message.claimed = true;
        message.claimed_by = Some(requester);
        message.claimed_at = Some(now);
        let _ = storage::messages::update_message(&message);

        record_audit(
            &principal,
            requester,
            now,
            LogAction::MessageClaimed,
            Some(serde_json::json!({ "index": index }).to_string()),
        );
        metrics::record_claim();
        log::print(format!(
            "INFO: message {} of {} claimed by {}",
            index, principal, requester
        ));
    }

    Ok(message)
}
