// src/backend/services/message_service.rs
use crate::adapter::confidential;
use crate::error::SwitchError;
use crate::metrics;
use crate::models::audit_log::LogAction;
use crate::models::common::{MessageIndex, PrincipalId, TimestampNs};
use crate::models::confidential::CiphertextHandle;
use crate::models::message::SealedMessage;
use crate::services::record_audit;
use crate::storage;
use crate::utils::{chunks, log};

/// Appends a message to the caller's list and returns its index.
///
/// The recipient identifier arrives pre-chunked into 32-byte ciphertext
/// slots; `email_byte_len` must land inside the final slot so the
/// identifier can be reconstructed byte-exact after decryption.
///
/// # Errors
///
/// * `SwitchError::NotRegistered` - caller has no registration.
/// * `SwitchError::AlreadyDeceased` - caller already has a deceased mark;
///   no new messages post-notification.
/// * `SwitchError::InvalidLength` - byte length inconsistent with the
///   number of submitted words.
/// * `SwitchError::InvalidProof` - ingestion attestation rejected.
pub fn add_message(
    caller: PrincipalId,
    now: TimestampNs,
    recipient_email_words: Vec<CiphertextHandle>,
    email_byte_len: u32,
    sk_share: CiphertextHandle,
    payload: Vec<u8>,
    input_proof: Vec<u8>,
) -> Result<MessageIndex, SwitchError> {
    if !storage::registrations::contains_registration(&caller) {
        return Err(SwitchError::NotRegistered(caller.to_text()));
    }
    if storage::deceased_marks::contains_mark(&caller) {
        return Err(SwitchError::AlreadyDeceased(caller.to_text()));
    }
    if !chunks::is_consistent(recipient_email_words.len(), email_byte_len as usize) {
        return Err(SwitchError::InvalidLength {
            word_count: recipient_email_words.len() as u64,
            byte_len: email_byte_len as u64,
        });
    }

    // One attestation covers the whole batch: every email word plus the
    // secret share, in submission order.
    let handles: Vec<&CiphertextHandle> = recipient_email_words
        .iter()
        .chain(std::iter::once(&sk_share))
        .collect();
    confidential::verify_input_proof(&handles, &input_proof)?;

    let message = SealedMessage {
        owner: caller,
        index: 0, // assigned by storage on append
        recipient_email_words,
        email_byte_len,
        sk_share,
        payload,
        added_at: now,
        claimed: false,
        claimed_by: None,
        claimed_at: None,
    };
    let index = storage::messages::append_message(&message);

    record_audit(
        &caller,
        caller,
        now,
        LogAction::MessageAdded,
        Some(
            serde_json::json!({
                "index": index,
                "word_count": message.recipient_email_words.len(),
                "payload_bytes": message.payload.len(),
            })
            .to_string(),
        ),
    );
    metrics::record_message_added();
    log::print(format!(
        "INFO: {} stored message {} ({} email words)",
        caller,
        index,
        message.recipient_email_words.len()
    ));
    Ok(index)
}

/// Messages ever added for `principal`, claimed or not. Zero for unknown
/// principals; monotonically non-decreasing.
pub fn message_count(principal: &PrincipalId) -> u64 {
    storage::messages::message_count(principal)
}

/// Returns the stored record: ciphertext handles, byte length, secret-share
/// handle, public payload and claim-lifecycle fields. Plaintext access is
/// gated by the substrate's grant ledger, never by this call.
///
/// # Errors
///
/// Returns `SwitchError::MessageNotFound` if `index` is out of range.
pub fn get_message(
    principal: &PrincipalId,
    index: MessageIndex,
) -> Result<SealedMessage, SwitchError> {
    storage::messages::get_message(principal, index)
        .ok_or(SwitchError::MessageNotFound(index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::common::NANOS_PER_SEC;
    use crate::services::liveness_service;
    use candid::Principal;

    fn p(n: u8) -> Principal {
        Principal::from_slice(&[n])
    }

    fn sec(s: u64) -> TimestampNs {
        s * NANOS_PER_SEC
    }

    fn handle(seed: u8) -> CiphertextHandle {
        CiphertextHandle(vec![seed; 32])
    }

    /// Stands in for the client: chunk the address, mint one handle per
    /// word and attest the batch.
    fn sealed_email(email: &[u8], sk_seed: u8) -> (Vec<CiphertextHandle>, u32, CiphertextHandle, Vec<u8>) {
        let words: Vec<CiphertextHandle> = chunks::encode(email)
            .iter()
            .enumerate()
            .map(|(i, _)| handle(100 + i as u8))
            .collect();
        let sk_share = handle(sk_seed);
        let handles: Vec<&CiphertextHandle> =
            words.iter().chain(std::iter::once(&sk_share)).collect();
        let proof = confidential::batch_attestation(&handles);
        (words, email.len() as u32, sk_share, proof)
    }

    #[test]
    fn test_add_message_requires_registration() {
        let (words, len, sk, proof) = sealed_email(b"a@b.c", 1);
        assert!(matches!(
            add_message(p(1), sec(1), words, len, sk, vec![], proof),
            Err(SwitchError::NotRegistered(_))
        ));
    }

    #[test]
    fn test_add_message_rejected_after_mark() {
        let owner = p(1);
        liveness_service::register(owner, sec(0), 1, 1).unwrap();
        liveness_service::mark_deceased(p(2), sec(2), owner).unwrap();

        let (words, len, sk, proof) = sealed_email(b"a@b.c", 1);
        assert!(matches!(
            add_message(owner, sec(3), words, len, sk, vec![], proof),
            Err(SwitchError::AlreadyDeceased(_))
        ));
    }

    #[test]
    fn test_add_message_rejects_inconsistent_length() {
        let owner = p(1);
        liveness_service::register(owner, sec(0), 1, 1).unwrap();

        // Two words but a length that fits in one.
        let words = vec![handle(1), handle(2)];
        let sk = handle(3);
        let handles: Vec<&CiphertextHandle> =
            words.iter().chain(std::iter::once(&sk)).collect();
        let proof = confidential::batch_attestation(&handles);
        assert_eq!(
            add_message(owner, sec(1), words, 20, sk, vec![], proof),
            Err(SwitchError::InvalidLength {
                word_count: 2,
                byte_len: 20,
            })
        );

        // Length exceeding the words' total width.
        let words = vec![handle(1)];
        let sk = handle(3);
        let handles: Vec<&CiphertextHandle> =
            words.iter().chain(std::iter::once(&sk)).collect();
        let proof = confidential::batch_attestation(&handles);
        assert_eq!(
            add_message(owner, sec(1), words, 33, sk, vec![], proof),
            Err(SwitchError::InvalidLength {
                word_count: 1,
                byte_len: 33,
            })
        );
    }

    #[test]
    fn test_add_message_rejects_bad_proof() {
        let owner = p(1);
        liveness_service::register(owner, sec(0), 1, 1).unwrap();

        let (words, len, sk, mut proof) = sealed_email(b"test@gmail.com", 9);
        proof[0] ^= 0xff;
        assert!(matches!(
            add_message(owner, sec(1), words, len, sk, vec![], proof),
            Err(SwitchError::InvalidProof(_))
        ));
        assert_eq!(message_count(&owner), 0);
    }

    #[test]
    fn test_add_and_retrieve() {
        let owner = p(1);
        liveness_service::register(owner, sec(0), 1, 1).unwrap();

        let (words, len, sk, proof) = sealed_email(b"test@gmail.com", 9);
        let index = add_message(
            owner,
            sec(1),
            words.clone(),
            len,
            sk.clone(),
            b"public note".to_vec(),
            proof,
        )
        .unwrap();
        assert_eq!(index, 0);
        assert_eq!(message_count(&owner), 1);

        let message = get_message(&owner, 0).unwrap();
        assert_eq!(message.recipient_email_words, words);
        assert_eq!(message.email_byte_len, 14);
        assert_eq!(message.sk_share, sk);
        assert_eq!(message.payload, b"public note");
        assert!(!message.claimed);
        assert_eq!(message.claimed_by, None);
    }

    #[test]
    fn test_message_order_preserved() {
        let owner = p(1);
        liveness_service::register(owner, sec(0), 1, 1).unwrap();

        for i in 0..3u8 {
            let (words, len, sk, proof) = sealed_email(b"a@b.c", 50 + i);
            let index =
                add_message(owner, sec(1), words, len, sk, vec![i], proof).unwrap();
            assert_eq!(index, i as u64);
        }
        assert_eq!(message_count(&owner), 3);
        for i in 0..3u8 {
            assert_eq!(get_message(&owner, i as u64).unwrap().payload, vec![i]);
        }
    }

    #[test]
    fn test_counts_independent_across_principals() {
        let alice = p(1);
        let bob = p(2);
        liveness_service::register(alice, sec(0), 1, 1).unwrap();
        liveness_service::register(bob, sec(0), 1, 1).unwrap();

        let (words, len, sk, proof) = sealed_email(b"a@b.c", 7);
        add_message(alice, sec(1), words, len, sk, vec![], proof).unwrap();

        assert_eq!(message_count(&alice), 1);
        assert_eq!(message_count(&bob), 0);
    }

    #[test]
    fn test_empty_identifier_allowed() {
        let owner = p(1);
        liveness_service::register(owner, sec(0), 1, 1).unwrap();

        let sk = handle(9);
        let proof = confidential::batch_attestation(&[&sk]);
        add_message(owner, sec(1), vec![], 0, sk, vec![], proof).unwrap();
        let message = get_message(&owner, 0).unwrap();
        assert!(message.recipient_email_words.is_empty());
        assert_eq!(message.email_byte_len, 0);
    }

    #[test]
    fn test_get_message_out_of_range() {
        let owner = p(1);
        assert_eq!(
            get_message(&owner, 0),
            Err(SwitchError::MessageNotFound(0))
        );
    }
}
