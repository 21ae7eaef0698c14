// src/backend/storage/messages.rs
use crate::models::common::{MessageIndex, PrincipalId};
use crate::models::message::SealedMessage;
use crate::storage::memory::{get_message_counts_memory, get_messages_memory, Memory};
use crate::storage::storable::{Cbor, StorableString};
use ic_stable_structures::StableBTreeMap;
use std::cell::RefCell;

type StorableMessage = Cbor<SealedMessage>;
type StorableCount = Cbor<u64>;

thread_local! {
    /// Messages: Key = "msg:{principal}:{index}", Value = SealedMessage
    pub static MESSAGES: RefCell<StableBTreeMap<StorableString, StorableMessage, Memory>> = RefCell::new(
        StableBTreeMap::init(get_messages_memory())
    );

    /// Message counts: Key = principal text, Value = messages ever added.
    /// Kept alongside the message map so count queries stay O(1).
    pub static MESSAGE_COUNTS: RefCell<StableBTreeMap<StorableString, StorableCount, Memory>> = RefCell::new(
        StableBTreeMap::init(get_message_counts_memory())
    );
}

/// Generates a key for the MESSAGES map.
/// Format: "msg:{principal}:{index:010}" (zero-padded so lexicographic
/// order matches insertion order within a principal).
fn create_message_key(principal: &PrincipalId, index: MessageIndex) -> StorableString {
    Cbor(format!("msg:{}:{:010}", principal.to_text(), index))
}

fn create_count_key(principal: &PrincipalId) -> StorableString {
    Cbor(principal.to_text())
}

/// Number of messages ever added for a principal (claimed or not).
pub fn message_count(principal: &PrincipalId) -> u64 {
    let key = create_count_key(principal);
    MESSAGE_COUNTS.with(|map_ref| map_ref.borrow().get(&key).map(|cbor| cbor.0).unwrap_or(0))
}

/// Appends a message at the next free index and bumps the count.
/// Returns the index the message was stored at.
pub fn append_message(message: &SealedMessage) -> MessageIndex {
    let index = message_count(&message.owner);
    let mut stored = message.clone();
    stored.index = index;

    MESSAGES.with(|map_ref| {
        let _ = map_ref
            .borrow_mut()
            .insert(create_message_key(&message.owner, index), Cbor(stored));
    });
    MESSAGE_COUNTS.with(|map_ref| {
        let _ = map_ref.borrow_mut().insert(
            create_count_key(&message.owner),
            Cbor(index.saturating_add(1)),
        );
    });
    index
}

pub fn get_message(principal: &PrincipalId, index: MessageIndex) -> Option<SealedMessage> {
    let key = create_message_key(principal, index);
    MESSAGES.with(|map_ref| map_ref.borrow().get(&key).map(|cbor| cbor.0))
}

/// Writes back a message's claim-lifecycle fields.
pub fn update_message(message: &SealedMessage) -> Option<SealedMessage> {
    let key = create_message_key(&message.owner, message.index);
    MESSAGES.with(|map_ref| {
        map_ref
            .borrow_mut()
            .insert(key, Cbor(message.clone()))
            .map(|prev_cbor| prev_cbor.0)
    })
}
