// src/backend/storage/grants.rs
use crate::models::common::{PrincipalId, TimestampNs};
use crate::models::confidential::{CiphertextHandle, GrantRecord};
use crate::storage::memory::{get_grants_memory, Memory};
use crate::storage::storable::{Cbor, StorableString};
use ic_stable_structures::StableBTreeMap;
use std::cell::RefCell;

type StorableGrant = Cbor<GrantRecord>;

thread_local! {
    /// Decryption grants: Key = "grant:{handle_hex}:{viewer}", Value = GrantRecord.
    /// The confidential-computation substrate consults this ledger before
    /// serving userDecrypt for a handle.
    pub static GRANTS: RefCell<StableBTreeMap<StorableString, StorableGrant, Memory>> = RefCell::new(
        StableBTreeMap::init(get_grants_memory())
    );
}

fn create_grant_key(handle: &CiphertextHandle, viewer: &PrincipalId) -> StorableString {
    Cbor(format!("grant:{}:{}", handle.to_hex(), viewer.to_text()))
}

/// Records a grant. Idempotent: an existing grant keeps its original
/// `granted_at`. Returns true if a new grant was written.
pub fn insert_grant(handle: &CiphertextHandle, viewer: &PrincipalId, now: TimestampNs) -> bool {
    let key = create_grant_key(handle, viewer);
    GRANTS.with(|map_ref| {
        let mut map = map_ref.borrow_mut();
        if map.contains_key(&key) {
            return false;
        }
        let _ = map.insert(key, Cbor(GrantRecord { granted_at: now }));
        true
    })
}

pub fn has_grant(handle: &CiphertextHandle, viewer: &PrincipalId) -> bool {
    let key = create_grant_key(handle, viewer);
    GRANTS.with(|map_ref| map_ref.borrow().contains_key(&key))
}

pub fn get_grant(handle: &CiphertextHandle, viewer: &PrincipalId) -> Option<GrantRecord> {
    let key = create_grant_key(handle, viewer);
    GRANTS.with(|map_ref| map_ref.borrow().get(&key).map(|cbor| cbor.0))
}
