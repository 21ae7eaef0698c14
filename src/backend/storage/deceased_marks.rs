// src/backend/storage/deceased_marks.rs
use crate::models::common::PrincipalId;
use crate::models::registration::DeceasedMark;
use crate::storage::memory::{get_deceased_marks_memory, Memory};
use crate::storage::storable::{Cbor, StorableString};
use ic_stable_structures::StableBTreeMap;
use std::cell::RefCell;

type StorableDeceasedMark = Cbor<DeceasedMark>;

thread_local! {
    /// Deceased marks: Key = principal text, Value = DeceasedMark.
    /// At most one per principal; never overwritten once present.
    pub static DECEASED_MARKS: RefCell<StableBTreeMap<StorableString, StorableDeceasedMark, Memory>> = RefCell::new(
        StableBTreeMap::init(get_deceased_marks_memory())
    );
}

fn create_mark_key(principal: &PrincipalId) -> StorableString {
    Cbor(principal.to_text())
}

/// Inserts a mark for a principal. Returns the previous mark if one
/// existed; callers treat that as a logic error upstream.
pub fn insert_mark(principal: &PrincipalId, mark: &DeceasedMark) -> Option<DeceasedMark> {
    let key = create_mark_key(principal);
    DECEASED_MARKS.with(|map_ref| {
        map_ref
            .borrow_mut()
            .insert(key, Cbor(mark.clone()))
            .map(|prev_cbor| prev_cbor.0)
    })
}

pub fn get_mark(principal: &PrincipalId) -> Option<DeceasedMark> {
    let key = create_mark_key(principal);
    DECEASED_MARKS.with(|map_ref| map_ref.borrow().get(&key).map(|cbor| cbor.0))
}

pub fn contains_mark(principal: &PrincipalId) -> bool {
    let key = create_mark_key(principal);
    DECEASED_MARKS.with(|map_ref| map_ref.borrow().contains_key(&key))
}
