// src/backend/storage/registrations.rs
use crate::models::common::PrincipalId;
use crate::models::registration::Registration;
use crate::storage::memory::{get_registrations_memory, Memory};
use crate::storage::storable::{Cbor, StorableString};
use ic_stable_structures::StableBTreeMap;
use std::cell::RefCell;

type StorableRegistration = Cbor<Registration>;

thread_local! {
    /// Registrations: Key = principal text, Value = Registration
    pub static REGISTRATIONS: RefCell<StableBTreeMap<StorableString, StorableRegistration, Memory>> = RefCell::new(
        StableBTreeMap::init(get_registrations_memory())
    );
}

fn create_registration_key(principal: &PrincipalId) -> StorableString {
    Cbor(principal.to_text())
}

/// Inserts or updates a registration.
pub fn insert_registration(registration: &Registration) -> Option<Registration> {
    let key = create_registration_key(&registration.owner);
    REGISTRATIONS.with(|map_ref| {
        map_ref
            .borrow_mut()
            .insert(key, Cbor(registration.clone()))
            .map(|prev_cbor| prev_cbor.0)
    })
}

/// Retrieves a registration by principal.
pub fn get_registration(principal: &PrincipalId) -> Option<Registration> {
    let key = create_registration_key(principal);
    REGISTRATIONS.with(|map_ref| map_ref.borrow().get(&key).map(|cbor| cbor.0))
}

pub fn contains_registration(principal: &PrincipalId) -> bool {
    let key = create_registration_key(principal);
    REGISTRATIONS.with(|map_ref| map_ref.borrow().contains_key(&key))
}

/// Paginated listing for the admin API. Returns the page and total count.
pub fn list_registrations(offset: u64, limit: usize) -> (Vec<Registration>, u64) {
    REGISTRATIONS.with(|map_ref| {
        let map = map_ref.borrow();
        let total = map.len();
        let page = map
            .iter()
            .skip(offset as usize)
            .take(limit)
            .map(|(_key, value)| value.0)
            .collect();
        (page, total)
    })
}
