use crate::metrics::SwitchMetrics;
use crate::storage::memory::{get_metrics_memory, Memory};
use crate::storage::storable::Cbor;
use ic_stable_structures::StableCell;
use std::cell::RefCell;

type StorableSwitchMetrics = Cbor<SwitchMetrics>;

thread_local! {
    /// Global switch metrics
    pub static METRICS_CELL: RefCell<StableCell<StorableSwitchMetrics, Memory>> = RefCell::new(
        StableCell::init(get_metrics_memory(), Cbor(SwitchMetrics::default()))
            .expect("Failed to initialize metrics stable cell")
    );
}

pub fn get_metrics() -> SwitchMetrics {
    METRICS_CELL.with(|cell| cell.borrow().get().0.clone())
}

/// Helper function to update metrics.
pub fn update_metrics<F>(update_fn: F) -> Result<(), String>
where
    F: FnOnce(&mut SwitchMetrics),
{
    METRICS_CELL.with(|cell| {
        let mut metrics = cell.borrow().get().0.clone();
        update_fn(&mut metrics);
        cell.borrow_mut()
            .set(Cbor(metrics))
            .map(|_prev| ())
            .map_err(|e| format!("Failed to update metrics: {:?}", e))
    })
}
