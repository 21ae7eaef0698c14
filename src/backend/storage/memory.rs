// src/backend/storage/memory.rs
use ic_stable_structures::memory_manager::{MemoryId, MemoryManager, VirtualMemory};
use ic_stable_structures::{DefaultMemoryImpl, StableCell};
use std::cell::RefCell;

// Define Memory IDs for stable structures
// Choose non-overlapping IDs
const UPGRADES_MEMORY_ID: MemoryId = MemoryId::new(0);
const REGISTRATIONS_MEM_ID: MemoryId = MemoryId::new(1);
const DECEASED_MARKS_MEM_ID: MemoryId = MemoryId::new(2);
const MESSAGES_MEM_ID: MemoryId = MemoryId::new(3);
const MESSAGE_COUNTS_MEM_ID: MemoryId = MemoryId::new(4);
const GRANTS_MEM_ID: MemoryId = MemoryId::new(5);
const AUDIT_LOGS_MEM_ID: MemoryId = MemoryId::new(6);
const METRICS_MEM_ID: MemoryId = MemoryId::new(7);
// Reserve IDs 8-19 for future use

// Define memory type alias
pub type Memory = VirtualMemory<DefaultMemoryImpl>;

thread_local! {
    // Memory manager
    static MEMORY_MANAGER: RefCell<MemoryManager<DefaultMemoryImpl>> = RefCell::new(
        MemoryManager::init(DefaultMemoryImpl::default())
    );

    // Stable cell counting completed upgrades
    static UPGRADES: RefCell<StableCell<u64, Memory>> = RefCell::new(
        StableCell::init(MEMORY_MANAGER.with(|m| m.borrow().get(UPGRADES_MEMORY_ID)), 0)
            .expect("Failed to initialize upgrades cell")
    );
}

/// Get memory instance for a specific MemoryId.
pub fn get_memory(id: MemoryId) -> Memory {
    MEMORY_MANAGER.with(|m| m.borrow().get(id))
}

/// Bumps the upgrade counter and returns the new value.
pub fn record_upgrade() -> u64 {
    UPGRADES.with(|cell| {
        let next = cell.borrow().get().saturating_add(1);
        cell.borrow_mut()
            .set(next)
            .expect("Failed to record upgrade");
        next
    })
}

// Functions to get specific memory instances
pub fn get_registrations_memory() -> Memory {
    get_memory(REGISTRATIONS_MEM_ID)
}

pub fn get_deceased_marks_memory() -> Memory {
    get_memory(DECEASED_MARKS_MEM_ID)
}

pub fn get_messages_memory() -> Memory {
    get_memory(MESSAGES_MEM_ID)
}

pub fn get_message_counts_memory() -> Memory {
    get_memory(MESSAGE_COUNTS_MEM_ID)
}

pub fn get_grants_memory() -> Memory {
    get_memory(GRANTS_MEM_ID)
}

pub fn get_audit_logs_memory() -> Memory {
    get_memory(AUDIT_LOGS_MEM_ID)
}

pub fn get_metrics_memory() -> Memory {
    get_memory(METRICS_MEM_ID)
}
