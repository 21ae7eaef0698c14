// src/backend/utils/rate_limit.rs
use crate::error::SwitchError;
use crate::models::common::TimestampNs;
use candid::Principal;
use std::cell::RefCell;
use std::collections::HashMap;

// --- Configuration ---
const RATE_LIMIT_CAPACITY: u32 = 20; // Max tokens in bucket (burst capacity)
const RATE_LIMIT_REFILL_RATE_PER_SEC: f64 = 1.0; // Tokens added per second

struct TokenBucket {
    tokens: f64,
    last_refill_time_ns: TimestampNs,
}

impl TokenBucket {
    fn new(now_ns: TimestampNs) -> Self {
        TokenBucket {
            tokens: RATE_LIMIT_CAPACITY as f64,
            last_refill_time_ns: now_ns,
        }
    }

    fn refill(&mut self, now_ns: TimestampNs) {
        let elapsed_secs =
            (now_ns.saturating_sub(self.last_refill_time_ns)) as f64 / 1_000_000_000.0;
        let tokens_to_add = elapsed_secs * RATE_LIMIT_REFILL_RATE_PER_SEC;

        self.tokens = (self.tokens + tokens_to_add).min(RATE_LIMIT_CAPACITY as f64);
        self.last_refill_time_ns = now_ns;
    }

    fn take(&mut self, now_ns: TimestampNs) -> bool {
        self.refill(now_ns);
        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}

thread_local! {
    // In-memory map for rate limiting. Cleared on upgrade.
    static PRINCIPAL_BUCKETS: RefCell<HashMap<Principal, TokenBucket>> = RefCell::new(HashMap::new());
}

/// Per-principal token-bucket guard for the hot update endpoints.
///
/// # Errors
///
/// Returns `SwitchError::RateLimitExceeded` when the caller's bucket is empty.
pub fn rate_guard(caller: &Principal, now_ns: TimestampNs) -> Result<(), SwitchError> {
    PRINCIPAL_BUCKETS.with(|buckets_refcell| {
        let mut buckets = buckets_refcell.borrow_mut();
        let bucket = buckets
            .entry(*caller)
            .or_insert_with(|| TokenBucket::new(now_ns));

        if bucket.take(now_ns) {
            Ok(())
        } else {
            Err(SwitchError::RateLimitExceeded(format!(
                "Rate limit exceeded for principal {}. Please try again later.",
                caller
            )))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_burst_then_refill() {
        let caller = Principal::from_slice(&[7]);
        let t0 = 1_000_000_000_000u64;

        for _ in 0..RATE_LIMIT_CAPACITY {
            assert!(rate_guard(&caller, t0).is_ok());
        }
        assert!(rate_guard(&caller, t0).is_err());

        // Two seconds of refill buys two more calls.
        let t1 = t0 + 2_000_000_000;
        assert!(rate_guard(&caller, t1).is_ok());
        assert!(rate_guard(&caller, t1).is_ok());
        assert!(rate_guard(&caller, t1).is_err());
    }

    #[test]
    fn test_buckets_are_per_principal() {
        let a = Principal::from_slice(&[1]);
        let b = Principal::from_slice(&[2]);
        let t0 = 5_000_000_000u64;

        for _ in 0..RATE_LIMIT_CAPACITY {
            assert!(rate_guard(&a, t0).is_ok());
        }
        assert!(rate_guard(&a, t0).is_err());
        assert!(rate_guard(&b, t0).is_ok());
    }
}
