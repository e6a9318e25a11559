//! Memoized standard-width ladders.
//!
//! A ladder depends only on its tolerance, so it is computed once per
//! distinct tolerance and shared by every request after that.
//!
//! # Design
//!
//! Slots are keyed by the tolerance's bit pattern. Each slot is an
//! `Arc<OnceLock<..>>`:
//!
//! 1. The hot path takes the read lock, clones the slot's `Arc`, and drops
//!    the lock.
//! 2. A miss takes the write lock only long enough to insert an empty slot.
//! 3. The ladder itself is computed through `OnceLock::get_or_init`, outside
//!    the map lock. Concurrent callers for the same tolerance block on the
//!    slot and the computation runs once.
//!
//! Lock poisoning is ignored: the map only ever holds fully-initialized
//! `Arc`s, so a panic elsewhere cannot leave it half-written.

use super::bounds::Tolerance;
use super::ladder::standard_widths;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};
use tracing::debug;

type Slot = Arc<OnceLock<Arc<[u32]>>>;

#[derive(Debug, Default)]
pub struct LadderCache {
    slots: RwLock<HashMap<u64, Slot>>,
}

impl LadderCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard ladder for `tolerance`, computing it on first use.
    pub fn get(&self, tolerance: Tolerance) -> Arc<[u32]> {
        let slot = self.slot(tolerance.key());
        slot.get_or_init(|| {
            let ladder: Arc<[u32]> = standard_widths(tolerance.value()).into();
            debug!(
                tolerance = tolerance.value(),
                widths = ladder.len(),
                "computed width ladder"
            );
            ladder
        })
        .clone()
    }

    /// Number of tolerances with a slot (filled or being filled).
    pub fn len(&self) -> usize {
        self.slots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slot(&self, key: u64) -> Slot {
        if let Some(slot) = self
            .slots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return slot.clone();
        }
        self.slots
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(key)
            .or_default()
            .clone()
    }
}
