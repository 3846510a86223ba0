//! # Scheduled Futures
//!
//! One-shot callbacks keyed by the tick at which they become due. A
//! callback registered for tick `k` runs on the first firing pass whose
//! current tick is `>= k`, exactly once.
//!
//! Due buckets are detached from the registry before any of their
//! callbacks run. A callback that schedules another future for the tick
//! being drained therefore lands in a fresh bucket, which fires on the
//! following pass.

use std::collections::BTreeMap;
use std::fmt;

/// A callback run once against the context `S` when its tick comes due.
pub type Future<S> = Box<dyn FnOnce(&mut S)>;

pub struct FutureRegistry<S> {
    pending: BTreeMap<u64, Vec<Future<S>>>,
}

impl<S> FutureRegistry<S> {
    pub fn new() -> Self {
        FutureRegistry {
            pending: BTreeMap::new(),
        }
    }

    /// Append `future` to the bucket for `when`. A tick at or before the
    /// current one is allowed and fires on the next pass.
    pub fn schedule(&mut self, when: u64, future: Future<S>) {
        self.pending.entry(when).or_default().push(future);
    }

    /// Remove every bucket due at `current_tick`, returning the callbacks
    /// in ascending tick order, registration order within a tick.
    pub fn take_due(&mut self, current_tick: u64) -> Vec<Future<S>> {
        let later = match current_tick.checked_add(1) {
            Some(next) => self.pending.split_off(&next),
            None => BTreeMap::new(),
        };
        let due = std::mem::replace(&mut self.pending, later);
        due.into_values().flatten().collect()
    }

    /// Run every callback due at `current_tick` against `context`.
    ///
    /// Only usable when the registry is not itself owned by `context`;
    /// the panel detaches due futures with [`take_due`](Self::take_due)
    /// instead.
    pub fn fire_due(&mut self, current_tick: u64, context: &mut S) -> usize {
        let due = self.take_due(current_tick);
        let fired = due.len();
        for future in due {
            future(context);
        }
        fired
    }

    /// Drop every pending callback without running it.
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Number of pending callbacks across all ticks.
    pub fn len(&self) -> usize {
        self.pending.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Earliest tick with a pending callback.
    pub fn next_due(&self) -> Option<u64> {
        self.pending.keys().next().copied()
    }
}

impl<S> Default for FutureRegistry<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> fmt::Debug for FutureRegistry<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.pending.iter().map(|(tick, bucket)| (tick, bucket.len())))
            .finish()
    }
}
