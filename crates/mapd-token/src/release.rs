//! `ReleaseQueue` — the static task schedule, keyed by release tick.
//!
//! # Why this exists
//!
//! The driver advances simulated time in jumps (to the next deciding agent's
//! `finish_time`), not one tick at a time, so "release the tasks whose tick
//! has arrived" must be a range drain, not a single-key lookup.  A
//! `BTreeMap<Tick, Vec<TaskId>>` gives ordered range access: draining up to
//! a tick yields batches in release order, and tasks within a batch keep
//! their declaration order — which is exactly the FIFO claim order the
//! protocol promises.

use std::collections::BTreeMap;

use mapd_core::{TaskId, Tick};

/// Maps release ticks → tasks that appear at that tick.
#[derive(Debug, Default)]
pub struct ReleaseQueue {
    inner: BTreeMap<Tick, Vec<TaskId>>,
    /// Cached total entry count for O(1) `len()`.
    total: usize,
    /// Largest release tick ever pushed — the loop runs at least this far.
    last_release: Tick,
}

impl ReleaseQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `task` to appear at `tick`.
    pub fn push(&mut self, tick: Tick, task: TaskId) {
        self.inner.entry(tick).or_default().push(task);
        self.total += 1;
        self.last_release = self.last_release.max(tick);
    }

    /// Remove and return all tasks with release tick `≤ tick`, in release
    /// order (and declaration order within a batch).
    pub fn drain_through(&mut self, tick: Tick) -> Vec<TaskId> {
        let mut released = Vec::new();
        while let Some(entry) = self.inner.first_entry() {
            if *entry.key() > tick {
                break;
            }
            let mut batch = entry.remove();
            self.total -= batch.len();
            released.append(&mut batch);
        }
        released
    }

    /// The earliest tick with at least one scheduled task, or `None` if the
    /// whole schedule has been drained.
    pub fn next_tick(&self) -> Option<Tick> {
        self.inner.keys().next().copied()
    }

    /// Largest release tick ever pushed (`Tick::ZERO` for an empty queue).
    pub fn last_release_tick(&self) -> Tick {
        self.last_release
    }

    /// Total tasks still scheduled across all future ticks.
    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}
