//! Rolling driving-time window.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Time-ordered `(unix timestamp, seconds)` driving samples pruned to a
/// trailing horizon.
///
/// The running total always equals the sum of the retained samples.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollingWindow {
    horizon_secs: u64,
    entries: VecDeque<(i64, u64)>,
    total: u64,
}

impl RollingWindow {
    pub fn new(horizon_secs: u64) -> Self {
        Self {
            horizon_secs,
            entries: VecDeque::new(),
            total: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of the retained samples.
    pub fn sum(&self) -> u64 {
        self.total
    }

    pub fn push(&mut self, timestamp_unix: i64, secs: u64) {
        if secs == 0 {
            return;
        }
        self.entries.push_back((timestamp_unix, secs));
        self.total = self.total.saturating_add(secs);
    }

    /// Evict samples that are a full horizon or more older than `now_unix`.
    ///
    /// Returns how many samples were dropped.
    pub fn prune(&mut self, now_unix: i64) -> usize {
        let horizon = i64::try_from(self.horizon_secs).unwrap_or(i64::MAX);
        let threshold = now_unix.saturating_sub(horizon);
        let mut evicted = 0;
        while let Some(&(ts, secs)) = self.entries.front() {
            if ts > threshold {
                break;
            }
            self.entries.pop_front();
            self.total = self.total.saturating_sub(secs);
            evicted += 1;
        }
        evicted
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.total = 0;
    }

    pub fn iter(&self) -> impl Iterator<Item = &(i64, u64)> {
        self.entries.iter()
    }
}
