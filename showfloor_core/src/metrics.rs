//! Scene Metrics
//! =============
//!
//! Counters for the things the viewer never sees fail: throttled refreshes,
//! stats fetches and activation polls. Updated from the tick and from
//! spawned tasks, so every counter is atomic.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::stats::FetchOutcome;

/// Live counters shared between the runtime and its background tasks.
#[derive(Debug, Default)]
pub struct SceneMetrics {
    ticks: AtomicU64,
    status_refreshes: AtomicU64,
    stats_issued: AtomicU64,
    stats_applied: AtomicU64,
    stats_empty: AtomicU64,
    stats_failed: AtomicU64,
    stats_discarded: AtomicU64,
    stats_superseded: AtomicU64,
    activation_polls: AtomicU64,
}

/// Point-in-time copy of [`SceneMetrics`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub ticks: u64,
    pub status_refreshes: u64,
    pub stats_issued: u64,
    pub stats_applied: u64,
    pub stats_empty: u64,
    pub stats_failed: u64,
    pub stats_discarded: u64,
    pub stats_superseded: u64,
    pub activation_polls: u64,
}

impl SceneMetrics {
    pub fn record_tick(&self) {
        self.ticks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_status_refresh(&self) {
        self.status_refreshes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_stats_issued(&self) {
        self.stats_issued.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fetch(&self, outcome: FetchOutcome) {
        let counter = match outcome {
            FetchOutcome::Applied => &self.stats_applied,
            FetchOutcome::Empty => &self.stats_empty,
            FetchOutcome::Failed => &self.stats_failed,
            FetchOutcome::Discarded => &self.stats_discarded,
            FetchOutcome::Superseded => &self.stats_superseded,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_activation_polls(&self, polls: u32) {
        self.activation_polls.fetch_add(u64::from(polls), Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            ticks: self.ticks.load(Ordering::Relaxed),
            status_refreshes: self.status_refreshes.load(Ordering::Relaxed),
            stats_issued: self.stats_issued.load(Ordering::Relaxed),
            stats_applied: self.stats_applied.load(Ordering::Relaxed),
            stats_empty: self.stats_empty.load(Ordering::Relaxed),
            stats_failed: self.stats_failed.load(Ordering::Relaxed),
            stats_discarded: self.stats_discarded.load(Ordering::Relaxed),
            stats_superseded: self.stats_superseded.load(Ordering::Relaxed),
            activation_polls: self.activation_polls.load(Ordering::Relaxed),
        }
    }
}

impl MetricsSnapshot {
    /// Fetches that have completed, whatever the outcome.
    pub fn stats_completed(&self) -> u64 {
        self.stats_applied
            + self.stats_empty
            + self.stats_failed
            + self.stats_discarded
            + self.stats_superseded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_outcomes_bucketed() {
        let metrics = SceneMetrics::default();
        metrics.record_stats_issued();
        metrics.record_stats_issued();
        metrics.record_stats_issued();
        metrics.record_fetch(FetchOutcome::Applied);
        metrics.record_fetch(FetchOutcome::Failed);
        metrics.record_fetch(FetchOutcome::Superseded);

        let snap = metrics.snapshot();
        assert_eq!(snap.stats_issued, 3);
        assert_eq!(snap.stats_applied, 1);
        assert_eq!(snap.stats_failed, 1);
        assert_eq!(snap.stats_superseded, 1);
        assert_eq!(snap.stats_completed(), 3);
    }
}
