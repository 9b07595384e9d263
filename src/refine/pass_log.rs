//! Append-only audit trail, one entry per (category, pass).
//!
//! Entries are handed to a `PassLogSink` as they are produced. Delivery is
//! fire-and-forget: the loop never waits on or reads back from the sink.

use serde::Serialize;
use sha2::{Digest, Sha256};
use std::sync::Mutex;
use tracing::info;

use super::acceptance::FailureReason;
use super::aggregate::SelectionMetrics;
use super::selector::SelectedItem;
use crate::params::{CategoryThresholds, ScoringPenalties, ScoringWeights};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PassLog {
    pub category: String,
    pub pass_number: u32,
    pub metrics: SelectionMetrics,
    pub thresholds: CategoryThresholds,
    pub weights: ScoringWeights,
    pub penalties: ScoringPenalties,
    pub accepted: bool,
    pub failure_reasons: Vec<FailureReason>,
    /// Short fingerprint of the ordered selected ids (replay comparison).
    pub selection_digest: String,
}

/// Receiver of pass log entries. Must tolerate concurrent appends from
/// loops of different categories.
pub trait PassLogSink: Send + Sync {
    fn record(&self, entry: PassLog);
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPassLog;

impl PassLogSink for NoopPassLog {
    fn record(&self, _entry: PassLog) {}
}

/// Emits each entry as a structured `tracing` event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingPassLog;

impl PassLogSink for TracingPassLog {
    fn record(&self, entry: PassLog) {
        let reasons: Vec<String> = entry.failure_reasons.iter().map(|r| r.to_string()).collect();
        info!(
            target: "refine",
            category = %entry.category,
            pass = entry.pass_number,
            accepted = entry.accepted,
            items = entry.metrics.item_count,
            avg_sensationalism = entry.metrics.avg_sensationalism,
            max_sensationalism = entry.thresholds.max_sensationalism,
            digest = %entry.selection_digest,
            reasons = ?reasons,
            "pass logged"
        );
    }
}

/// In-memory sink. With a capacity, the oldest entries are dropped first.
#[derive(Debug)]
pub struct MemoryPassLog {
    inner: Mutex<Vec<PassLog>>,
    cap: Option<usize>,
}

impl Default for MemoryPassLog {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryPassLog {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Vec::new()),
            cap: None,
        }
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            inner: Mutex::new(Vec::with_capacity(cap.min(10_000))),
            cap: Some(cap),
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn snapshot(&self) -> Vec<PassLog> {
        self.lock().clone()
    }

    pub fn snapshot_last_n(&self, n: usize) -> Vec<PassLog> {
        let v = self.lock();
        let start = v.len().saturating_sub(n);
        v[start..].to_vec()
    }

    /// Entries of one category in pass order.
    pub fn for_category(&self, category: &str) -> Vec<PassLog> {
        let mut out: Vec<PassLog> = self
            .lock()
            .iter()
            .filter(|e| e.category == category)
            .cloned()
            .collect();
        out.sort_by_key(|e| e.pass_number);
        out
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<PassLog>> {
        // entries are pushed whole, so a poisoned lock still holds a valid log
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl PassLogSink for MemoryPassLog {
    fn record(&self, entry: PassLog) {
        let mut v = self.lock();
        v.push(entry);
        if let Some(cap) = self.cap {
            if v.len() > cap {
                let excess = v.len() - cap;
                v.drain(0..excess);
            }
        }
    }
}

/// First 6 bytes of SHA-256 over the ordered ids, hex encoded.
pub fn selection_digest(selection: &[SelectedItem]) -> String {
    let mut hasher = Sha256::new();
    for item in selection {
        hasher.update(item.candidate.id.as_bytes());
        hasher.update([0u8]);
    }
    let digest = hasher.finalize();
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(category: &str, pass: u32) -> PassLog {
        PassLog {
            category: category.into(),
            pass_number: pass,
            metrics: SelectionMetrics::default(),
            thresholds: CategoryThresholds::default(),
            weights: ScoringWeights::default(),
            penalties: ScoringPenalties::default(),
            accepted: false,
            failure_reasons: vec![FailureReason::TooFewItems { count: 0, min: 5 }],
            selection_digest: selection_digest(&[]),
        }
    }

    #[test]
    fn capacity_drops_oldest() {
        let log = MemoryPassLog::with_capacity(3);
        for pass in 1..=5 {
            log.record(entry("science", pass));
        }
        let passes: Vec<u32> = log.snapshot().iter().map(|e| e.pass_number).collect();
        assert_eq!(passes, vec![3, 4, 5]);
        assert_eq!(log.snapshot_last_n(2).len(), 2);
    }

    #[test]
    fn per_category_query_is_ordered() {
        let log = MemoryPassLog::new();
        log.record(entry("health", 2));
        log.record(entry("science", 1));
        log.record(entry("health", 1));
        let health: Vec<u32> = log.for_category("health").iter().map(|e| e.pass_number).collect();
        assert_eq!(health, vec![1, 2]);
    }

    #[test]
    fn digest_is_stable_and_short() {
        let d = selection_digest(&[]);
        assert_eq!(d.len(), 12);
        assert_eq!(d, selection_digest(&[]));
    }
}
