//! Session counters
//!
//! - Counters only, monotonic
//! - Reset only on process start
//! - Relaxed atomics; exactness per counter is all that matters

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Counters for everything a session does
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    advances: AtomicU64,
    retreats: AtomicU64,
    range_deletions: AtomicU64,
    composition_flushes: AtomicU64,
    suppressed_events: AtomicU64,
    pass_through_events: AtomicU64,
    imports: AtomicU64,
    contract_violations: AtomicU64,
    storage_failures: AtomicU64,
}

impl MetricsRegistry {
    /// Create a new metrics registry with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    // Transitions

    pub fn increment_advances(&self) {
        self.advances.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_retreats(&self) {
        self.retreats.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_range_deletions(&self) {
        self.range_deletions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_composition_flushes(&self) {
        self.composition_flushes.fetch_add(1, Ordering::Relaxed);
    }

    // Events without a transition

    pub fn increment_suppressed(&self) {
        self.suppressed_events.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_pass_through(&self) {
        self.pass_through_events.fetch_add(1, Ordering::Relaxed);
    }

    // Documents and failures

    pub fn increment_imports(&self) {
        self.imports.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_contract_violations(&self) {
        self.contract_violations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_storage_failures(&self) {
        self.storage_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Get all metrics as a snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            advances: self.advances.load(Ordering::Relaxed),
            retreats: self.retreats.load(Ordering::Relaxed),
            range_deletions: self.range_deletions.load(Ordering::Relaxed),
            composition_flushes: self.composition_flushes.load(Ordering::Relaxed),
            suppressed_events: self.suppressed_events.load(Ordering::Relaxed),
            pass_through_events: self.pass_through_events.load(Ordering::Relaxed),
            imports: self.imports.load(Ordering::Relaxed),
            contract_violations: self.contract_violations.load(Ordering::Relaxed),
            storage_failures: self.storage_failures.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time copy of all counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub advances: u64,
    pub retreats: u64,
    pub range_deletions: u64,
    pub composition_flushes: u64,
    pub suppressed_events: u64,
    pub pass_through_events: u64,
    pub imports: u64,
    pub contract_violations: u64,
    pub storage_failures: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_registry_has_zero_values() {
        assert_eq!(MetricsRegistry::new().snapshot(), MetricsSnapshot::default());
    }

    #[test]
    fn test_increment_counters() {
        let registry = MetricsRegistry::new();

        registry.increment_advances();
        registry.increment_advances();
        registry.increment_retreats();
        registry.increment_range_deletions();
        registry.increment_composition_flushes();
        registry.increment_suppressed();
        registry.increment_pass_through();
        registry.increment_imports();
        registry.increment_contract_violations();
        registry.increment_storage_failures();

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.advances, 2);
        assert_eq!(snapshot.retreats, 1);
        assert_eq!(snapshot.range_deletions, 1);
        assert_eq!(snapshot.composition_flushes, 1);
        assert_eq!(snapshot.suppressed_events, 1);
        assert_eq!(snapshot.pass_through_events, 1);
        assert_eq!(snapshot.imports, 1);
        assert_eq!(snapshot.contract_violations, 1);
        assert_eq!(snapshot.storage_failures, 1);
    }

    #[test]
    fn test_snapshot_serializes() {
        let registry = MetricsRegistry::new();
        registry.increment_advances();

        let json = serde_json::to_value(registry.snapshot()).unwrap();
        assert_eq!(json["advances"], 1);
        assert_eq!(json["retreats"], 0);
    }

    #[test]
    fn test_thread_safety() {
        use std::sync::Arc;
        use std::thread;

        let registry = Arc::new(MetricsRegistry::new());
        let mut handles = vec![];

        for _ in 0..10 {
            let reg = Arc::clone(&registry);
            handles.push(thread::spawn(move || {
                for _ in 0..100 {
                    reg.increment_advances();
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(registry.snapshot().advances, 1000);
    }
}
