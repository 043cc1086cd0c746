//! Run state and counters for the sync engine.

use std::sync::atomic::{AtomicU64, Ordering};

/// Phase of a sync run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Idle,
    Scanning,
    Processing,
    Draining,
    Deleting,
    Done,
    Failed,
}

/// Counters updated concurrently by workers during a run.
#[derive(Default)]
pub struct SyncStats {
    files_copied: AtomicU64,
    files_encoded: AtomicU64,
    tags_carried: AtomicU64,
    files_deleted: AtomicU64,
    dirs_deleted: AtomicU64,
    hook_failures: AtomicU64,
}

impl SyncStats {
    pub fn record_copy(&self) {
        self.files_copied.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_encode(&self, carried_tags: usize) {
        self.files_encoded.fetch_add(1, Ordering::Relaxed);
        self.tags_carried
            .fetch_add(carried_tags as u64, Ordering::Relaxed);
    }

    pub fn record_file_deleted(&self) {
        self.files_deleted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_dir_deleted(&self) {
        self.dirs_deleted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_hook_failure(&self) {
        self.hook_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> SyncReport {
        SyncReport {
            files_copied: self.files_copied.load(Ordering::Relaxed),
            files_encoded: self.files_encoded.load(Ordering::Relaxed),
            tags_carried: self.tags_carried.load(Ordering::Relaxed),
            files_deleted: self.files_deleted.load(Ordering::Relaxed),
            dirs_deleted: self.dirs_deleted.load(Ordering::Relaxed),
            hook_failures: self.hook_failures.load(Ordering::Relaxed),
        }
    }
}

/// Final counters of a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyncReport {
    pub files_copied: u64,
    pub files_encoded: u64,
    pub tags_carried: u64,
    pub files_deleted: u64,
    pub dirs_deleted: u64,
    pub hook_failures: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_snapshot() {
        let stats = SyncStats::default();
        stats.record_copy();
        stats.record_copy();
        stats.record_encode(5);
        stats.record_file_deleted();
        stats.record_hook_failure();

        let report = stats.snapshot();
        assert_eq!(report.files_copied, 2);
        assert_eq!(report.files_encoded, 1);
        assert_eq!(report.tags_carried, 5);
        assert_eq!(report.files_deleted, 1);
        assert_eq!(report.dirs_deleted, 0);
        assert_eq!(report.hook_failures, 1);
    }
}
