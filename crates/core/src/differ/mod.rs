//! Directory tree comparison between the source library and its mirror.
//!
//! Two independent walks: [`SourceScan`] yields per-directory batches of
//! source files whose mirror counterpart is missing or stale, and
//! [`OrphanScan`] yields mirror entries with no surviving source origin.
//! Both are lazy; directories are visited depth-first in sorted order and
//! nothing is read ahead of the caller.

mod error;
mod orphans;
mod source;
mod types;

pub use error::DifferError;
pub use orphans::OrphanScan;
pub use source::SourceScan;
pub use types::{DiffBatch, OrphanBatch};

use std::sync::Arc;

use crate::mapping::PathMapper;

/// Entry point for both scan directions over one mapper.
pub struct DirectoryDiffer {
    mapper: Arc<PathMapper>,
}

impl DirectoryDiffer {
    pub fn new(mapper: Arc<PathMapper>) -> Self {
        Self { mapper }
    }

    /// Starts a fresh walk of the source tree for missing or stale mirrors.
    pub fn source_changes(&self) -> SourceScan {
        SourceScan::new(Arc::clone(&self.mapper))
    }

    /// Starts a fresh walk of the mirror tree for orphaned entries.
    pub fn mirror_orphans(&self) -> OrphanScan {
        OrphanScan::new(Arc::clone(&self.mapper))
    }
}
