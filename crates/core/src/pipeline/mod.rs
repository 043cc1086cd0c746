//! The sync engine tying mapping, diffing and encoding together.
//!
//! [`SyncEngine`] walks the source tree directory by directory. Within a
//! batch, plain copies run first and encodes run in parallel under one
//! bounded worker pool; once the batch settles a single post-encode hook
//! task is spawned for the directory. Hooks from all batches are awaited
//! before the optional prune phase deletes orphaned mirror entries.

mod error;
mod scheduler;
mod types;

pub use error::EngineError;
pub use scheduler::SyncEngine;
pub use types::{RunPhase, SyncReport, SyncStats};
