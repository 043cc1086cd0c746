//! Error type for the sync engine.

use std::path::PathBuf;
use thiserror::Error;

use crate::codec::CodecError;
use crate::differ::DifferError;
use crate::mapping::MappingError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Mapping(#[from] MappingError),

    #[error(transparent)]
    Differ(#[from] DifferError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    /// The configured encoder does not produce lossy files.
    #[error("Encoder '{name}' does not produce lossy output")]
    EncoderMismatch { name: String },

    #[error("Failed to copy {src} to {dst}: {source}")]
    CopyFailed {
        src: PathBuf,
        dst: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to delete {path}: {source}")]
    DeleteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A worker task panicked or was aborted.
    #[error("Worker task failed: {detail}")]
    WorkerFailed { detail: String },
}
