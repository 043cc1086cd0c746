//! Error types for the codec module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while decoding, encoding or post-processing.
#[derive(Debug, Error)]
pub enum CodecError {
    /// External binary not found.
    #[error("Binary not found at path: {binary}")]
    BinaryNotFound { binary: PathBuf },

    /// Decoder process failed.
    #[error("Failed to decode {path}: {detail}")]
    DecodeFailed { path: PathBuf, detail: String },

    /// Encoder process failed.
    #[error("Failed to encode {path}: {detail}")]
    EncodeFailed { path: PathBuf, detail: String },

    /// Output directory does not exist and could not be created.
    #[error("Failed to create output directory {path}: {source}")]
    OutputDirectoryFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading or writing tags failed.
    #[error("Failed to transfer tags from {source_path} to {dest_path}: {detail}")]
    TagTransferFailed {
        source_path: PathBuf,
        dest_path: PathBuf,
        detail: String,
    },

    /// A decode/encode job exceeded its time budget.
    #[error("Job timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// A post-encode hook failed.
    #[error("Hook '{name}' failed in {directory}: {detail}")]
    HookFailed {
        name: String,
        directory: PathBuf,
        detail: String,
    },

    /// I/O error while piping streams.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CodecError {
    pub fn decode_failed(path: impl Into<PathBuf>, detail: impl Into<String>) -> Self {
        Self::DecodeFailed {
            path: path.into(),
            detail: detail.into(),
        }
    }

    pub fn encode_failed(path: impl Into<PathBuf>, detail: impl Into<String>) -> Self {
        Self::EncodeFailed {
            path: path.into(),
            detail: detail.into(),
        }
    }

    pub fn hook_failed(
        name: impl Into<String>,
        directory: impl Into<PathBuf>,
        detail: impl Into<String>,
    ) -> Self {
        Self::HookFailed {
            name: name.into(),
            directory: directory.into(),
            detail: detail.into(),
        }
    }
}
