//! Error types for the mapping module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while validating roots or translating paths.
#[derive(Debug, Error)]
pub enum MappingError {
    /// A configured root does not exist or is not a directory.
    #[error("'{path}' is not an existing directory")]
    InvalidRoot { path: PathBuf },

    /// The mirror root lives inside the source root (or is the same path).
    #[error("mirror root '{mirror}' is inside source root '{source_root}'")]
    NestedRoots { source_root: PathBuf, mirror: PathBuf },

    /// A path handed to the forward mapping is not under the source root.
    #[error("'{path}' is not under the source tree '{root}'")]
    NotInSourceTree { path: PathBuf, root: PathBuf },

    /// A path handed to the reverse mapping is not under the mirror root.
    #[error("'{path}' is not under the mirror tree '{root}'")]
    NotInMirrorTree { path: PathBuf, root: PathBuf },
}
