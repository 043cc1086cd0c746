//! Error types for the classify module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while probing a file that matched a matcher's extension.
///
/// A wrong extension is not an error; matchers signal non-match by returning
/// `Ok(None)`. These errors cover files that claim a type but cannot be read
/// as one. Callers suppress them per file: the file is skipped, the run
/// continues.
#[derive(Debug, Error)]
pub enum ClassifyError {
    /// Extension matched but the content signature did not.
    #[error("'{path}' does not look like a {expected} file")]
    CorruptFile {
        path: PathBuf,
        expected: &'static str,
    },

    /// I/O failure while probing the file header.
    #[error("failed to probe '{path}'")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
