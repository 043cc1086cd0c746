//! Types produced by classification.

use std::path::{Path, PathBuf};

/// The kind of a classified file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// Losslessly stored audio, present only in the source tree.
    Lossless,
    /// Lossy-compressed audio, the mirror side's canonical output.
    Lossy,
    /// Album cover art.
    Art,
}

/// A classified file, created per classification call and never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub path: PathBuf,
    pub kind: FileKind,
    /// Extension without the leading dot, as found on disk.
    pub extension: String,
}

impl FileEntry {
    pub fn new(path: impl Into<PathBuf>, kind: FileKind) -> Self {
        let path = path.into();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_string();
        Self {
            path,
            kind,
            extension,
        }
    }

    /// Directory containing this file.
    pub fn directory(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }
}
