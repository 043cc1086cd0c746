use std::path::PathBuf;

/// One source directory's worth of files needing a copy or re-encode.
///
/// `files` holds source-side paths, sorted by name. Batches are emitted
/// only for directories with at least one outdated file.
#[derive(Debug, Clone, PartialEq)]
pub struct DiffBatch {
    pub directory: PathBuf,
    pub files: Vec<PathBuf>,
}

/// One mirror directory's worth of orphaned entries.
///
/// `subdirs` are mirror directories whose source counterpart is gone; the
/// scan does not descend into them. `files` are mirror files with no
/// matching source origin.
#[derive(Debug, Clone, PartialEq)]
pub struct OrphanBatch {
    pub directory: PathBuf,
    pub subdirs: Vec<PathBuf>,
    pub files: Vec<PathBuf>,
}

impl OrphanBatch {
    pub fn is_empty(&self) -> bool {
        self.subdirs.is_empty() && self.files.is_empty()
    }
}
