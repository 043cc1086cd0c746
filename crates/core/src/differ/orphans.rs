use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::trace;

use super::error::DifferError;
use super::source::read_sorted;
use super::types::OrphanBatch;
use crate::mapping::PathMapper;

/// Lazy depth-first walk of the mirror tree for entries without a source.
///
/// A mirror subdirectory whose source counterpart no longer exists is
/// reported whole and not descended into. A mirror file is an orphan when
/// none of its source candidates match a file in the source directory;
/// candidates match on exact stem and case-insensitive extension, so a
/// renamed `.flac` to `.FLAC` does not orphan its mirror.
pub struct OrphanScan {
    mapper: Arc<PathMapper>,
    pending: VecDeque<PathBuf>,
}

impl OrphanScan {
    pub(crate) fn new(mapper: Arc<PathMapper>) -> Self {
        let pending = VecDeque::from([mapper.roots().mirror().to_path_buf()]);
        Self { mapper, pending }
    }

    /// Returns the next directory with orphans, or `None` when done.
    pub async fn next_batch(&mut self) -> Result<Option<OrphanBatch>, DifferError> {
        while let Some(directory) = self.pending.pop_front() {
            let (subdirs, files) = read_sorted(&directory).await?;

            let mut orphan_subdirs = Vec::new();
            let mut live_subdirs = Vec::new();
            for subdir in subdirs {
                let candidates = self.mapper.to_source_candidates(&subdir)?;
                // Directories map one to one.
                if candidates.first().is_some_and(|c| c.is_dir()) {
                    live_subdirs.push(subdir);
                } else {
                    orphan_subdirs.push(subdir);
                }
            }
            for subdir in live_subdirs.into_iter().rev() {
                self.pending.push_front(subdir);
            }

            let source_names = self.source_listing(&directory).await?;
            let mut orphan_files = Vec::new();
            for file in files {
                if self.is_orphan(&file, &source_names)? {
                    orphan_files.push(file);
                }
            }

            let batch = OrphanBatch {
                directory,
                subdirs: orphan_subdirs,
                files: orphan_files,
            };
            if !batch.is_empty() {
                trace!(
                    directory = %batch.directory.display(),
                    subdirs = batch.subdirs.len(),
                    files = batch.files.len(),
                    "orphan batch"
                );
                return Ok(Some(batch));
            }
        }
        Ok(None)
    }

    async fn source_listing(&self, mirror_dir: &Path) -> Result<Vec<PathBuf>, DifferError> {
        let Some(source_dir) = self
            .mapper
            .to_source_candidates(mirror_dir)?
            .into_iter()
            .next()
        else {
            return Ok(Vec::new());
        };
        let (_, files) = read_sorted(&source_dir).await?;
        Ok(files)
    }

    fn is_orphan(&self, mirror_file: &Path, source_names: &[PathBuf]) -> Result<bool, DifferError> {
        let candidates = self.mapper.to_source_candidates(mirror_file)?;
        for candidate in &candidates {
            if source_names.iter().any(|s| names_match(s, candidate)) {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

fn names_match(source: &Path, candidate: &Path) -> bool {
    if source.file_stem() != candidate.file_stem() {
        return false;
    }
    match (
        source.extension().and_then(|e| e.to_str()),
        candidate.extension().and_then(|e| e.to_str()),
    ) {
        (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
        (None, None) => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::LibraryRoots;
    use std::fs;
    use tempfile::TempDir;

    fn mapper(source: &Path, mirror: &Path) -> Arc<PathMapper> {
        let roots = LibraryRoots::new(source, mirror).unwrap();
        Arc::new(PathMapper::new(
            roots,
            vec!["flac".to_string()],
            "mp3".to_string(),
        ))
    }

    #[tokio::test]
    async fn test_mirror_of_existing_source_is_kept() {
        let source = TempDir::new().unwrap();
        let mirror = TempDir::new().unwrap();
        fs::write(source.path().join("01.flac"), b"fLaC").unwrap();
        fs::write(source.path().join("folder.jpg"), b"jpg").unwrap();
        fs::write(mirror.path().join("01.mp3"), b"ID3").unwrap();
        fs::write(mirror.path().join("folder.jpg"), b"jpg").unwrap();

        let mut scan = OrphanScan::new(mapper(source.path(), mirror.path()));
        assert!(scan.next_batch().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_orphan_file_is_reported() {
        let source = TempDir::new().unwrap();
        let mirror = TempDir::new().unwrap();
        fs::write(mirror.path().join("stale.mp3"), b"ID3").unwrap();

        let mut scan = OrphanScan::new(mapper(source.path(), mirror.path()));
        let batch = scan.next_batch().await.unwrap().unwrap();
        assert_eq!(batch.files, vec![mirror.path().join("stale.mp3")]);
        assert!(batch.subdirs.is_empty());
    }

    #[tokio::test]
    async fn test_orphan_directory_is_reported_without_descent() {
        let source = TempDir::new().unwrap();
        let mirror = TempDir::new().unwrap();
        let gone = mirror.path().join("removed-album");
        fs::create_dir(&gone).unwrap();
        fs::write(gone.join("01.mp3"), b"ID3").unwrap();

        let mut scan = OrphanScan::new(mapper(source.path(), mirror.path()));
        let batch = scan.next_batch().await.unwrap().unwrap();
        assert_eq!(batch.subdirs, vec![gone]);
        assert!(batch.files.is_empty());
        assert!(scan.next_batch().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_source_extension_case_does_not_orphan() {
        let source = TempDir::new().unwrap();
        let mirror = TempDir::new().unwrap();
        fs::write(source.path().join("01.FLAC"), b"fLaC").unwrap();
        fs::write(mirror.path().join("01.mp3"), b"ID3").unwrap();

        let mut scan = OrphanScan::new(mapper(source.path(), mirror.path()));
        assert!(scan.next_batch().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_mirror_with_different_stem_is_orphan() {
        let source = TempDir::new().unwrap();
        let mirror = TempDir::new().unwrap();
        fs::write(source.path().join("01.flac"), b"fLaC").unwrap();
        fs::write(mirror.path().join("1.mp3"), b"ID3").unwrap();

        let mut scan = OrphanScan::new(mapper(source.path(), mirror.path()));
        let batch = scan.next_batch().await.unwrap().unwrap();
        assert_eq!(batch.files, vec![mirror.path().join("1.mp3")]);
    }
}
