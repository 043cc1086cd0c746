use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::trace;

use super::error::DifferError;
use super::types::DiffBatch;
use crate::mapping::PathMapper;

/// Lazy depth-first walk of the source tree.
///
/// Each call to [`next_batch`](Self::next_batch) advances the walk until a
/// directory containing at least one outdated file is found. A file is
/// outdated when its mirror counterpart is missing, is not a regular file,
/// or is strictly older than the source file.
pub struct SourceScan {
    mapper: Arc<PathMapper>,
    pending: VecDeque<PathBuf>,
}

impl SourceScan {
    pub(crate) fn new(mapper: Arc<PathMapper>) -> Self {
        let pending = VecDeque::from([mapper.roots().source().to_path_buf()]);
        Self { mapper, pending }
    }

    /// Returns the next directory batch, or `None` when the walk is done.
    pub async fn next_batch(&mut self) -> Result<Option<DiffBatch>, DifferError> {
        while let Some(directory) = self.pending.pop_front() {
            let (subdirs, files) = read_sorted(&directory).await?;

            // Visit children before later siblings.
            for subdir in subdirs.into_iter().rev() {
                self.pending.push_front(subdir);
            }

            let mut outdated = Vec::new();
            for file in files {
                if self.is_outdated(&file).await? {
                    outdated.push(file);
                }
            }

            if !outdated.is_empty() {
                trace!(directory = %directory.display(), files = outdated.len(), "outdated batch");
                return Ok(Some(DiffBatch {
                    directory,
                    files: outdated,
                }));
            }
        }
        Ok(None)
    }

    async fn is_outdated(&self, source: &Path) -> Result<bool, DifferError> {
        let mirror = self.mapper.to_mirror(source)?;

        let mirror_meta = match tokio::fs::metadata(&mirror).await {
            Ok(meta) => meta,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(true),
            Err(e) => return Err(DifferError::io(&mirror, e)),
        };
        if !mirror_meta.is_file() {
            return Ok(true);
        }

        let source_meta = tokio::fs::metadata(source)
            .await
            .map_err(|e| DifferError::io(source, e))?;
        match (source_meta.modified(), mirror_meta.modified()) {
            (Ok(src), Ok(dst)) => Ok(src > dst),
            // No mtime support on this filesystem; treat as up to date.
            _ => Ok(false),
        }
    }
}

/// Lists a directory into sorted subdirectory and file path lists.
///
/// A vanished directory yields empty lists so walks tolerate concurrent
/// deletion.
pub(crate) async fn read_sorted(
    directory: &Path,
) -> Result<(Vec<PathBuf>, Vec<PathBuf>), DifferError> {
    let mut reader = match tokio::fs::read_dir(directory).await {
        Ok(reader) => reader,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Ok((Vec::new(), Vec::new()))
        }
        Err(e) => return Err(DifferError::io(directory, e)),
    };

    let mut subdirs = Vec::new();
    let mut files = Vec::new();
    while let Some(entry) = reader
        .next_entry()
        .await
        .map_err(|e| DifferError::io(directory, e))?
    {
        let file_type = entry
            .file_type()
            .await
            .map_err(|e| DifferError::io(entry.path(), e))?;
        if file_type.is_dir() {
            subdirs.push(entry.path());
        } else if file_type.is_file() {
            files.push(entry.path());
        }
    }
    subdirs.sort();
    files.sort();
    Ok((subdirs, files))
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
    async fn test_missing_mirror_files_are_outdated() {
        let source = TempDir::new().unwrap();
        let mirror = TempDir::new().unwrap();
        let album = source.path().join("album");
        fs::create_dir(&album).unwrap();
        fs::write(album.join("01.flac"), b"fLaC").unwrap();
        fs::write(album.join("folder.jpg"), b"jpg").unwrap();

        let mut scan = SourceScan::new(mapper(source.path(), mirror.path()));
        let batch = scan.next_batch().await.unwrap().unwrap();
        assert_eq!(batch.directory, album);
        assert_eq!(
            batch.files,
            vec![album.join("01.flac"), album.join("folder.jpg")]
        );
        assert!(scan.next_batch().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_up_to_date_mirror_yields_no_batches() {
        let source = TempDir::new().unwrap();
        let mirror = TempDir::new().unwrap();
        fs::write(source.path().join("01.flac"), b"fLaC").unwrap();
        fs::write(mirror.path().join("01.mp3"), b"ID3").unwrap();

        let mut scan = SourceScan::new(mapper(source.path(), mirror.path()));
        assert!(scan.next_batch().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_stale_mirror_file_is_outdated() {
        let source = TempDir::new().unwrap();
        let mirror = TempDir::new().unwrap();
        let src_file = source.path().join("01.flac");
        let dst_file = mirror.path().join("01.mp3");
        fs::write(&src_file, b"fLaC").unwrap();
        fs::write(&dst_file, b"ID3").unwrap();

        let old = std::time::SystemTime::now() - std::time::Duration::from_secs(3600);
        fs::File::options()
            .write(true)
            .open(&dst_file)
            .unwrap()
            .set_modified(old)
            .unwrap();

        let mut scan = SourceScan::new(mapper(source.path(), mirror.path()));
        let batch = scan.next_batch().await.unwrap().unwrap();
        assert_eq!(batch.files, vec![src_file]);
    }

    #[tokio::test]
    async fn test_walk_is_depth_first_in_sorted_order() {
        let source = TempDir::new().unwrap();
        let mirror = TempDir::new().unwrap();
        for name in ["b-artist/album", "a-artist/album"] {
            let dir = source.path().join(name);
            fs::create_dir_all(&dir).unwrap();
            fs::write(dir.join("01.flac"), b"fLaC").unwrap();
        }

        let mut scan = SourceScan::new(mapper(source.path(), mirror.path()));
        let first = scan.next_batch().await.unwrap().unwrap();
        let second = scan.next_batch().await.unwrap().unwrap();
        assert_eq!(first.directory, source.path().join("a-artist/album"));
        assert_eq!(second.directory, source.path().join("b-artist/album"));
    }
}
