//! Path mapper implementation.

use std::path::{Path, PathBuf};

use super::error::MappingError;

/// Validated pair of source and mirror tree roots.
///
/// Both roots must exist as directories at construction time, and neither
/// root may live inside the other: a mirror under the source would feed the
/// sync its own output, and a source under the mirror would be pruned as
/// orphaned.
#[derive(Debug, Clone)]
pub struct LibraryRoots {
    source: PathBuf,
    mirror: PathBuf,
}

impl LibraryRoots {
    /// Validates and canonicalizes the two roots.
    pub fn new(source: impl AsRef<Path>, mirror: impl AsRef<Path>) -> Result<Self, MappingError> {
        let source = Self::canonical_dir(source.as_ref())?;
        let mirror = Self::canonical_dir(mirror.as_ref())?;

        if mirror.starts_with(&source) || source.starts_with(&mirror) {
            return Err(MappingError::NestedRoots {
                source_root: source,
                mirror,
            });
        }

        Ok(Self { source, mirror })
    }

    fn canonical_dir(path: &Path) -> Result<PathBuf, MappingError> {
        let canonical = path.canonicalize().map_err(|_| MappingError::InvalidRoot {
            path: path.to_path_buf(),
        })?;
        if !canonical.is_dir() {
            return Err(MappingError::InvalidRoot {
                path: path.to_path_buf(),
            });
        }
        Ok(canonical)
    }

    /// Root of the source tree.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Root of the mirror tree.
    pub fn mirror(&self) -> &Path {
        &self.mirror
    }
}

/// Pure bidirectional translation between source and mirror paths.
///
/// Extension comparisons are case-insensitive in both directions: source
/// libraries mix `.flac` and `.FLAC`, while the encoder always produces the
/// canonical lowercase extension on the mirror side.
#[derive(Debug, Clone)]
pub struct PathMapper {
    roots: LibraryRoots,
    lossless_extensions: Vec<String>,
    lossy_extension: String,
}

impl PathMapper {
    /// Creates a mapper for the given roots.
    ///
    /// `lossless_extensions` and `lossy_extension` are extensions without the
    /// leading dot, e.g. `["flac"]` and `"mp3"`.
    pub fn new(
        roots: LibraryRoots,
        lossless_extensions: Vec<String>,
        lossy_extension: String,
    ) -> Self {
        Self {
            roots,
            lossless_extensions,
            lossy_extension,
        }
    }

    /// The validated roots this mapper translates between.
    pub fn roots(&self) -> &LibraryRoots {
        &self.roots
    }

    /// Maps a path under the source root to its mirror counterpart.
    ///
    /// Directories and non-lossless files keep their name; files carrying a
    /// registered lossless extension have it rewritten to the lossy one.
    pub fn to_mirror(&self, path: &Path) -> Result<PathBuf, MappingError> {
        let relative =
            path.strip_prefix(self.roots.source())
                .map_err(|_| MappingError::NotInSourceTree {
                    path: path.to_path_buf(),
                    root: self.roots.source().to_path_buf(),
                })?;

        let mut mirror = self.roots.mirror().join(relative);

        if path.is_file() {
            if let Some(ext) = mirror.extension().and_then(|e| e.to_str()) {
                if self.is_lossless_extension(ext) {
                    mirror.set_extension(&self.lossy_extension);
                }
            }
        }

        Ok(mirror)
    }

    /// Maps a path under the mirror root back to every source path that
    /// could have produced it.
    ///
    /// A directory maps to a single name-preserved candidate. A file with
    /// the configured lossy extension maps to the name-preserved candidate
    /// plus one candidate per registered lossless extension, since the
    /// original extension was lost during encoding. The candidates may or
    /// may not exist on disk.
    pub fn to_source_candidates(&self, path: &Path) -> Result<Vec<PathBuf>, MappingError> {
        let relative =
            path.strip_prefix(self.roots.mirror())
                .map_err(|_| MappingError::NotInMirrorTree {
                    path: path.to_path_buf(),
                    root: self.roots.mirror().to_path_buf(),
                })?;

        let preserved = self.roots.source().join(relative);

        if path.is_dir() {
            return Ok(vec![preserved]);
        }

        let mut candidates = vec![preserved.clone()];
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            if ext.eq_ignore_ascii_case(&self.lossy_extension) {
                for lossless in &self.lossless_extensions {
                    candidates.push(preserved.with_extension(lossless));
                }
            }
        }

        Ok(candidates)
    }

    /// Whether `ext` (without dot) is one of the registered lossless extensions.
    pub fn is_lossless_extension(&self, ext: &str) -> bool {
        self.lossless_extensions
            .iter()
            .any(|l| l.eq_ignore_ascii_case(ext))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn mapper(temp: &TempDir) -> PathMapper {
        let source = temp.path().join("library");
        let mirror = temp.path().join("encoded");
        fs::create_dir_all(&source).unwrap();
        fs::create_dir_all(&mirror).unwrap();

        let roots = LibraryRoots::new(&source, &mirror).unwrap();
        PathMapper::new(roots, vec!["flac".to_string()], "mp3".to_string())
    }

    #[test]
    fn test_rejects_missing_root() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope");
        let result = LibraryRoots::new(&missing, temp.path());
        assert!(matches!(result, Err(MappingError::InvalidRoot { .. })));
    }

    #[test]
    fn test_rejects_nested_mirror() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("library");
        let mirror = source.join("encoded");
        fs::create_dir_all(&mirror).unwrap();

        let result = LibraryRoots::new(&source, &mirror);
        assert!(matches!(result, Err(MappingError::NestedRoots { .. })));
    }

    #[test]
    fn test_rejects_source_inside_mirror() {
        let temp = TempDir::new().unwrap();
        let mirror = temp.path().join("encoded");
        let source = mirror.join("library");
        fs::create_dir_all(&source).unwrap();

        let result = LibraryRoots::new(&source, &mirror);
        assert!(matches!(result, Err(MappingError::NestedRoots { .. })));
    }

    #[test]
    fn test_rejects_equal_roots() {
        let temp = TempDir::new().unwrap();
        let result = LibraryRoots::new(temp.path(), temp.path());
        assert!(matches!(result, Err(MappingError::NestedRoots { .. })));
    }

    #[test]
    fn test_to_mirror_rewrites_lossless_extension() {
        let temp = TempDir::new().unwrap();
        let m = mapper(&temp);

        let album = m.roots().source().join("artist/album");
        fs::create_dir_all(&album).unwrap();
        let track = album.join("01.flac");
        fs::write(&track, b"fLaC").unwrap();

        let mirror = m.to_mirror(&track).unwrap();
        assert_eq!(mirror, m.roots().mirror().join("artist/album/01.mp3"));
    }

    #[test]
    fn test_to_mirror_extension_match_is_case_insensitive() {
        let temp = TempDir::new().unwrap();
        let m = mapper(&temp);

        let track = m.roots().source().join("01.FLAC");
        fs::write(&track, b"fLaC").unwrap();

        let mirror = m.to_mirror(&track).unwrap();
        assert_eq!(mirror, m.roots().mirror().join("01.mp3"));
    }

    #[test]
    fn test_to_mirror_preserves_other_files_and_directories() {
        let temp = TempDir::new().unwrap();
        let m = mapper(&temp);

        let album = m.roots().source().join("artist/album");
        fs::create_dir_all(&album).unwrap();
        let art = album.join("folder.jpg");
        fs::write(&art, b"jpg").unwrap();

        assert_eq!(
            m.to_mirror(&album).unwrap(),
            m.roots().mirror().join("artist/album")
        );
        assert_eq!(
            m.to_mirror(&art).unwrap(),
            m.roots().mirror().join("artist/album/folder.jpg")
        );
    }

    #[test]
    fn test_to_mirror_rejects_outside_source() {
        let temp = TempDir::new().unwrap();
        let m = mapper(&temp);

        let outside = temp.path().join("elsewhere/01.flac");
        let result = m.to_mirror(&outside);
        assert!(matches!(result, Err(MappingError::NotInSourceTree { .. })));
    }

    #[test]
    fn test_to_source_candidates_expands_lossy_extension() {
        let temp = TempDir::new().unwrap();
        let m = mapper(&temp);

        let encoded = m.roots().mirror().join("artist/album/01.mp3");
        let candidates = m.to_source_candidates(&encoded).unwrap();

        assert_eq!(
            candidates,
            vec![
                m.roots().source().join("artist/album/01.mp3"),
                m.roots().source().join("artist/album/01.flac"),
            ]
        );
    }

    #[test]
    fn test_to_source_candidates_keeps_other_extensions() {
        let temp = TempDir::new().unwrap();
        let m = mapper(&temp);

        let art = m.roots().mirror().join("folder.jpg");
        let candidates = m.to_source_candidates(&art).unwrap();
        assert_eq!(candidates, vec![m.roots().source().join("folder.jpg")]);
    }

    #[test]
    fn test_to_source_candidates_rejects_outside_mirror() {
        let temp = TempDir::new().unwrap();
        let m = mapper(&temp);

        let result = m.to_source_candidates(&temp.path().join("stray.mp3"));
        assert!(matches!(result, Err(MappingError::NotInMirrorTree { .. })));
    }

    #[test]
    fn test_round_trip_contains_original() {
        let temp = TempDir::new().unwrap();
        let m = mapper(&temp);

        let track = m.roots().source().join("01.flac");
        fs::write(&track, b"fLaC").unwrap();

        let mirror = m.to_mirror(&track).unwrap();
        let candidates = m.to_source_candidates(&mirror).unwrap();
        assert!(candidates.contains(&track));
    }
}
