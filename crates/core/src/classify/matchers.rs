//! Matcher registry and the concrete matchers.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::error::ClassifyError;
use super::types::{FileEntry, FileKind};

/// Cover-art basenames recognized by the art matcher.
const ART_NAMES: [&str; 10] = [
    "album.gif",
    "album.jpg",
    "albumartsmall.gif",
    "albumartsmall.jpg",
    "cover.gif",
    "cover.jpg",
    "folder.gif",
    "folder.jpg",
    "thumb.gif",
    "thumb.jpg",
];

/// A matcher for one concrete file kind.
///
/// `matches` returns `Ok(None)` for "not my type" and reserves `Err` for
/// files that matched the cheap check but failed the content probe.
pub trait TypeMatcher: Send + Sync {
    /// Kind of entry this matcher produces.
    fn kind(&self) -> FileKind;

    /// Extensions this matcher claims, lowercase without the leading dot.
    /// Empty for matchers keyed on basename instead.
    fn extensions(&self) -> &[&str];

    fn matches(&self, path: &Path) -> Result<Option<FileEntry>, ClassifyError>;
}

fn extension_of(path: &Path) -> Option<&str> {
    path.extension().and_then(|e| e.to_str())
}

fn read_header(path: &Path, buf: &mut [u8]) -> Result<usize, ClassifyError> {
    let mut file = File::open(path).map_err(|e| ClassifyError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    file.read(buf).map_err(|e| ClassifyError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Matches `.flac` files by extension, then by the `fLaC` stream marker.
#[derive(Debug, Default)]
pub struct FlacMatcher;

impl TypeMatcher for FlacMatcher {
    fn kind(&self) -> FileKind {
        FileKind::Lossless
    }

    fn extensions(&self) -> &[&str] {
        &["flac"]
    }

    fn matches(&self, path: &Path) -> Result<Option<FileEntry>, ClassifyError> {
        match extension_of(path) {
            Some(ext) if ext.eq_ignore_ascii_case("flac") => {}
            _ => return Ok(None),
        }

        let mut magic = [0u8; 4];
        let read = read_header(path, &mut magic)?;
        if read < magic.len() || &magic != b"fLaC" {
            return Err(ClassifyError::CorruptFile {
                path: path.to_path_buf(),
                expected: "FLAC",
            });
        }

        Ok(Some(FileEntry::new(path, FileKind::Lossless)))
    }
}

/// Matches `.mp3` files by extension, then by an ID3 header or frame sync.
#[derive(Debug, Default)]
pub struct Mp3Matcher;

impl TypeMatcher for Mp3Matcher {
    fn kind(&self) -> FileKind {
        FileKind::Lossy
    }

    fn extensions(&self) -> &[&str] {
        &["mp3"]
    }

    fn matches(&self, path: &Path) -> Result<Option<FileEntry>, ClassifyError> {
        match extension_of(path) {
            Some(ext) if ext.eq_ignore_ascii_case("mp3") => {}
            _ => return Ok(None),
        }

        let mut header = [0u8; 3];
        let read = read_header(path, &mut header)?;
        let id3 = read >= 3 && &header == b"ID3";
        let frame_sync = read >= 2 && header[0] == 0xFF && header[1] & 0xE0 == 0xE0;
        if !id3 && !frame_sync {
            return Err(ClassifyError::CorruptFile {
                path: path.to_path_buf(),
                expected: "MP3",
            });
        }

        Ok(Some(FileEntry::new(path, FileKind::Lossy)))
    }
}

/// Matches cover-art files by their exact basename.
#[derive(Debug, Default)]
pub struct ArtMatcher;

impl TypeMatcher for ArtMatcher {
    fn kind(&self) -> FileKind {
        FileKind::Art
    }

    fn extensions(&self) -> &[&str] {
        &[]
    }

    fn matches(&self, path: &Path) -> Result<Option<FileEntry>, ClassifyError> {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return Ok(None);
        };
        if !ART_NAMES.contains(&name) || !path.is_file() {
            return Ok(None);
        }
        Ok(Some(FileEntry::new(path, FileKind::Art)))
    }
}

/// Ordered matcher registry; first match wins.
pub struct FileClassifier {
    matchers: Vec<Box<dyn TypeMatcher>>,
}

impl FileClassifier {
    /// Builds a classifier from an explicit matcher list.
    pub fn new(matchers: Vec<Box<dyn TypeMatcher>>) -> Self {
        Self { matchers }
    }

    /// The default registry: FLAC, MP3, cover art.
    pub fn with_default_matchers() -> Self {
        Self::new(vec![
            Box::new(FlacMatcher),
            Box::new(Mp3Matcher),
            Box::new(ArtMatcher),
        ])
    }

    /// Classifies a path.
    ///
    /// Returns `Ok(None)` when no matcher accepts the path; the caller must
    /// skip such files. Probe errors propagate but are meant to be caught at
    /// the classification site and treated as a per-file skip.
    pub fn classify(&self, path: &Path) -> Result<Option<FileEntry>, ClassifyError> {
        for matcher in &self.matchers {
            if let Some(entry) = matcher.matches(path)? {
                return Ok(Some(entry));
            }
        }
        Ok(None)
    }

    /// Extensions claimed by lossless matchers, lowercase without the dot.
    pub fn lossless_extensions(&self) -> Vec<String> {
        self.matchers
            .iter()
            .filter(|m| m.kind() == FileKind::Lossless)
            .flat_map(|m| m.extensions().iter().map(|e| e.to_string()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_classify_flac() {
        let temp = TempDir::new().unwrap();
        let track = temp.path().join("01.flac");
        fs::write(&track, b"fLaC\x00\x00\x00\x22").unwrap();

        let classifier = FileClassifier::with_default_matchers();
        let entry = classifier.classify(&track).unwrap().unwrap();
        assert_eq!(entry.kind, FileKind::Lossless);
        assert_eq!(entry.extension, "flac");
    }

    #[test]
    fn test_classify_flac_uppercase_extension() {
        let temp = TempDir::new().unwrap();
        let track = temp.path().join("01.FLAC");
        fs::write(&track, b"fLaC....").unwrap();

        let classifier = FileClassifier::with_default_matchers();
        let entry = classifier.classify(&track).unwrap().unwrap();
        assert_eq!(entry.kind, FileKind::Lossless);
    }

    #[test]
    fn test_corrupt_flac_is_an_error() {
        let temp = TempDir::new().unwrap();
        let track = temp.path().join("01.flac");
        fs::write(&track, b"not flac data").unwrap();

        let classifier = FileClassifier::with_default_matchers();
        let result = classifier.classify(&track);
        assert!(matches!(result, Err(ClassifyError::CorruptFile { .. })));
    }

    #[test]
    fn test_extension_checked_before_content() {
        let temp = TempDir::new().unwrap();
        // FLAC magic under the wrong extension must not classify.
        let file = temp.path().join("notes.txt");
        fs::write(&file, b"fLaC").unwrap();

        let classifier = FileClassifier::with_default_matchers();
        assert!(classifier.classify(&file).unwrap().is_none());
    }

    #[test]
    fn test_classify_mp3_with_id3_header() {
        let temp = TempDir::new().unwrap();
        let track = temp.path().join("01.mp3");
        fs::write(&track, b"ID3\x04\x00").unwrap();

        let classifier = FileClassifier::with_default_matchers();
        let entry = classifier.classify(&track).unwrap().unwrap();
        assert_eq!(entry.kind, FileKind::Lossy);
    }

    #[test]
    fn test_classify_mp3_with_frame_sync() {
        let temp = TempDir::new().unwrap();
        let track = temp.path().join("01.mp3");
        fs::write(&track, [0xFFu8, 0xFB, 0x90, 0x00]).unwrap();

        let classifier = FileClassifier::with_default_matchers();
        let entry = classifier.classify(&track).unwrap().unwrap();
        assert_eq!(entry.kind, FileKind::Lossy);
    }

    #[test]
    fn test_classify_art_by_basename() {
        let temp = TempDir::new().unwrap();
        let art = temp.path().join("folder.jpg");
        fs::write(&art, b"\xFF\xD8\xFF").unwrap();

        let classifier = FileClassifier::with_default_matchers();
        let entry = classifier.classify(&art).unwrap().unwrap();
        assert_eq!(entry.kind, FileKind::Art);
    }

    #[test]
    fn test_unknown_jpg_is_unrecognized() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("liner-notes.jpg");
        fs::write(&file, b"\xFF\xD8\xFF").unwrap();

        let classifier = FileClassifier::with_default_matchers();
        assert!(classifier.classify(&file).unwrap().is_none());
    }

    #[test]
    fn test_lossless_extensions() {
        let classifier = FileClassifier::with_default_matchers();
        assert_eq!(classifier.lossless_extensions(), vec!["flac".to_string()]);
    }
}
