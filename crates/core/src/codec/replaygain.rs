//! ReplayGain post-encode hook backed by `mp3gain`.

use async_trait::async_trait;
use lofty::config::WriteOptions;
use lofty::file::TaggedFileExt;
use lofty::probe::Probe;
use lofty::tag::{Accessor, Tag, TagExt, TagType};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

use super::config::CodecConfig;
use super::error::CodecError;
use super::traits::PostEncodeHook;
use crate::classify::FileEntry;

/// Applies track and album gain to every MP3 in a directory, then writes
/// ID3v1 fallback tags for players that cannot read ID3v2.
pub struct Mp3GainHook {
    config: CodecConfig,
}

impl Mp3GainHook {
    /// Creates a new hook with the given configuration.
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    /// Creates a hook with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(CodecConfig::default())
    }

    async fn list_mp3s(&self, directory: &Path) -> Result<Vec<PathBuf>, CodecError> {
        let mut reader = tokio::fs::read_dir(directory).await?;
        let mut files = Vec::new();
        while let Some(entry) = reader.next_entry().await? {
            let path = entry.path();
            let is_mp3 = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("mp3"));
            if is_mp3 && entry.file_type().await?.is_file() {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    async fn apply_gain(&self, directory: &Path, files: &[PathBuf]) -> Result<(), CodecError> {
        let output = Command::new(&self.config.mp3gain_path)
            .args(["-a", "-c", "-s", "i", "-s", "r"])
            .args(files)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    CodecError::BinaryNotFound {
                        binary: self.config.mp3gain_path.clone(),
                    }
                } else {
                    CodecError::Io(e)
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CodecError::hook_failed(
                "mp3gain",
                directory,
                format!(
                    "mp3gain exited with {:?}: {}",
                    output.status.code(),
                    stderr.trim()
                ),
            ));
        }
        Ok(())
    }

    async fn write_id3v1(&self, directory: &Path, files: Vec<PathBuf>) -> Result<(), CodecError> {
        let directory = directory.to_path_buf();
        tokio::task::spawn_blocking(move || {
            for file in &files {
                if let Err(detail) = downgrade_to_id3v1(file) {
                    return Err(CodecError::hook_failed("id3v1", &directory, detail));
                }
            }
            Ok(())
        })
        .await
        .map_err(|e| CodecError::Io(std::io::Error::other(e)))?
    }
}

/// Mirrors the main ID3v2 fields into an ID3v1 tag appended to the file.
fn downgrade_to_id3v1(path: &Path) -> Result<(), String> {
    let tagged = Probe::open(path)
        .map_err(|e| e.to_string())?
        .read()
        .map_err(|e| e.to_string())?;
    let Some(source) = tagged.primary_tag().or_else(|| tagged.first_tag()) else {
        return Ok(());
    };

    let mut v1 = Tag::new(TagType::Id3v1);
    if let Some(title) = source.title() {
        v1.set_title(title.to_string());
    }
    if let Some(artist) = source.artist() {
        v1.set_artist(artist.to_string());
    }
    if let Some(album) = source.album() {
        v1.set_album(album.to_string());
    }
    if let Some(genre) = source.genre() {
        v1.set_genre(genre.to_string());
    }
    if let Some(comment) = source.comment() {
        v1.set_comment(comment.to_string());
    }
    if let Some(track) = source.track() {
        v1.set_track(track);
    }
    if let Some(year) = source.year() {
        v1.set_year(year);
    }

    if v1.is_empty() {
        return Ok(());
    }
    v1.save_to_path(path, WriteOptions::default())
        .map_err(|e| e.to_string())
}

#[async_trait]
impl PostEncodeHook for Mp3GainHook {
    fn name(&self) -> &str {
        "mp3gain"
    }

    async fn run(&self, entry: &FileEntry) -> Result<(), CodecError> {
        let directory = entry.directory().to_path_buf();
        let files = self.list_mp3s(&directory).await?;
        if files.is_empty() {
            debug!(directory = %directory.display(), "no mp3 files, skipping hook");
            return Ok(());
        }

        debug!(directory = %directory.display(), files = files.len(), "applying replaygain");
        self.apply_gain(&directory, &files).await?;
        self.write_id3v1(&directory, files).await
    }

    async fn validate(&self) -> Result<(), CodecError> {
        let result = Command::new(&self.config.mp3gain_path)
            .arg("-v")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .await;

        if let Err(e) = result {
            if e.kind() == std::io::ErrorKind::NotFound {
                return Err(CodecError::BinaryNotFound {
                    binary: self.config.mp3gain_path.clone(),
                });
            }
            return Err(CodecError::Io(e));
        }
        Ok(())
    }
}
