//! Mock encoder for testing.

use async_trait::async_trait;
use lofty::tag::ItemKey;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tokio::sync::RwLock;

use crate::classify::{FileEntry, FileKind};
use crate::codec::{CodecError, Encoder, PcmStream};

/// Mock implementation of the [`Encoder`] trait.
///
/// Writes the PCM bytes to the hinted path with the mp3 extension and
/// records every output for assertions. Carries no tags, so encoded mock
/// files never need to be real audio. Clones share state.
#[derive(Clone)]
pub struct MockEncoder {
    target_kind: FileKind,
    encoded: Arc<RwLock<Vec<PathBuf>>>,
    next_error: Arc<RwLock<Option<CodecError>>>,
}

impl Default for MockEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl MockEncoder {
    pub fn new() -> Self {
        Self {
            target_kind: FileKind::Lossy,
            encoded: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
        }
    }

    /// An encoder claiming a different target kind, for rejection tests.
    pub fn with_target_kind(kind: FileKind) -> Self {
        Self {
            target_kind: kind,
            ..Self::new()
        }
    }

    /// Paths written so far, in completion order.
    pub async fn encoded_paths(&self) -> Vec<PathBuf> {
        self.encoded.read().await.clone()
    }

    pub async fn encode_count(&self) -> usize {
        self.encoded.read().await.len()
    }

    /// Configure the next encode to fail with the given error.
    pub async fn set_next_error(&self, error: CodecError) {
        *self.next_error.write().await = Some(error);
    }
}

#[async_trait]
impl Encoder for MockEncoder {
    fn name(&self) -> &str {
        "mock"
    }

    fn target_kind(&self) -> FileKind {
        self.target_kind
    }

    fn extension(&self) -> &str {
        "mp3"
    }

    fn accepted_tags(&self) -> Vec<ItemKey> {
        Vec::new()
    }

    async fn encode(
        &self,
        output_hint: &Path,
        mut stream: PcmStream,
    ) -> Result<FileEntry, CodecError> {
        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }

        let output = output_hint.with_extension(self.extension());
        if let Some(parent) = output.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                CodecError::OutputDirectoryFailed {
                    path: parent.to_path_buf(),
                    source: e,
                }
            })?;
        }

        let mut bytes = Vec::new();
        stream.reader_mut().read_to_end(&mut bytes).await?;
        stream.finish().await?;
        tokio::fs::write(&output, &bytes).await?;

        self.encoded.write().await.push(output.clone());
        Ok(FileEntry::new(output, FileKind::Lossy))
    }
}
