//! Mock decoder for testing.

use async_trait::async_trait;
use std::io::Cursor;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::classify::FileEntry;
use crate::codec::{CodecError, Decoder, PcmStream};

/// Mock implementation of the [`Decoder`] trait.
///
/// "Decodes" by streaming the source file's bytes unchanged. Failures can
/// be injected for the next call. Clones share state, so a test can keep
/// one handle while the engine owns another.
#[derive(Clone)]
pub struct MockDecoder {
    decode_count: Arc<AtomicU64>,
    next_error: Arc<RwLock<Option<CodecError>>>,
}

impl Default for MockDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDecoder {
    pub fn new() -> Self {
        Self {
            decode_count: Arc::new(AtomicU64::new(0)),
            next_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Number of decode calls so far.
    pub fn decode_count(&self) -> u64 {
        self.decode_count.load(Ordering::Relaxed)
    }

    /// Configure the next decode to fail with the given error.
    pub async fn set_next_error(&self, error: CodecError) {
        *self.next_error.write().await = Some(error);
    }
}

#[async_trait]
impl Decoder for MockDecoder {
    fn name(&self) -> &str {
        "mock"
    }

    async fn decode(&self, entry: &FileEntry) -> Result<PcmStream, CodecError> {
        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }
        self.decode_count.fetch_add(1, Ordering::Relaxed);
        let bytes = tokio::fs::read(&entry.path).await?;
        Ok(PcmStream::from_reader(entry.path.clone(), Cursor::new(bytes)))
    }
}
