//! Data types shared across the codec module.

use std::path::PathBuf;

use tokio::io::AsyncRead;
use tokio::process::Child;

use super::error::CodecError;
use crate::classify::FileEntry;

/// A raw PCM stream produced by a decoder.
///
/// When the stream wraps a child process, [`finish`](Self::finish) must be
/// called after the reader is drained so the decoder's exit status is
/// checked.
pub struct PcmStream {
    source: PathBuf,
    reader: Box<dyn AsyncRead + Send + Unpin>,
    process: Option<Child>,
}

impl PcmStream {
    /// Wraps a decoder process whose stdout carries the PCM data.
    pub fn from_child(source: PathBuf, mut process: Child) -> Result<Self, CodecError> {
        let stdout = process
            .stdout
            .take()
            .ok_or_else(|| CodecError::decode_failed(&source, "decoder stdout not captured"))?;
        Ok(Self {
            source,
            reader: Box::new(stdout),
            process: Some(process),
        })
    }

    /// Wraps an in-memory or otherwise process-free reader.
    pub fn from_reader(
        source: PathBuf,
        reader: impl AsyncRead + Send + Unpin + 'static,
    ) -> Self {
        Self {
            source,
            reader: Box::new(reader),
            process: None,
        }
    }

    /// The lossless file this stream was decoded from.
    pub fn source(&self) -> &PathBuf {
        &self.source
    }

    pub fn reader_mut(&mut self) -> &mut (dyn AsyncRead + Send + Unpin) {
        &mut self.reader
    }

    /// Waits for the backing process, if any, and checks its exit status.
    pub async fn finish(mut self) -> Result<(), CodecError> {
        let Some(process) = self.process.take() else {
            return Ok(());
        };
        let output = process.wait_with_output().await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CodecError::decode_failed(
                &self.source,
                format!(
                    "decoder exited with {:?}: {}",
                    output.status.code(),
                    stderr.trim()
                ),
            ));
        }
        Ok(())
    }
}

/// The result of encoding one file, including how many tags were carried.
#[derive(Debug, Clone)]
pub struct EncodedArtifact {
    pub output: FileEntry,
    pub carried_tags: usize,
}
