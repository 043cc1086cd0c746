//! LAME-based MP3 encoder implementation.

use async_trait::async_trait;
use lofty::tag::ItemKey;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

use super::config::CodecConfig;
use super::error::CodecError;
use super::tags::mp3_accepted_keys;
use super::traits::Encoder;
use super::types::PcmStream;
use crate::classify::{FileEntry, FileKind};

/// Encodes a WAV stream to VBR MP3 via `lame`.
pub struct LameEncoder {
    config: CodecConfig,
}

impl LameEncoder {
    /// Creates a new lame encoder with the given configuration.
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    /// Creates an encoder with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(CodecConfig::default())
    }

    fn build_args(&self, output: &Path) -> Vec<String> {
        let mut args = vec![
            "--quiet".to_string(),
            format!("-V{}", self.config.vbr_quality),
        ];
        args.extend(self.config.extra_lame_args.iter().cloned());
        args.push("-".to_string());
        args.push(output.to_string_lossy().to_string());
        args
    }
}

#[async_trait]
impl Encoder for LameEncoder {
    fn name(&self) -> &str {
        "lame"
    }

    fn target_kind(&self) -> FileKind {
        FileKind::Lossy
    }

    fn extension(&self) -> &str {
        "mp3"
    }

    fn accepted_tags(&self) -> Vec<ItemKey> {
        mp3_accepted_keys()
    }

    async fn encode(
        &self,
        output_hint: &Path,
        mut stream: PcmStream,
    ) -> Result<FileEntry, CodecError> {
        let output = output_hint.with_extension(self.extension());
        if let Some(parent) = output.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                CodecError::OutputDirectoryFailed {
                    path: parent.to_path_buf(),
                    source: e,
                }
            })?;
        }

        let args = self.build_args(&output);
        debug!(output = %output.display(), "starting encoder");

        let mut child = Command::new(&self.config.lame_path)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    CodecError::BinaryNotFound {
                        binary: self.config.lame_path.clone(),
                    }
                } else {
                    CodecError::Io(e)
                }
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| CodecError::encode_failed(&output, "encoder stdin not captured"))?;
        let copy_result = tokio::io::copy(stream.reader_mut(), &mut stdin).await;
        // Close stdin so the encoder sees end of stream.
        drop(stdin);

        let result = child.wait_with_output().await?;
        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(CodecError::encode_failed(
                &output,
                format!(
                    "lame exited with {:?}: {}",
                    result.status.code(),
                    stderr.trim()
                ),
            ));
        }

        stream.finish().await?;
        copy_result.map_err(|e| CodecError::encode_failed(&output, e.to_string()))?;

        Ok(FileEntry::new(output, FileKind::Lossy))
    }

    async fn validate(&self) -> Result<(), CodecError> {
        let result = Command::new(&self.config.lame_path)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .await;

        if let Err(e) = result {
            if e.kind() == std::io::ErrorKind::NotFound {
                return Err(CodecError::BinaryNotFound {
                    binary: self.config.lame_path.clone(),
                });
            }
            return Err(CodecError::Io(e));
        }
        Ok(())
    }
}
