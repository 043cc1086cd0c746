//! Sox-based decoder implementation.

use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

use super::config::CodecConfig;
use super::error::CodecError;
use super::traits::Decoder;
use super::types::PcmStream;
use crate::classify::FileEntry;

/// Decodes lossless audio to WAV on stdout via `sox`.
pub struct SoxDecoder {
    config: CodecConfig,
}

impl SoxDecoder {
    /// Creates a new sox decoder with the given configuration.
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    /// Creates a decoder with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(CodecConfig::default())
    }

    fn build_args(&self, entry: &FileEntry) -> Vec<String> {
        vec![
            "--single-threaded".to_string(),
            "-G".to_string(),
            "-b".to_string(),
            self.config.bit_depth.to_string(),
            entry.path.to_string_lossy().to_string(),
            "-t".to_string(),
            "wav".to_string(),
            "-".to_string(),
            "rate".to_string(),
            self.config.sample_rate.to_string(),
            "dither".to_string(),
            "-s".to_string(),
        ]
    }
}

#[async_trait]
impl Decoder for SoxDecoder {
    fn name(&self) -> &str {
        "sox"
    }

    async fn decode(&self, entry: &FileEntry) -> Result<PcmStream, CodecError> {
        let args = self.build_args(entry);
        debug!(input = %entry.path.display(), "starting decoder");

        let child = Command::new(&self.config.sox_path)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    CodecError::BinaryNotFound {
                        binary: self.config.sox_path.clone(),
                    }
                } else {
                    CodecError::Io(e)
                }
            })?;

        PcmStream::from_child(entry.path.clone(), child)
    }

    async fn validate(&self) -> Result<(), CodecError> {
        let result = Command::new(&self.config.sox_path)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .await;

        if let Err(e) = result {
            if e.kind() == std::io::ErrorKind::NotFound {
                return Err(CodecError::BinaryNotFound {
                    binary: self.config.sox_path.clone(),
                });
            }
            return Err(CodecError::Io(e));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::FileKind;
    use std::path::Path;

    #[test]
    fn test_build_args() {
        let decoder = SoxDecoder::with_defaults();
        let entry = FileEntry::new(Path::new("/music/album/01.flac"), FileKind::Lossless);
        let args = decoder.build_args(&entry);

        assert_eq!(args[0], "--single-threaded");
        assert!(args.contains(&"-G".to_string()));
        assert!(args.contains(&"16".to_string()));
        assert!(args.contains(&"44100".to_string()));
        assert!(args.contains(&"/music/album/01.flac".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("-s"));
    }

    #[test]
    fn test_build_args_honors_config() {
        let config = CodecConfig {
            sample_rate: 48000,
            bit_depth: 24,
            ..Default::default()
        };
        let decoder = SoxDecoder::new(config);
        let entry = FileEntry::new(Path::new("/in.flac"), FileKind::Lossless);
        let args = decoder.build_args(&entry);

        assert!(args.contains(&"48000".to_string()));
        assert!(args.contains(&"24".to_string()));
    }

    #[tokio::test]
    async fn test_missing_binary_is_reported() {
        let config = CodecConfig::default().with_sox_path("/nonexistent/sox".into());
        let decoder = SoxDecoder::new(config);
        let entry = FileEntry::new(Path::new("/in.flac"), FileKind::Lossless);

        let result = decoder.decode(&entry).await;
        assert!(matches!(result, Err(CodecError::BinaryNotFound { .. })));
    }
}
