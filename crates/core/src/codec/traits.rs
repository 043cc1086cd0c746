//! Trait definitions for decoders, encoders and hooks.

use async_trait::async_trait;
use lofty::tag::ItemKey;
use std::path::Path;

use super::error::CodecError;
use super::types::PcmStream;
use crate::classify::{FileEntry, FileKind};

/// Turns a lossless file into a raw PCM stream.
#[async_trait]
pub trait Decoder: Send + Sync {
    /// Returns the name of this decoder implementation.
    fn name(&self) -> &str;

    /// Starts decoding and returns the PCM stream.
    async fn decode(&self, entry: &FileEntry) -> Result<PcmStream, CodecError>;

    /// Validates that the decoder is operational.
    async fn validate(&self) -> Result<(), CodecError> {
        Ok(())
    }
}

/// Consumes a PCM stream and writes the lossy artifact.
#[async_trait]
pub trait Encoder: Send + Sync {
    /// Returns the name of this encoder implementation.
    fn name(&self) -> &str;

    /// The kind of file this encoder produces.
    fn target_kind(&self) -> FileKind;

    /// Extension of produced files, lowercase without the leading dot.
    fn extension(&self) -> &str;

    /// Tag keys worth carrying over to the encoded file.
    fn accepted_tags(&self) -> Vec<ItemKey>;

    /// Encodes `stream` into a file derived from `output_hint`.
    ///
    /// The hint is the mirror-side path before extension rewrite; the
    /// encoder picks the final name and creates parent directories.
    async fn encode(
        &self,
        output_hint: &Path,
        stream: PcmStream,
    ) -> Result<FileEntry, CodecError>;

    /// Validates that the encoder is operational.
    async fn validate(&self) -> Result<(), CodecError> {
        Ok(())
    }
}

/// Runs once per directory after its encodes and copies settle.
#[async_trait]
pub trait PostEncodeHook: Send + Sync {
    /// Returns the name of this hook implementation.
    fn name(&self) -> &str;

    /// Runs the hook for the directory containing `entry`.
    async fn run(&self, entry: &FileEntry) -> Result<(), CodecError>;

    /// Validates that the hook is operational.
    async fn validate(&self) -> Result<(), CodecError> {
        Ok(())
    }
}
