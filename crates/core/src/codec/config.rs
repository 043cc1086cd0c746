//! Configuration for the codec module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the sox/lame/mp3gain toolchain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodecConfig {
    /// Path to the sox binary.
    #[serde(default = "default_sox_path")]
    pub sox_path: PathBuf,

    /// Path to the lame binary.
    #[serde(default = "default_lame_path")]
    pub lame_path: PathBuf,

    /// Path to the mp3gain binary.
    #[serde(default = "default_mp3gain_path")]
    pub mp3gain_path: PathBuf,

    /// Sample rate of the decoded PCM stream in Hz.
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Bit depth of the decoded PCM stream.
    #[serde(default = "default_bit_depth")]
    pub bit_depth: u32,

    /// LAME VBR quality, 0 (best) to 9.
    #[serde(default)]
    pub vbr_quality: u8,

    /// Additional lame arguments.
    #[serde(default)]
    pub extra_lame_args: Vec<String>,
}

fn default_sox_path() -> PathBuf {
    PathBuf::from("sox")
}

fn default_lame_path() -> PathBuf {
    PathBuf::from("lame")
}

fn default_mp3gain_path() -> PathBuf {
    PathBuf::from("mp3gain")
}

fn default_sample_rate() -> u32 {
    44100
}

fn default_bit_depth() -> u32 {
    16
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            sox_path: default_sox_path(),
            lame_path: default_lame_path(),
            mp3gain_path: default_mp3gain_path(),
            sample_rate: default_sample_rate(),
            bit_depth: default_bit_depth(),
            vbr_quality: 0,
            extra_lame_args: Vec::new(),
        }
    }
}

impl CodecConfig {
    /// Sets the sox binary path.
    pub fn with_sox_path(mut self, path: PathBuf) -> Self {
        self.sox_path = path;
        self
    }

    /// Sets the lame binary path.
    pub fn with_lame_path(mut self, path: PathBuf) -> Self {
        self.lame_path = path;
        self
    }

    /// Sets the VBR quality.
    pub fn with_vbr_quality(mut self, quality: u8) -> Self {
        self.vbr_quality = quality;
        self
    }
}
