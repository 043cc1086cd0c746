//! Decoding, encoding and post-processing of audio files.
//!
//! A [`Decoder`] turns a lossless file into a PCM stream, an [`Encoder`]
//! turns that stream into the mirror-side artifact, and a
//! [`PostEncodeHook`] runs once per touched directory afterwards. The
//! concrete implementations shell out to `sox`, `lame` and `mp3gain`.

mod config;
mod error;
mod lame;
mod replaygain;
mod sox;
mod tags;
mod traits;
mod types;

pub use config::CodecConfig;
pub use error::CodecError;
pub use lame::LameEncoder;
pub use replaygain::Mp3GainHook;
pub use sox::SoxDecoder;
pub use tags::{mp3_accepted_keys, transfer_tags};
pub use traits::{Decoder, Encoder, PostEncodeHook};
pub use types::{EncodedArtifact, PcmStream};
