pub mod classify;
pub mod codec;
pub mod config;
pub mod differ;
pub mod mapping;
pub mod pipeline;
pub mod testing;

pub use classify::{ClassifyError, FileClassifier, FileEntry, FileKind};
pub use codec::{
    CodecConfig, CodecError, Decoder, EncodedArtifact, Encoder, LameEncoder, Mp3GainHook,
    PcmStream, PostEncodeHook, SoxDecoder,
};
pub use config::{load_config, load_config_from_str, Config, ConfigError, PipelineConfig};
pub use differ::{DiffBatch, DifferError, DirectoryDiffer, OrphanBatch};
pub use mapping::{LibraryRoots, MappingError, PathMapper};
pub use pipeline::{EngineError, RunPhase, SyncEngine, SyncReport, SyncStats};
