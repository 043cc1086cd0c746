use std::path::PathBuf;

use thiserror::Error;

use crate::mapping::MappingError;

#[derive(Debug, Error)]
pub enum DifferError {
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Mapping(#[from] MappingError),
}

impl DifferError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
