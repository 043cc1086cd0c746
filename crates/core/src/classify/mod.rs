//! File classification for sync candidates.
//!
//! Classification maps a filesystem path to a typed [`FileEntry`] using an
//! ordered registry of matchers, one per concrete kind. The first matcher
//! that accepts the path wins; a path no matcher accepts is unrecognized and
//! skipped by the caller. Matchers check the cheap signal (extension or
//! basename) before touching file contents, so the common miss never costs
//! an open.

mod error;
mod matchers;
mod types;

pub use error::ClassifyError;
pub use matchers::{ArtMatcher, FileClassifier, FlacMatcher, Mp3Matcher, TypeMatcher};
pub use types::{FileEntry, FileKind};
