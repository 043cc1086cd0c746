//! Bidirectional path translation between the source and mirror trees.
//!
//! The mirror tree is a structural copy of the source tree in which every
//! lossless audio file has been replaced by a lossy-encoded counterpart.
//! Forward mapping (`to_mirror`) rewrites lossless extensions to the
//! configured lossy extension; reverse mapping (`to_source_candidates`)
//! cannot recover the original extension and therefore returns every path
//! that could have produced the mirror entry.

mod error;
mod mapper;

pub use error::MappingError;
pub use mapper::{LibraryRoots, PathMapper};
