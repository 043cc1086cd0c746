//! Testing utilities and mock implementations for engine tests.
//!
//! Mock decoder, encoder and hook implement the codec traits without
//! spawning external processes, so full sync runs can be exercised against
//! plain temp directories.

mod mock_decoder;
mod mock_encoder;
mod mock_hook;

pub use mock_decoder::MockDecoder;
pub use mock_encoder::MockEncoder;
pub use mock_hook::MockHook;
