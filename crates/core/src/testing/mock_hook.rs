//! Mock post-encode hook for testing.

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::classify::FileEntry;
use crate::codec::{CodecError, PostEncodeHook};

/// Mock implementation of the [`PostEncodeHook`] trait.
///
/// Records the anchor entry of every invocation; can be switched to fail
/// every call. Clones share state.
#[derive(Clone)]
pub struct MockHook {
    invocations: Arc<RwLock<Vec<PathBuf>>>,
    always_fail: Arc<RwLock<bool>>,
}

impl Default for MockHook {
    fn default() -> Self {
        Self::new()
    }
}

impl MockHook {
    pub fn new() -> Self {
        Self {
            invocations: Arc::new(RwLock::new(Vec::new())),
            always_fail: Arc::new(RwLock::new(false)),
        }
    }

    /// Anchor paths the hook was invoked with.
    pub async fn invocations(&self) -> Vec<PathBuf> {
        self.invocations.read().await.clone()
    }

    pub async fn invocation_count(&self) -> usize {
        self.invocations.read().await.len()
    }

    /// Make every subsequent call fail.
    pub async fn set_always_fail(&self, fail: bool) {
        *self.always_fail.write().await = fail;
    }
}

#[async_trait]
impl PostEncodeHook for MockHook {
    fn name(&self) -> &str {
        "mock"
    }

    async fn run(&self, entry: &FileEntry) -> Result<(), CodecError> {
        self.invocations.write().await.push(entry.path.clone());
        if *self.always_fail.read().await {
            return Err(CodecError::hook_failed(
                "mock",
                entry.directory(),
                "configured to fail",
            ));
        }
        Ok(())
    }
}
