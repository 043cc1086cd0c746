//! Sync engine implementation.

use std::sync::Arc;

use tokio::sync::{RwLock, Semaphore};
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{timeout, Duration};
use tracing::{debug, error, info, trace, warn};

use super::error::EngineError;
use super::types::{RunPhase, SyncReport, SyncStats};
use crate::classify::{FileClassifier, FileEntry, FileKind};
use crate::codec::{transfer_tags, CodecError, Decoder, EncodedArtifact, Encoder, PostEncodeHook};
use crate::config::PipelineConfig;
use crate::differ::{DiffBatch, DirectoryDiffer};
use crate::mapping::{LibraryRoots, PathMapper};

/// Drives one mirror sync from end to end.
///
/// Directory batches are processed in walk order: copies run inline,
/// encodes fan out over a bounded worker pool and are joined before the
/// directory's post-encode hook is spawned. Hook tasks share the pool but
/// outlive their batch; they are drained before deletion starts.
pub struct SyncEngine<D: Decoder, E: Encoder, H: PostEncodeHook> {
    mapper: Arc<PathMapper>,
    classifier: FileClassifier,
    differ: DirectoryDiffer,
    decoder: Arc<D>,
    encoder: Arc<E>,
    hook: Arc<H>,
    semaphore: Arc<Semaphore>,
    job_timeout: Duration,
    stats: Arc<SyncStats>,
    phase: RwLock<RunPhase>,
}

impl<D, E, H> SyncEngine<D, E, H>
where
    D: Decoder + 'static,
    E: Encoder + 'static,
    H: PostEncodeHook + 'static,
{
    /// Creates a new engine over validated roots.
    pub fn new(
        roots: LibraryRoots,
        decoder: D,
        encoder: E,
        hook: H,
        config: PipelineConfig,
    ) -> Result<Self, EngineError> {
        if encoder.target_kind() != FileKind::Lossy {
            return Err(EngineError::EncoderMismatch {
                name: encoder.name().to_string(),
            });
        }

        let classifier = FileClassifier::with_default_matchers();
        let mapper = Arc::new(PathMapper::new(
            roots,
            classifier.lossless_extensions(),
            encoder.extension().to_string(),
        ));
        let differ = DirectoryDiffer::new(Arc::clone(&mapper));
        let workers = config.worker_count();

        Ok(Self {
            mapper,
            classifier,
            differ,
            decoder: Arc::new(decoder),
            encoder: Arc::new(encoder),
            hook: Arc::new(hook),
            semaphore: Arc::new(Semaphore::new(workers)),
            job_timeout: Duration::from_secs(config.job_timeout_secs),
            stats: Arc::new(SyncStats::default()),
            phase: RwLock::new(RunPhase::Idle),
        })
    }

    /// Current phase of the run.
    pub async fn phase(&self) -> RunPhase {
        *self.phase.read().await
    }

    /// Runs a full sync. With `prune`, orphaned mirror entries are deleted
    /// after all batches and hooks settle.
    pub async fn run(&self, prune: bool) -> Result<SyncReport, EngineError> {
        match self.run_inner(prune).await {
            Ok(report) => {
                self.set_phase(RunPhase::Done).await;
                Ok(report)
            }
            Err(e) => {
                self.set_phase(RunPhase::Failed).await;
                Err(e)
            }
        }
    }

    async fn run_inner(&self, prune: bool) -> Result<SyncReport, EngineError> {
        self.set_phase(RunPhase::Scanning).await;
        info!(
            source = %self.mapper.roots().source().display(),
            mirror = %self.mapper.roots().mirror().display(),
            "starting sync"
        );

        let mut hook_handles = Vec::new();
        let mut scan = self.differ.source_changes();
        while let Some(batch) = scan.next_batch().await? {
            self.set_phase(RunPhase::Processing).await;
            self.process_batch(batch, &mut hook_handles).await?;
        }

        self.set_phase(RunPhase::Draining).await;
        debug!(hooks = hook_handles.len(), "draining post-encode hooks");
        for handle in hook_handles {
            handle.await.map_err(|e| EngineError::WorkerFailed {
                detail: e.to_string(),
            })?;
        }

        if prune {
            self.set_phase(RunPhase::Deleting).await;
            self.delete_orphans().await?;
        }

        let report = self.stats.snapshot();
        info!(
            copied = report.files_copied,
            encoded = report.files_encoded,
            deleted = report.files_deleted + report.dirs_deleted,
            hook_failures = report.hook_failures,
            "sync finished"
        );
        Ok(report)
    }

    async fn process_batch(
        &self,
        batch: DiffBatch,
        hook_handles: &mut Vec<JoinHandle<()>>,
    ) -> Result<(), EngineError> {
        debug!(directory = %batch.directory.display(), files = batch.files.len(), "processing batch");

        let mut lossless = Vec::new();
        let mut last_lossy: Option<FileEntry> = None;
        for file in &batch.files {
            match self.classifier.classify(file) {
                Ok(Some(entry)) if entry.kind == FileKind::Lossless => lossless.push(entry),
                Ok(Some(entry)) => {
                    let copied = self.copy_entry(&entry).await?;
                    if copied.kind == FileKind::Lossy {
                        last_lossy = Some(copied);
                    }
                }
                Ok(None) => trace!(file = %file.display(), "unrecognized file, skipping"),
                Err(e) => warn!(file = %file.display(), error = %e, "skipping file"),
            }
        }

        let mut encodes: JoinSet<Result<EncodedArtifact, CodecError>> = JoinSet::new();
        for entry in lossless {
            let permit = Arc::clone(&self.semaphore)
                .acquire_owned()
                .await
                .map_err(|e| EngineError::WorkerFailed {
                    detail: e.to_string(),
                })?;
            let decoder = Arc::clone(&self.decoder);
            let encoder = Arc::clone(&self.encoder);
            let hint = self.mapper.to_mirror(&entry.path)?;

            let job_timeout = self.job_timeout;
            encodes.spawn(async move {
                let _permit = permit;
                let work = async {
                    let stream = decoder.decode(&entry).await?;
                    let output = encoder.encode(&hint, stream).await?;
                    let carried_tags =
                        transfer_tags(&entry.path, &output.path, encoder.accepted_tags()).await?;
                    debug!(output = %output.path.display(), carried_tags, "encoded");
                    Ok(EncodedArtifact {
                        output,
                        carried_tags,
                    })
                };
                match timeout(job_timeout, work).await {
                    Ok(result) => result,
                    Err(_) => Err(CodecError::Timeout {
                        timeout_secs: job_timeout.as_secs(),
                    }),
                }
            });
        }

        let mut last_encoded: Option<FileEntry> = None;
        while let Some(joined) = encodes.join_next().await {
            let artifact = joined.map_err(|e| EngineError::WorkerFailed {
                detail: e.to_string(),
            })??;
            self.stats.record_encode(artifact.carried_tags);
            last_encoded = Some(artifact.output);
        }

        if let Some(entry) = last_encoded.or(last_lossy) {
            hook_handles.push(self.spawn_hook(entry));
        }
        Ok(())
    }

    async fn copy_entry(&self, entry: &FileEntry) -> Result<FileEntry, EngineError> {
        let dst = self.mapper.to_mirror(&entry.path)?;
        let copy_err = |e| EngineError::CopyFailed {
            src: entry.path.clone(),
            dst: dst.clone(),
            source: e,
        };
        if let Some(parent) = dst.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(copy_err)?;
        }
        tokio::fs::copy(&entry.path, &dst).await.map_err(copy_err)?;
        self.stats.record_copy();
        debug!(src = %entry.path.display(), dst = %dst.display(), "copied");
        Ok(FileEntry::new(dst, entry.kind))
    }

    /// One hook per directory, anchored on the preferred mirror entry.
    fn spawn_hook(&self, entry: FileEntry) -> JoinHandle<()> {
        let hook = Arc::clone(&self.hook);
        let semaphore = Arc::clone(&self.semaphore);
        let stats = Arc::clone(&self.stats);
        tokio::spawn(async move {
            let Ok(_permit) = semaphore.acquire_owned().await else {
                return;
            };
            match hook.run(&entry).await {
                Ok(()) => {
                    info!(
                        hook = hook.name(),
                        directory = %entry.directory().display(),
                        "post-encode hook finished"
                    );
                }
                Err(e) => {
                    error!(
                        hook = hook.name(),
                        directory = %entry.directory().display(),
                        error = %e,
                        "post-encode hook failed"
                    );
                    stats.record_hook_failure();
                }
            }
        })
    }

    async fn delete_orphans(&self) -> Result<(), EngineError> {
        let mut scan = self.differ.mirror_orphans();
        while let Some(batch) = scan.next_batch().await? {
            for file in batch.files {
                match tokio::fs::remove_file(&file).await {
                    Ok(()) => {
                        info!(file = %file.display(), "deleted orphan file");
                        self.stats.record_file_deleted();
                    }
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                    Err(e) => return Err(EngineError::DeleteFailed { path: file, source: e }),
                }
            }
            for dir in batch.subdirs {
                match tokio::fs::remove_dir_all(&dir).await {
                    Ok(()) => {
                        info!(directory = %dir.display(), "deleted orphan directory");
                        self.stats.record_dir_deleted();
                    }
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                    Err(e) => return Err(EngineError::DeleteFailed { path: dir, source: e }),
                }
            }
        }
        Ok(())
    }

    async fn set_phase(&self, phase: RunPhase) {
        *self.phase.write().await = phase;
    }
}
