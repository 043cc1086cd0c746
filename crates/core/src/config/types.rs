use serde::{Deserialize, Serialize};

use crate::codec::CodecConfig;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub codec: CodecConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

/// Worker pool configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PipelineConfig {
    /// Number of parallel workers; defaults to the number of CPUs.
    #[serde(default)]
    pub workers: Option<usize>,

    /// Timeout for a single decode/encode job in seconds.
    #[serde(default = "default_job_timeout")]
    pub job_timeout_secs: u64,
}

fn default_job_timeout() -> u64 {
    3600 // 1 hour
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            workers: None,
            job_timeout_secs: default_job_timeout(),
        }
    }
}

impl PipelineConfig {
    /// Effective pool size.
    pub fn worker_count(&self) -> usize {
        match self.workers {
            Some(n) if n > 0 => n,
            _ => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pipeline_sizes_to_cpus() {
        let config = PipelineConfig::default();
        assert!(config.worker_count() >= 1);
    }

    #[test]
    fn test_explicit_worker_count() {
        let config = PipelineConfig {
            workers: Some(3),
            ..Default::default()
        };
        assert_eq!(config.worker_count(), 3);
    }

    #[test]
    fn test_zero_workers_falls_back() {
        let config = PipelineConfig {
            workers: Some(0),
            ..Default::default()
        };
        assert!(config.worker_count() >= 1);
    }

    #[test]
    fn test_default_job_timeout() {
        let config = PipelineConfig::default();
        assert_eq!(config.job_timeout_secs, 3600);
    }
}
