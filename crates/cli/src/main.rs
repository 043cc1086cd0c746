use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use downmirror_core::{
    load_config, Config, Decoder, Encoder, LameEncoder, LibraryRoots, Mp3GainHook,
    PostEncodeHook, SoxDecoder, SyncEngine,
};

/// Mirrors a lossless music library into a lossy-encoded copy.
#[derive(Parser)]
#[command(name = "downmirror", version, about)]
struct Cli {
    /// Delete mirror files and directories whose source is gone.
    #[arg(long)]
    delete: bool,

    /// Target lossy format.
    #[arg(long, value_enum, default_value_t = Format::Mp3)]
    format: Format,

    /// Path to a TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Root of the lossless source library.
    source: PathBuf,

    /// Root of the lossy mirror.
    destination: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Mp3,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config_path = cli
        .config
        .or_else(|| std::env::var("DOWNMIRROR_CONFIG").map(PathBuf::from).ok());
    let config = match config_path {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            load_config(&path)
                .with_context(|| format!("Failed to load config from {:?}", path))?
        }
        None => Config::default(),
    };

    let roots = LibraryRoots::new(&cli.source, &cli.destination)
        .context("Invalid source or destination root")?;

    let report = match cli.format {
        Format::Mp3 => {
            let decoder = SoxDecoder::new(config.codec.clone());
            let encoder = LameEncoder::new(config.codec.clone());
            let hook = Mp3GainHook::new(config.codec.clone());
            decoder.validate().await.context("sox is not usable")?;
            encoder.validate().await.context("lame is not usable")?;
            hook.validate().await.context("mp3gain is not usable")?;
            let engine = SyncEngine::new(roots, decoder, encoder, hook, config.pipeline)
                .context("Failed to build sync engine")?;
            engine.run(cli.delete).await.context("Sync failed")?
        }
    };

    info!(
        copied = report.files_copied,
        encoded = report.files_encoded,
        tags_carried = report.tags_carried,
        files_deleted = report.files_deleted,
        dirs_deleted = report.dirs_deleted,
        "sync complete"
    );

    if report.hook_failures > 0 {
        anyhow::bail!("{} post-encode hook run(s) failed", report.hook_failures);
    }
    Ok(())
}
