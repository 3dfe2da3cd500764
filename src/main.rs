use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use bulk_media_importer::catalog::SqliteCatalogStore;
use bulk_media_importer::config::{AppConfig, CliConfig, FileConfig};
use bulk_media_importer::importer::{Importer, DEFAULT_ALLOWED_EXTENSIONS};
use bulk_media_importer::uploader::HttpUploadClient;

fn parse_path(s: &str) -> Result<PathBuf> {
    let original_path = PathBuf::from(s);
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

/// Bulk file upload.
#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to the directory to scan.
    #[clap(long, value_parser = parse_path)]
    pub path: PathBuf,

    /// Track type for the new files.
    #[clap(long)]
    pub track_type: Option<String>,

    /// Allowed file extensions (default: flac, m4a, mp3, ogg, opus, wav).
    #[clap(long = "allowed-extensions")]
    pub allowed_extensions: Vec<String>,

    /// Delete file if upload succeeded.
    #[clap(long)]
    pub delete_after_upload: bool,

    /// Delete file if it already exists.
    #[clap(long)]
    pub delete_if_exists: bool,

    /// Path to the SQLite catalog database file.
    #[clap(long, value_parser = parse_path)]
    pub catalog_db: Option<PathBuf>,

    /// Base URL of the media server.
    #[clap(long)]
    pub base_url: Option<String>,

    /// API key for the media server.
    #[clap(long)]
    pub api_key: Option<String>,

    /// Timeout in seconds for each upload request.
    #[clap(long, default_value_t = 30)]
    pub upload_timeout_sec: u64,

    /// Path to a TOML config file. Values in the file override CLI values.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .unwrap();

    let file_config = match &cli_args.config {
        Some(path) => Some(FileConfig::load(path)?),
        None => None,
    };

    let cli_config = CliConfig {
        catalog_db: cli_args.catalog_db.clone(),
        base_url: cli_args.base_url.clone(),
        api_key: cli_args.api_key.clone(),
        upload_timeout_sec: cli_args.upload_timeout_sec,
    };
    let config = AppConfig::resolve(&cli_config, file_config)?;

    info!("Opening SQLite catalog database at {:?}...", config.catalog_db);
    let catalog = SqliteCatalogStore::open(&config.catalog_db)?;

    let uploader = HttpUploadClient::new(
        config.base_url.clone(),
        config.api_key.clone(),
        config.upload_timeout_sec,
    )?;

    let allowed_extensions: Vec<String> = if cli_args.allowed_extensions.is_empty() {
        DEFAULT_ALLOWED_EXTENSIONS
            .iter()
            .map(|s| s.to_string())
            .collect()
    } else {
        cli_args.allowed_extensions.clone()
    };

    let importer = Importer::new(
        &catalog,
        &uploader,
        cli_args.delete_after_upload,
        cli_args.delete_if_exists,
    );

    info!("Importing from {:?}...", cli_args.path);
    let stats = importer.run(
        &cli_args.path,
        cli_args.track_type.as_deref(),
        &allowed_extensions,
    )?;

    info!(
        "Import finished: {} uploaded, {} duplicates, {} deleted",
        stats.uploaded, stats.duplicates, stats.deleted
    );

    Ok(())
}
