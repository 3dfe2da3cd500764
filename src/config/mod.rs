mod file_config;

pub use file_config::FileConfig;

use anyhow::{bail, Result};
use std::path::PathBuf;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub catalog_db: Option<PathBuf>,
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub upload_timeout_sec: u64,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub catalog_db: PathBuf,
    pub base_url: String,
    pub api_key: String,
    pub upload_timeout_sec: u64,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let catalog_db = file
            .catalog_db
            .map(PathBuf::from)
            .or_else(|| cli.catalog_db.clone())
            .ok_or_else(|| {
                anyhow::anyhow!("catalog_db must be specified via --catalog-db or in config file")
            })?;

        if !catalog_db.exists() {
            bail!("Catalog database does not exist: {:?}", catalog_db);
        }
        if !catalog_db.is_file() {
            bail!("catalog_db is not a file: {:?}", catalog_db);
        }

        let base_url = file
            .base_url
            .or_else(|| cli.base_url.clone())
            .ok_or_else(|| {
                anyhow::anyhow!("base_url must be specified via --base-url or in config file")
            })?;
        let base_url = base_url.trim_end_matches('/').to_string();

        let api_key = file.api_key.or_else(|| cli.api_key.clone()).ok_or_else(|| {
            anyhow::anyhow!("api_key must be specified via --api-key or in config file")
        })?;

        let upload_timeout_sec = file.upload_timeout_sec.unwrap_or(cli.upload_timeout_sec);

        Ok(Self {
            catalog_db,
            base_url,
            api_key,
            upload_timeout_sec,
        })
    }
}
