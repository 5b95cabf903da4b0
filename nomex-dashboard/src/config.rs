use config::{Config, ConfigError, File};
use log::LevelFilter;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::logging::LogConfig;

const CONFIG_FILE_NAME: &str = "nomex.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct Server {
    pub base_url: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Logging {
    pub enabled: bool,
    pub file: String,
    pub level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: Server,
    pub logging: Logging,
}

impl Settings {
    /// Defaults, then `nomex.toml` from the working directory if present,
    /// then `NOMEX_*` environment variables.
    pub fn new() -> Result<Self, ConfigError> {
        let mut builder = Self::builder(Some(Path::new(CONFIG_FILE_NAME)))?;

        if let Ok(url) = std::env::var("NOMEX_SERVER_URL") {
            builder = builder.set_override("server.base_url", url)?;
        }
        if let Ok(secs) = std::env::var("NOMEX_REQUEST_TIMEOUT_SECS") {
            builder = builder.set_override("server.request_timeout_secs", secs)?;
        }
        if let Ok(file) = std::env::var("NOMEX_LOG_FILE") {
            builder = builder.set_override("logging.file", file)?;
        }
        if let Ok(level) = std::env::var("NOMEX_LOG_LEVEL") {
            builder = builder.set_override("logging.level", level)?;
        }

        builder.build()?.try_deserialize()
    }

    /// Defaults plus a specific settings file, without environment overrides
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        Self::builder(Some(path))?.build()?.try_deserialize()
    }

    fn builder(
        file: Option<&Path>,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        let mut builder = Config::builder()
            .set_default("server.base_url", "http://localhost:3000/api")?
            .set_default("server.request_timeout_secs", 30)?
            .set_default("logging.enabled", true)?
            .set_default("logging.file", "nomex_debug.log")?
            .set_default("logging.level", "debug")?;

        if let Some(path) = file {
            builder = builder.add_source(File::from(path.to_path_buf()).required(false));
        }

        Ok(builder)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout_secs)
    }

    /// Logging setup derived from the `[logging]` section.
    /// Unknown level names fall back to debug.
    pub fn log_config(&self) -> LogConfig {
        let level = self.logging.level.parse().unwrap_or_else(|_| {
            log::warn!("Unknown log level '{}', using debug", self.logging.level);
            LevelFilter::Debug
        });
        LogConfig {
            enabled: self.logging.enabled,
            log_file: PathBuf::from(&self.logging.file),
            level,
            ..LogConfig::default()
        }
    }
}
