//! Runtime configuration for the API client and workflow.
//!
//! Sources, later ones winning: built-in defaults, `config.json` in the
//! platform config directory, then `SHIPCALC_*` environment variables.

use std::{fmt, fs, io, path::PathBuf, time::Duration};

use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::{domain::is_valid_zip, util::persistence::config_file};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8002/";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_ORIGIN_ZIP: &str = "60540";
pub const DEFAULT_CATALOG_PAGE_SIZE: u32 = 100;

pub const ENV_API_BASE_URL: &str = "SHIPCALC_API_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "SHIPCALC_TIMEOUT_SECS";
pub const ENV_ORIGIN_ZIP: &str = "SHIPCALC_ORIGIN_ZIP";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid API base URL {value:?}: {source}")]
    InvalidBaseUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error("invalid timeout {0:?}: expected a positive number of seconds")]
    InvalidTimeout(String),
    #[error("invalid origin ZIP {0:?}: expected 5 digits")]
    InvalidOriginZip(String),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct ClientConfig {
    pub api_base_url: Url,
    pub timeout: Duration,
    pub origin_zip: String,
    pub catalog_page_size: u32,
}

/// Optional overrides read from `config.json`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub api_base_url: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub origin_zip: Option<String>,
    #[serde(default)]
    pub catalog_page_size: Option<u32>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigSource {
    File,
    Environment,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::File => f.write_str("config file"),
            ConfigSource::Environment => f.write_str("environment"),
        }
    }
}

/// A setting that was skipped; the previous layer's value stays in effect.
#[derive(Debug, Error)]
#[error("{source_kind}: {error}")]
pub struct RejectedSetting {
    pub source_kind: ConfigSource,
    #[source]
    pub error: ConfigError,
}

#[derive(Debug)]
pub struct LoadedConfig {
    pub config: ClientConfig,
    pub rejected: Vec<RejectedSetting>,
}

impl ClientConfig {
    /// Built-in defaults.
    pub fn new() -> Result<Self, ConfigError> {
        Ok(Self {
            api_base_url: parse_base_url(DEFAULT_API_BASE_URL)?,
            timeout: DEFAULT_TIMEOUT,
            origin_zip: DEFAULT_ORIGIN_ZIP.to_string(),
            catalog_page_size: DEFAULT_CATALOG_PAGE_SIZE,
        })
    }

    /// Reads the config file (if any) and the process environment.
    pub fn load() -> Result<LoadedConfig, ConfigError> {
        let mut rejected = Vec::new();
        let file = match config_file().map(read_config_file) {
            Some(Ok(file)) => file,
            Some(Err(error)) => {
                rejected.push(RejectedSetting {
                    source_kind: ConfigSource::File,
                    error,
                });
                None
            }
            None => None,
        };

        let mut loaded = Self::from_sources(file, |key| std::env::var(key).ok())?;
        rejected.append(&mut loaded.rejected);
        loaded.rejected = rejected;
        Ok(loaded)
    }

    /// Layers `file` and then `env` over the defaults. Each invalid value is
    /// skipped on its own and reported in [`LoadedConfig::rejected`].
    pub fn from_sources<F>(file: Option<ConfigFile>, env: F) -> Result<LoadedConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new()?;
        let mut rejected = Vec::new();
        let mut apply = |source_kind, outcome: Result<(), ConfigError>| {
            if let Err(error) = outcome {
                rejected.push(RejectedSetting { source_kind, error });
            }
        };

        if let Some(file) = file {
            if let Some(url) = file.api_base_url {
                apply(ConfigSource::File, config.set_base_url(&url));
            }
            if let Some(secs) = file.timeout_secs {
                apply(ConfigSource::File, config.set_timeout_secs(secs, &secs.to_string()));
            }
            if let Some(zip) = file.origin_zip {
                apply(ConfigSource::File, config.set_origin_zip(&zip));
            }
            if let Some(size) = file.catalog_page_size {
                config.catalog_page_size = size.max(1);
            }
        }

        if let Some(url) = env(ENV_API_BASE_URL) {
            apply(ConfigSource::Environment, config.set_base_url(&url));
        }
        if let Some(raw) = env(ENV_TIMEOUT_SECS) {
            let outcome = raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidTimeout(raw.clone()))
                .and_then(|secs| config.set_timeout_secs(secs, &raw));
            apply(ConfigSource::Environment, outcome);
        }
        if let Some(zip) = env(ENV_ORIGIN_ZIP) {
            apply(ConfigSource::Environment, config.set_origin_zip(&zip));
        }

        Ok(LoadedConfig { config, rejected })
    }

    /// Replaces the base URL. A trailing slash is added so relative endpoint
    /// paths join underneath it.
    pub fn with_base_url(mut self, value: &str) -> Result<Self, ConfigError> {
        self.set_base_url(value)?;
        Ok(self)
    }

    pub fn with_origin_zip(mut self, value: &str) -> Result<Self, ConfigError> {
        self.set_origin_zip(value)?;
        Ok(self)
    }

    fn set_base_url(&mut self, value: &str) -> Result<(), ConfigError> {
        self.api_base_url = parse_base_url(value)?;
        Ok(())
    }

    fn set_origin_zip(&mut self, value: &str) -> Result<(), ConfigError> {
        let zip = value.trim();
        if !is_valid_zip(zip) {
            return Err(ConfigError::InvalidOriginZip(value.to_string()));
        }
        self.origin_zip = zip.to_string();
        Ok(())
    }

    fn set_timeout_secs(&mut self, secs: u64, raw: &str) -> Result<(), ConfigError> {
        if secs == 0 {
            return Err(ConfigError::InvalidTimeout(raw.to_string()));
        }
        self.timeout = Duration::from_secs(secs);
        Ok(())
    }
}

fn parse_base_url(value: &str) -> Result<Url, ConfigError> {
    let trimmed = value.trim();
    let normalized = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };
    Url::parse(&normalized).map_err(|source| ConfigError::InvalidBaseUrl {
        value: value.to_string(),
        source,
    })
}

fn read_config_file(path: PathBuf) -> Result<Option<ConfigFile>, ConfigError> {
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => return Err(ConfigError::Io { path, source }),
    };
    serde_json::from_str(&content)
        .map(Some)
        .map_err(|source| ConfigError::Parse { path, source })
}
