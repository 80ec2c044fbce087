//! Configuration loading and resolution
//!
//! Settings are resolved in priority order:
//! 1. Command-line argument / its bound environment variable (highest priority)
//! 2. TOML config file
//! 3. Compiled default (fallback)
//!
//! Enrichment settings have no command-line flags; their environment
//! variables take precedence over the TOML `[enrichment]` table.

use crate::{Error, Result};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Environment variable holding the enrichment service credential
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
/// Environment variable overriding the enrichment service base URL
pub const BASE_URL_ENV: &str = "OPENAI_BASE_URL";
/// Environment variable overriding the enrichment model name
pub const MODEL_ENV: &str = "LEADQ_ENRICHMENT_MODEL";

pub const DEFAULT_BIND: &str = "127.0.0.1:8000";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_LOG_LEVEL: &str = "info";

const DATABASE_FILE: &str = "app.db";
const SEED_FILE: &str = "leads.csv";

/// Contents of the optional TOML config file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub root_folder: Option<PathBuf>,
    pub database_path: Option<PathBuf>,
    pub seed_file: Option<PathBuf>,
    pub bind: Option<String>,
    pub log_level: Option<String>,
    #[serde(default)]
    pub enrichment: EnrichmentToml,
}

/// `[enrichment]` table of the TOML config file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnrichmentToml {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Values supplied on the command line (or their bound env vars)
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub root_folder: Option<PathBuf>,
    pub database_path: Option<PathBuf>,
    pub seed_file: Option<PathBuf>,
    pub bind: Option<String>,
}

/// Fully resolved service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub root_folder: PathBuf,
    pub database_path: PathBuf,
    pub seed_file: PathBuf,
    pub bind: SocketAddr,
    pub log_level: String,
    pub enrichment: EnrichmentConfig,
}

/// Settings for the external text-generation service
#[derive(Clone)]
pub struct EnrichmentConfig {
    /// Credential; `None` disables enrichment entirely
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    /// Per-call timeout
    pub timeout: Duration,
}

impl std::fmt::Debug for EnrichmentConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnrichmentConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl EnrichmentConfig {
    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    /// Resolve enrichment settings: environment → TOML → default
    pub fn resolve(toml: &EnrichmentToml) -> Self {
        let api_key = non_blank(std::env::var(API_KEY_ENV).ok())
            .or_else(|| non_blank(toml.api_key.clone()));
        let model = non_blank(std::env::var(MODEL_ENV).ok())
            .or_else(|| non_blank(toml.model.clone()))
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let base_url = non_blank(std::env::var(BASE_URL_ENV).ok())
            .or_else(|| non_blank(toml.base_url.clone()))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let timeout_secs = match toml.timeout_secs {
            Some(0) => {
                warn!("enrichment.timeout_secs = 0 is not allowed, using {}", DEFAULT_TIMEOUT_SECS);
                DEFAULT_TIMEOUT_SECS
            }
            Some(secs) => secs,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Self {
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(timeout_secs),
        }
    }
}

impl ServiceConfig {
    /// Merge command-line overrides, TOML values and compiled defaults
    pub fn resolve(overrides: Overrides, toml: TomlConfig) -> Result<Self> {
        let root_folder = overrides
            .root_folder
            .or(toml.root_folder)
            .unwrap_or_else(default_root_folder);

        let database_path = overrides
            .database_path
            .or(toml.database_path)
            .unwrap_or_else(|| root_folder.join(DATABASE_FILE));

        let seed_file = overrides
            .seed_file
            .or(toml.seed_file)
            .unwrap_or_else(|| root_folder.join(SEED_FILE));

        let bind_str = overrides
            .bind
            .or(toml.bind)
            .unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind = bind_str
            .parse::<SocketAddr>()
            .map_err(|e| Error::Config(format!("Invalid bind address '{}': {}", bind_str, e)))?;

        let log_level = toml
            .log_level
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

        Ok(Self {
            root_folder,
            database_path,
            seed_file,
            bind,
            log_level,
            enrichment: EnrichmentConfig::resolve(&toml.enrichment),
        })
    }
}

/// Load the TOML config file
///
/// An explicitly requested file must exist and parse. Without one, the
/// platform default location is tried; if it is absent the compiled defaults
/// apply, and if it is broken a warning is logged and the defaults apply.
pub fn load_toml_config(explicit: Option<&Path>) -> Result<TomlConfig> {
    if let Some(path) = explicit {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Cannot read config file {}: {}", path.display(), e))
        })?;
        return parse_toml(&content)
            .map_err(|e| Error::Config(format!("Invalid config file {}: {}", path.display(), e)));
    }

    let Some(path) = default_config_path().filter(|p| p.exists()) else {
        return Ok(TomlConfig::default());
    };

    match std::fs::read_to_string(&path).map(|content| parse_toml(&content)) {
        Ok(Ok(config)) => {
            info!("Loaded config file: {}", path.display());
            Ok(config)
        }
        Ok(Err(e)) => {
            warn!("Ignoring invalid config file {}: {}", path.display(), e);
            Ok(TomlConfig::default())
        }
        Err(e) => {
            warn!("Ignoring unreadable config file {}: {}", path.display(), e);
            Ok(TomlConfig::default())
        }
    }
}

fn parse_toml(content: &str) -> std::result::Result<TomlConfig, toml::de::Error> {
    toml::from_str(content)
}

/// `<config dir>/leadq/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("leadq").join("config.toml"))
}

/// OS-dependent default root folder
pub fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("leadq"))
        .unwrap_or_else(|| PathBuf::from("./leadq_data"))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
