// src/config.rs
use serde::Deserialize;
use std::path::PathBuf;

/// Overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "PRINTDESK_CONFIG";
/// Comma-separated CORS origins; replaces `server.allowed_origins`.
pub const ALLOWED_ORIGINS_ENV: &str = "PRINTDESK_ALLOWED_ORIGINS";

const DEFAULT_CONFIG_FILE: &str = "printdesk.toml";
const ENV_PREFIX: &str = "PRINTDESK";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub printing: PrintingConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Largest accepted request body.
    pub max_body_bytes: usize,
    /// `"*"` or an empty list allows any origin.
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 19613,
            max_body_bytes: 10 * 1024 * 1024,
            allowed_origins: vec!["*".to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PrintingConfig {
    /// Client identifier sent when loading remote URLs.
    pub user_agent: String,
    pub preview_prefix: String,
    /// Where preview PDFs are written. Defaults to the OS temp dir.
    pub preview_dir: Option<PathBuf>,
    /// Upper bound on the readiness wait. Unset waits indefinitely.
    pub ready_timeout_ms: Option<u64>,
}

impl Default for PrintingConfig {
    fn default() -> Self {
        Self {
            user_agent: "PrintDesk".to_string(),
            preview_prefix: "print-preview".to_string(),
            preview_dir: None,
            ready_timeout_ms: None,
        }
    }
}

impl PrintingConfig {
    pub fn preview_dir(&self) -> PathBuf {
        self.preview_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}

impl Config {
    /// Loads `printdesk.toml` (or the file named by `PRINTDESK_CONFIG`) if
    /// present, then `PRINTDESK__SECTION__KEY` environment variables, then
    /// `PRINTDESK_ALLOWED_ORIGINS`.
    pub fn load() -> Result<Self, config::ConfigError> {
        let path = std::env::var(CONFIG_PATH_ENV)
            .ok()
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string());

        let mut config = Self::from_file(&path)?;
        if let Ok(origins) = std::env::var(ALLOWED_ORIGINS_ENV) {
            config.server.allowed_origins = parse_origin_list(&origins);
        }
        Ok(config)
    }

    /// A missing file is not an error; every field has a default.
    pub fn from_file(path: &str) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }
}

/// Splits a comma-separated origin list, dropping blanks.
pub fn parse_origin_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}
