//! Configuration loader and validator for the calendar sync service.
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(&'static str),
}

/// Root configuration struct mirroring the YAML schema exactly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    pub backend: Backend,
    pub release: Release,
    pub http: Http,
    pub paging: Paging,
}

/// Calendar backend API settings. The base URL is never hardcoded at call
/// sites; every endpoint is joined onto it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Backend {
    pub base_url: String,
}

/// Release feed settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Release {
    pub latest_url: String,
}

/// HTTP transport settings applied to every outbound request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Http {
    pub timeout_secs: u64,
}

/// Page sizes for the machine-friendly feed. Tuning parameters only; loop
/// termination is cursor equality, never page size.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Paging {
    pub initial_page_size: u64,
    pub page_size: u64,
}

impl Config {
    /// Parsed backend base URL, normalized to end with a slash so endpoint
    /// joins append instead of replacing the last path segment.
    pub fn backend_url(&self) -> Result<Url, ConfigError> {
        let mut raw = self.backend.base_url.clone();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        Url::parse(&raw).map_err(|_| ConfigError::Invalid("backend.base_url must be a valid URL"))
    }

    /// Parsed latest-release feed URL.
    pub fn release_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.release.latest_url)
            .map_err(|_| ConfigError::Invalid("release.latest_url must be a valid URL"))
    }
}

/// Load configuration from a YAML file and validate it.
/// - If `path` is None, uses `config.yaml` in the current working directory.
pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = path.unwrap_or_else(|| Path::new("config.yaml"));
    let content = fs::read_to_string(path)?;
    let cfg: Config = serde_yaml::from_str(&content)?;
    validate(&cfg)?;
    Ok(cfg)
}

/// Validate a configuration instance.
fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if cfg.backend.base_url.trim().is_empty() {
        return Err(ConfigError::Invalid("backend.base_url must be non-empty"));
    }
    cfg.backend_url()?;

    if cfg.release.latest_url.trim().is_empty() {
        return Err(ConfigError::Invalid("release.latest_url must be non-empty"));
    }
    cfg.release_url()?;

    if cfg.http.timeout_secs == 0 {
        return Err(ConfigError::Invalid("http.timeout_secs must be > 0"));
    }

    if cfg.paging.initial_page_size == 0 {
        return Err(ConfigError::Invalid(
            "paging.initial_page_size must be > 0",
        ));
    }
    if cfg.paging.page_size == 0 {
        return Err(ConfigError::Invalid("paging.page_size must be > 0"));
    }

    Ok(())
}

/// Returns the canonical example YAML content.
pub fn example() -> &'static str {
    r#"backend:
  base_url: "https://quotemanagerapi20220701201338.azurewebsites.net/api/Calendar/"

release:
  latest_url: "https://api.github.com/repos/beyarkay/eskom-calendar/releases/latest"

http:
  timeout_secs: 30

paging:
  initial_page_size: 1000
  page_size: 500
"#
}
