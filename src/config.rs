use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use incident_sim_core::context::{DEFAULT_CALL_WINDOW_SECS, DEFAULT_UTC_OFFSET_HOURS};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub structured_store: StoreConfig,
    pub document_store: StoreConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GenerationConfig {
    /// Fixed seed for reproducible runs. Entropy is used when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_count")]
    pub default_count: usize,
    #[serde(default = "default_utc_offset_hours")]
    pub utc_offset_hours: i32,
    #[serde(default = "default_call_window_secs")]
    pub call_window_secs: i64,
    #[serde(default)]
    pub notes_per_incident: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            seed: None,
            default_count: default_count(),
            utc_offset_hours: default_utc_offset_hours(),
            call_window_secs: default_call_window_secs(),
            notes_per_incident: 0,
        }
    }
}

fn default_count() -> usize {
    10
}
fn default_utc_offset_hours() -> i32 {
    DEFAULT_UTC_OFFSET_HOURS
}
fn default_call_window_secs() -> i64 {
    DEFAULT_CALL_WINDOW_SECS
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,
    #[serde(default = "default_refresh_secs")]
    pub refresh_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            recent_limit: default_recent_limit(),
            refresh_secs: default_refresh_secs(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}
fn default_recent_limit() -> usize {
    20
}
fn default_refresh_secs() -> u64 {
    5
}

impl Config {
    /// Configuration used when no config file exists: both stores under
    /// `./data`, every other setting at its default.
    pub fn minimal() -> Self {
        Self {
            structured_store: StoreConfig {
                path: PathBuf::from("./data/incidents.sqlite"),
            },
            document_store: StoreConfig {
                path: PathBuf::from("./data/incident_details.sqlite"),
            },
            generation: GenerationConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    validate(&config)?;
    Ok(config)
}

/// Load `path` if it exists, otherwise fall back to [`Config::minimal`].
pub fn load_or_minimal(path: &Path) -> Result<Config> {
    if path.exists() {
        load_config(path)
    } else {
        tracing::debug!(path = %path.display(), "config file not found, using defaults");
        Ok(Config::minimal())
    }
}

fn validate(config: &Config) -> Result<()> {
    if config.structured_store.path == config.document_store.path {
        anyhow::bail!("structured_store.path and document_store.path must differ");
    }

    if !(-12..=14).contains(&config.generation.utc_offset_hours) {
        anyhow::bail!("generation.utc_offset_hours must be in [-12, 14]");
    }

    if config.generation.call_window_secs < 0 {
        anyhow::bail!("generation.call_window_secs must be >= 0");
    }

    if config.server.recent_limit == 0 {
        anyhow::bail!("server.recent_limit must be >= 1");
    }

    if config.server.refresh_secs == 0 {
        anyhow::bail!("server.refresh_secs must be >= 1");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml_src: &str) -> Result<Config> {
        let config: Config = toml::from_str(toml_src)?;
        validate(&config)?;
        Ok(config)
    }

    #[test]
    fn test_defaults_fill_optional_sections() {
        let config = parse(
            r#"
            [structured_store]
            path = "a.sqlite"
            [document_store]
            path = "b.sqlite"
            "#,
        )
        .unwrap();
        assert_eq!(config.generation.seed, None);
        assert_eq!(config.generation.utc_offset_hours, -5);
        assert_eq!(config.server.recent_limit, 20);
    }

    #[test]
    fn test_same_store_path_is_rejected() {
        let err = parse(
            r#"
            [structured_store]
            path = "same.sqlite"
            [document_store]
            path = "same.sqlite"
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("must differ"));
    }

    #[test]
    fn test_bad_offset_is_rejected() {
        let err = parse(
            r#"
            [structured_store]
            path = "a.sqlite"
            [document_store]
            path = "b.sqlite"
            [generation]
            utc_offset_hours = 20
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("utc_offset_hours"));
    }

    #[test]
    fn test_minimal_is_valid() {
        assert!(validate(&Config::minimal()).is_ok());
    }
}
