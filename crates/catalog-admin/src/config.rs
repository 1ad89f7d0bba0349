//! Application settings.
//!
//! Defaults, then `catalog-admin.toml` in the working directory (if present), then
//! `CATALOG_ADMIN__*` environment variables.

use list_framework::{FilterConfig, StoreConfig};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

pub const SETTINGS_FILE: &str = "catalog-admin.toml";
pub const ENV_PREFIX: &str = "CATALOG_ADMIN__";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid value for {key}: {value:?}")]
    InvalidEnv { key: String, value: String },
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Rows per table page.
    pub page_size: usize,
    /// Quiet period before filter edits trigger a fetch.
    pub debounce_ms: u64,
    /// Simulated round trip of the in-memory backend.
    pub backend_latency_ms: u64,
    /// Request channel capacity of every store and backend actor.
    pub store_buffer: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            page_size: 10,
            debounce_ms: list_framework::config::DEFAULT_DEBOUNCE_MS,
            backend_latency_ms: 50,
            store_buffer: list_framework::config::DEFAULT_STORE_BUFFER,
        }
    }
}

impl Settings {
    pub fn backend_latency(&self) -> Duration {
        Duration::from_millis(self.backend_latency_ms)
    }

    pub fn filter_config(&self) -> FilterConfig {
        FilterConfig::default().with_debounce_ms(self.debounce_ms)
    }

    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            buffer_size: self.store_buffer,
        }
    }
}

/// Loads settings from [`SETTINGS_FILE`] and the process environment.
pub fn load_settings() -> Result<Settings, ConfigError> {
    let settings = load_settings_from(Path::new(SETTINGS_FILE))?;
    apply_env_overrides(settings, |key| std::env::var(key).ok())
}

/// Reads a settings file. A missing file yields the defaults.
pub fn load_settings_from(path: &Path) -> Result<Settings, ConfigError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Settings::default()),
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.display().to_string(),
                source,
            })
        }
    };
    toml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })
}

/// Applies `CATALOG_ADMIN__<FIELD>` overrides looked up through `lookup`.
pub fn apply_env_overrides<F>(mut settings: Settings, lookup: F) -> Result<Settings, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(v) = override_value(&lookup, "PAGE_SIZE")? {
        settings.page_size = v;
    }
    if let Some(v) = override_value(&lookup, "DEBOUNCE_MS")? {
        settings.debounce_ms = v;
    }
    if let Some(v) = override_value(&lookup, "BACKEND_LATENCY_MS")? {
        settings.backend_latency_ms = v;
    }
    if let Some(v) = override_value(&lookup, "STORE_BUFFER")? {
        settings.store_buffer = v;
    }
    Ok(settings)
}

fn override_value<F, V>(lookup: &F, field: &str) -> Result<Option<V>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    V: std::str::FromStr,
{
    let key = format!("{ENV_PREFIX}{field}");
    match lookup(&key) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnv { key, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_missing_file_gives_defaults() {
        let settings = load_settings_from(Path::new("does-not-exist.toml")).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.page_size, 10);
        assert_eq!(settings.debounce_ms, 500);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let settings: Settings = toml::from_str("page_size = 25\n").unwrap();
        assert_eq!(settings.page_size, 25);
        assert_eq!(settings.backend_latency_ms, 50);
    }

    #[test]
    fn test_env_overrides_file_values() {
        let env: HashMap<&str, &str> = [
            ("CATALOG_ADMIN__DEBOUNCE_MS", "250"),
            ("CATALOG_ADMIN__STORE_BUFFER", " 8 "),
        ]
        .into_iter()
        .collect();
        let settings = apply_env_overrides(Settings::default(), |key| {
            env.get(key).map(|v| v.to_string())
        })
        .unwrap();
        assert_eq!(settings.debounce_ms, 250);
        assert_eq!(settings.store_buffer, 8);
        assert_eq!(settings.page_size, 10);
    }

    #[test]
    fn test_invalid_env_value_is_reported() {
        let err = apply_env_overrides(Settings::default(), |key| {
            (key == "CATALOG_ADMIN__PAGE_SIZE").then(|| "ten".to_string())
        })
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid value for CATALOG_ADMIN__PAGE_SIZE: \"ten\""
        );
    }
}
