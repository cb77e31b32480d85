use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

fn default_download_dir() -> PathBuf {
    PathBuf::from("downloads")
}

fn default_max_attempts() -> u32 {
    3
}

fn default_tick_interval_ms() -> u64 {
    10
}

/// Global configuration loaded from `~/.config/fetchq/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchqConfig {
    /// Directory completed downloads are written into. Opaque to the worker;
    /// it is handed through to the transport as-is.
    #[serde(default = "default_download_dir")]
    pub download_dir: PathBuf,
    /// Retry attempts allowed per URL beyond the first, for retryable errors.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Tick period of the worker loop in milliseconds. There is no backoff, so
    /// this is also the spacing between retries.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

impl Default for FetchqConfig {
    fn default() -> Self {
        Self {
            download_dir: default_download_dir(),
            max_attempts: default_max_attempts(),
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

impl FetchqConfig {
    /// Tick period as a `Duration`.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("fetchq")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<FetchqConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = FetchqConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: FetchqConfig = toml::from_str(&data)?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = FetchqConfig::default();
        assert_eq!(cfg.download_dir, PathBuf::from("downloads"));
        assert_eq!(cfg.max_attempts, 3);
        assert_eq!(cfg.tick_interval_ms, 10);
        assert_eq!(cfg.tick_interval(), Duration::from_millis(10));
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = FetchqConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: FetchqConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.download_dir, cfg.download_dir);
        assert_eq!(parsed.max_attempts, cfg.max_attempts);
        assert_eq!(parsed.tick_interval_ms, cfg.tick_interval_ms);
    }

    #[test]
    fn config_toml_custom_values() {
        let toml = r#"
            download_dir = "/srv/mirror"
            max_attempts = 5
            tick_interval_ms = 250
        "#;
        let cfg: FetchqConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.download_dir, PathBuf::from("/srv/mirror"));
        assert_eq!(cfg.max_attempts, 5);
        assert_eq!(cfg.tick_interval_ms, 250);
    }

    #[test]
    fn config_toml_missing_fields_use_defaults() {
        let toml = r#"
            max_attempts = 1
        "#;
        let cfg: FetchqConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.max_attempts, 1);
        assert_eq!(cfg.download_dir, PathBuf::from("downloads"));
        assert_eq!(cfg.tick_interval_ms, 10);
    }
}
