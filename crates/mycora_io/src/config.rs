//! Loading `config.toml`.

use crate::error::{IoError, Result};
use mycora_core::config::AppConfig;
use std::path::Path;

/// Reads and validates the configuration at `path`.
///
/// A missing file is not an error: the defaults are returned and, when
/// `write_default` is set, written to `path` for the user to edit.
pub fn load_config<P: AsRef<Path>>(path: P, write_default: bool) -> Result<AppConfig> {
    let path = path.as_ref();
    if !path.exists() {
        let default = AppConfig::default();
        if write_default {
            save_config(&default, path)?;
            tracing::info!(path = %path.display(), "wrote default configuration");
        }
        return Ok(default);
    }

    let content = std::fs::read_to_string(path).map_err(|e| {
        IoError::FileSystem(e).with_context(format!("reading config from {}", path.display()))
    })?;
    AppConfig::from_toml(&content).map_err(|e| {
        IoError::validation(format!("{e:#}")).with_context(format!("loading {}", path.display()))
    })
}

pub fn save_config<P: AsRef<Path>>(config: &AppConfig, path: P) -> Result<()> {
    let path = path.as_ref();
    let text = toml::to_string_pretty(config)
        .map_err(|e| IoError::serialization(format!("TOML serialization failed: {e}")))?;
    std::fs::write(path, text).map_err(|e| {
        IoError::FileSystem(e).with_context(format!("writing config to {}", path.display()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("mycora_{}_{}.toml", name, std::process::id()))
    }

    #[test]
    fn test_missing_file_yields_defaults_and_writes_them() {
        let path = temp_path("defaults");
        let _ = std::fs::remove_file(&path);

        let config = load_config(&path, true).unwrap();
        assert_eq!(config.arena.width, AppConfig::default().arena.width);
        assert!(path.exists());

        let reloaded = load_config(&path, false).unwrap();
        assert_eq!(reloaded.fingerprint(), config.fingerprint());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file_without_write() {
        let path = temp_path("nowrite");
        let _ = std::fs::remove_file(&path);
        load_config(&path, false).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_partial_file_overrides_defaults() {
        let path = temp_path("partial");
        std::fs::write(&path, "[arena]\nwidth = 40\n\n[clock]\nseed = 9\n").unwrap();
        let config = load_config(&path, false).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(config.arena.width, 40);
        assert_eq!(config.arena.height, 100);
        assert_eq!(config.clock.seed, Some(9));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let path = temp_path("invalid");
        std::fs::write(&path, "[pressure]\nhigh_water = 0.2\nlow_water = 0.5\n").unwrap();
        let err = load_config(&path, false).unwrap_err();
        let _ = std::fs::remove_file(&path);
        assert!(err.to_string().contains("Low-water"));
    }
}
