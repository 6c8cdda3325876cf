//! JSON config files and the ~/.flappy-neat/ data directory.

use crate::core::error::SimError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const APP_DIR: &str = ".flappy-neat";
pub const CONFIG_FILE: &str = "config.json";
pub const TRAIN_CONFIG_FILE: &str = "train.json";

/// Get the ~/.flappy-neat/ directory path, creating it if needed.
pub fn app_dir() -> io::Result<PathBuf> {
    let home_dir = dirs::home_dir().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::NotFound,
            "Could not determine home directory",
        )
    })?;
    let dir = home_dir.join(APP_DIR);
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Get the full path for a file in ~/.flappy-neat/.
pub fn data_path(filename: &str) -> io::Result<PathBuf> {
    Ok(app_dir()?.join(filename))
}

/// Read a JSON file. Missing fields fall back to their defaults where the type
/// allows it.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, SimError> {
    let json = fs::read_to_string(path)?;
    serde_json::from_str(&json)
        .map_err(|e| SimError::Persistence(format!("{}: {}", path.display(), e)))
}

/// Like [`load_json`], but a missing file yields `T::default()`.
pub fn load_json_or_default<T: Default + DeserializeOwned>(path: &Path) -> Result<T, SimError> {
    if !path.exists() {
        return Ok(T::default());
    }
    load_json(path)
}

/// Save a value as pretty-printed JSON.
pub fn save_json<T: Serialize>(path: &Path, data: &T) -> Result<(), SimError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json =
        serde_json::to_string_pretty(data).map_err(|e| SimError::Persistence(e.to_string()))?;
    fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SimConfig;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("flappy-neat-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_load_missing_returns_default() {
        let config: SimConfig = load_json_or_default(&temp_path("missing.json")).unwrap();
        assert_eq!(config, SimConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let path = temp_path("config.json");
        let config = SimConfig {
            max_ticks: Some(500),
            ..Default::default()
        };
        save_json(&path, &config).unwrap();
        let loaded: SimConfig = load_json(&path).unwrap();
        assert_eq!(loaded, config);
        fs::remove_file(path).ok();
    }

    #[test]
    fn test_invalid_json_is_persistence_error() {
        let path = temp_path("broken.json");
        fs::write(&path, "{ not json").unwrap();
        let result: Result<SimConfig, _> = load_json(&path);
        assert!(matches!(result, Err(SimError::Persistence(_))));
        fs::remove_file(path).ok();
    }

    #[test]
    fn test_data_path_format() {
        let path = data_path(CONFIG_FILE).expect("data_path should succeed");
        assert!(path.to_string_lossy().ends_with(".flappy-neat/config.json"));
    }
}
