//! Configuration loading for pelican
//!
//! Provides utilities for locating and parsing JSON configuration files.
//! Files are looked up in the working directory first (the usual deployment
//! layout for scheduled runs) and fall back to the shared config directory
//! (~/.config/pelican/).

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// Get the pelican config directory (~/.config/pelican/)
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("pelican"))
}

/// Get the path to a config file within the pelican config directory
pub fn config_path(filename: &str) -> Option<PathBuf> {
    config_dir().map(|p| p.join(filename))
}

/// Load and parse a JSON file from an arbitrary path
pub fn load_json_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a config file path: a file of that name in the working directory
/// wins, then the shared config directory.
pub fn resolve(filename: &str) -> PathBuf {
    let local = PathBuf::from(filename);
    if local.exists() {
        return local;
    }
    config_path(filename).unwrap_or(local)
}
