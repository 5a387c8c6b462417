//! Settings loading from configuration files.
//!
//! This module provides functions to load [`Settings`] from TOML files, JSON
//! files, and to apply environment variable overrides.
//!
//! ## Loading Order
//!
//! 1. Start with default settings.
//! 2. Load from a TOML or JSON file (overriding defaults).
//! 3. Apply environment variable overrides (highest priority).
//!
//! ## Environment Variable Mapping
//!
//! | Env Var | Setting |
//! |---|---|
//! | `STAGEHAND_DEBUG` | `debug` |
//! | `STAGEHAND_LOG_LEVEL` | `log_level` |
//! | `STAGEHAND_DEFAULT_CHARSET` | `default_charset` |
//!
//! ## Examples
//!
//! ```rust,no_run
//! use stagehand_core::settings_loader;
//!
//! let settings = settings_loader::from_toml_file_with_env("config/stagehand.toml").unwrap();
//! ```

use std::path::Path;

use crate::error::StagehandError;
use crate::settings::Settings;

/// Loads settings from a TOML string.
///
/// Any fields not present in the TOML keep their default values.
///
/// # Errors
///
/// Returns an error if the TOML is malformed or cannot be deserialized.
pub fn from_toml_str(toml_str: &str) -> Result<Settings, StagehandError> {
    toml::from_str(toml_str)
        .map_err(|e| StagehandError::ConfigurationError(format!("Failed to parse TOML: {e}")))
}

/// Loads settings from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the TOML is malformed.
pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Settings, StagehandError> {
    let content = read_config(path.as_ref(), "TOML")?;
    from_toml_str(&content)
}

/// Loads settings from a TOML file and then applies environment variable overrides.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the TOML is malformed.
pub fn from_toml_file_with_env(path: impl AsRef<Path>) -> Result<Settings, StagehandError> {
    let mut settings = from_toml_file(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Loads settings from a JSON string.
///
/// Any fields not present in the JSON keep their default values.
///
/// # Errors
///
/// Returns an error if the JSON is malformed or cannot be deserialized.
pub fn from_json_str(json_str: &str) -> Result<Settings, StagehandError> {
    serde_json::from_str(json_str)
        .map_err(|e| StagehandError::ConfigurationError(format!("Failed to parse JSON: {e}")))
}

/// Loads settings from a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the JSON is malformed.
pub fn from_json_file(path: impl AsRef<Path>) -> Result<Settings, StagehandError> {
    let content = read_config(path.as_ref(), "JSON")?;
    from_json_str(&content)
}

/// Loads settings from a JSON file and then applies environment variable overrides.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the JSON is malformed.
pub fn from_json_file_with_env(path: impl AsRef<Path>) -> Result<Settings, StagehandError> {
    let mut settings = from_json_file(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Loads settings from just environment variables (starting from defaults).
pub fn from_env() -> Settings {
    let mut settings = Settings::default();
    apply_env_overrides(&mut settings);
    settings
}

/// Applies environment variable overrides to a settings struct.
///
/// - `STAGEHAND_DEBUG` -> `debug` (values: "true"/"1"/"yes" => true, anything else => false)
/// - `STAGEHAND_LOG_LEVEL` -> `log_level`
/// - `STAGEHAND_DEFAULT_CHARSET` -> `default_charset`
pub fn apply_env_overrides(settings: &mut Settings) {
    if let Ok(val) = std::env::var("STAGEHAND_DEBUG") {
        settings.debug = matches!(val.to_lowercase().as_str(), "true" | "1" | "yes");
    }

    if let Ok(val) = std::env::var("STAGEHAND_LOG_LEVEL") {
        settings.log_level = val;
    }

    if let Ok(val) = std::env::var("STAGEHAND_DEFAULT_CHARSET") {
        if !val.trim().is_empty() {
            settings.default_charset = val.trim().to_string();
        }
    }
}

// ============================================================
// Helpers
// ============================================================

fn read_config(path: &Path, format: &str) -> Result<String, StagehandError> {
    std::fs::read_to_string(path).map_err(|e| {
        StagehandError::ConfigurationError(format!(
            "Failed to read {format} file '{}': {e}",
            path.display()
        ))
    })
}
