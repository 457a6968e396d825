//! Configuration and settings management.
//!
//! This module provides the panel settings types and their persistence.
//! Settings are stored in the user's config directory as JSON.

mod settings;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub use settings::{ClickAction, HeaderDisplay, PanelKind, PanelSettings};

/// Returns the settings file path under the user's config directory, when
/// one can be resolved.
pub fn settings_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "glance")
        .map(|dirs| dirs.config_dir().join("settings.json"))
}

/// Loads settings from `path`.
pub fn load_settings(path: &Path) -> Result<PanelSettings> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading settings from {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("parsing settings from {}", path.display()))
}

/// Writes settings to `path`, creating parent directories as needed.
pub fn save_settings(path: &Path, settings: &PanelSettings) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    let raw = serde_json::to_string_pretty(settings).context("serializing settings")?;
    fs::write(path, raw).with_context(|| format!("writing settings to {}", path.display()))
}

/// Loads settings from the default location, falling back to defaults when
/// the file is missing or unreadable.
pub fn load_or_default() -> PanelSettings {
    match settings_path() {
        Some(path) if path.exists() => load_settings(&path).unwrap_or_else(|e| {
            tracing::warn!("failed to load settings, using defaults: {e:#}");
            PanelSettings::default()
        }),
        _ => PanelSettings::default(),
    }
}
