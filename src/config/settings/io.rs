// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

use std::path::{Path, PathBuf};

use crate::error::Result;

use super::migration;
use super::Settings;

impl Settings {
    /// Get the default settings file path.
    pub fn default_path() -> PathBuf {
        Self::daily_word_home().join("settings.json")
    }

    /// Load settings from the default path.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path())
    }

    /// Load settings from a specific path. Missing files yield defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let raw_value: serde_json::Value = if is_toml(path) {
            let value: toml::Value = toml::from_str(&content)?;
            serde_json::to_value(value)?
        } else {
            serde_json::from_str(&content)?
        };
        let migrated = migration::migrate_on_load(raw_value);
        let settings: Settings = serde_json::from_value(migrated)?;
        Ok(settings)
    }

    /// Save settings to the default path.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::default_path())
    }

    /// Save settings to a specific path, merging with existing file content
    /// to preserve unknown keys from other versions or hand edits.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let new_value = serde_json::to_value(self)?;

        let merged = if path.exists() {
            let existing_content = std::fs::read_to_string(path)?;
            let existing = if is_toml(path) {
                toml::from_str::<toml::Value>(&existing_content)
                    .ok()
                    .and_then(|v| serde_json::to_value(v).ok())
            } else {
                serde_json::from_str::<serde_json::Value>(&existing_content).ok()
            };
            match existing {
                Some(existing_value) => migration::deep_merge(existing_value, new_value),
                None => new_value, // Corrupt file, overwrite entirely.
            }
        } else {
            new_value
        };

        let content = if is_toml(path) {
            toml::to_string_pretty(&merged)?
        } else {
            serde_json::to_string_pretty(&merged)?
        };
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the daily-word home directory (~/.daily-word or $DAILY_WORD_HOME).
    pub fn daily_word_home() -> PathBuf {
        if let Ok(home) = std::env::var("DAILY_WORD_HOME") {
            return PathBuf::from(home);
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".daily-word")
    }
}

fn is_toml(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("toml"))
        .unwrap_or(false)
}
