// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Monthly theme storage

use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

use super::{Document, DocumentStore};
use crate::error::Result;
use crate::scripture::calendar::MonthKey;

/// Document holding one field per month key
pub const THEMES_DOCUMENT: &str = "themes";

/// Month key to theme text
#[derive(Clone)]
pub struct ThemeStore {
    store: Arc<dyn DocumentStore>,
}

impl ThemeStore {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Theme for a month, if one is set
    pub async fn get(&self, month: MonthKey) -> Result<Option<String>> {
        let Some(themes) = self.store.get(THEMES_DOCUMENT).await? else {
            return Ok(None);
        };
        Ok(theme_text(&month.to_string(), themes.get(&month.to_string())))
    }

    /// Theme for a month, or `default` when none is set
    pub async fn get_or(&self, month: MonthKey, default: &str) -> Result<String> {
        Ok(self
            .get(month)
            .await?
            .unwrap_or_else(|| default.to_string()))
    }

    /// Overwrite a month's theme. Empty text removes the entry.
    pub async fn set(&self, month: MonthKey, text: &str) -> Result<()> {
        let text = text.trim();
        if text.is_empty() {
            self.clear(month).await?;
            return Ok(());
        }

        let mut fields = Document::new();
        fields.insert(month.to_string(), Value::String(text.to_string()));
        self.store.merge_set(THEMES_DOCUMENT, fields).await?;
        tracing::info!(month = %month, theme = text, "theme set");
        Ok(())
    }

    /// Remove a month's theme. Returns whether one was set.
    pub async fn clear(&self, month: MonthKey) -> Result<bool> {
        let removed = self
            .store
            .delete_field(THEMES_DOCUMENT, &month.to_string())
            .await?;
        if removed {
            tracing::info!(month = %month, "theme cleared");
        }
        Ok(removed)
    }

    /// Every stored theme, ordered by month
    pub async fn list(&self) -> Result<BTreeMap<String, String>> {
        let Some(themes) = self.store.get(THEMES_DOCUMENT).await? else {
            return Ok(BTreeMap::new());
        };
        Ok(themes
            .iter()
            .filter_map(|(month, value)| {
                theme_text(month, Some(value)).map(|text| (month.clone(), text))
            })
            .collect())
    }
}

fn theme_text(month: &str, value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
        Value::String(_) => None,
        other => {
            tracing::warn!(month, value = %other, "ignoring non-text theme entry");
            None
        }
    }
}
