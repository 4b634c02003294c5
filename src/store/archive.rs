// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Archive of published daily scriptures, keyed by date

use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

use super::{Document, DocumentStore};
use crate::error::{Result, StorageError};
use crate::scripture::calendar::{DateKey, MonthKey};
use crate::scripture::Scripture;

/// Document holding one field per date key
pub const DAILY_SCRIPTURE_DOCUMENT: &str = "dailyScripture";

#[derive(Clone)]
pub struct ScriptureArchive {
    store: Arc<dyn DocumentStore>,
}

impl ScriptureArchive {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// The entry stored for a date
    pub async fn get(&self, date: DateKey) -> Result<Option<Scripture>> {
        let key = date.to_string();
        let Some(entries) = self.store.get(DAILY_SCRIPTURE_DOCUMENT).await? else {
            return Ok(None);
        };
        match entries.get(&key) {
            Some(value) => decode(&key, value.clone()).map(Some),
            None => Ok(None),
        }
    }

    /// References already published in a month, in date order.
    ///
    /// Entries without a readable `reference` are skipped.
    pub async fn references_for_month(&self, month: MonthKey) -> Result<Vec<String>> {
        let Some(entries) = self.store.get(DAILY_SCRIPTURE_DOCUMENT).await? else {
            return Ok(Vec::new());
        };

        let mut dated: Vec<(&String, String)> = entries
            .iter()
            .filter(|(key, _)| month.contains_key(key))
            .filter_map(|(key, value)| {
                let reference = value.get("reference")?.as_str()?.trim();
                (!reference.is_empty()).then(|| (key, reference.to_string()))
            })
            .collect();
        dated.sort_by(|a, b| a.0.cmp(b.0));

        Ok(dated.into_iter().map(|(_, reference)| reference).collect())
    }

    /// Store an entry, replacing any existing one for the date
    pub async fn put(&self, date: DateKey, scripture: &Scripture) -> Result<()> {
        let mut fields = Document::new();
        fields.insert(date.to_string(), serde_json::to_value(scripture)?);
        self.store
            .merge_set(DAILY_SCRIPTURE_DOCUMENT, fields)
            .await?;
        Ok(())
    }

    /// Store an entry only if the date has none. Returns whether it was written.
    pub async fn put_if_absent(&self, date: DateKey, scripture: &Scripture) -> Result<bool> {
        Ok(self
            .store
            .set_field_if_absent(
                DAILY_SCRIPTURE_DOCUMENT,
                &date.to_string(),
                serde_json::to_value(scripture)?,
            )
            .await?)
    }

    /// Remove a date's entry. Returns whether one existed.
    pub async fn delete(&self, date: DateKey) -> Result<bool> {
        Ok(self
            .store
            .delete_field(DAILY_SCRIPTURE_DOCUMENT, &date.to_string())
            .await?)
    }

    /// Date key to reference for every entry, optionally limited to a month
    pub async fn list(&self, month: Option<MonthKey>) -> Result<BTreeMap<String, String>> {
        let Some(entries) = self.store.get(DAILY_SCRIPTURE_DOCUMENT).await? else {
            return Ok(BTreeMap::new());
        };

        Ok(entries
            .iter()
            .filter(|(key, _)| month.map_or(true, |m| m.contains_key(key)))
            .map(|(key, value)| {
                let reference = value
                    .get("reference")
                    .and_then(Value::as_str)
                    .unwrap_or("<unreadable>")
                    .to_string();
                (key.clone(), reference)
            })
            .collect())
    }
}

fn decode(key: &str, value: Value) -> Result<Scripture> {
    serde_json::from_value(value).map_err(|e| {
        StorageError::Corrupt {
            document: format!("{}/{}", DAILY_SCRIPTURE_DOCUMENT, key),
            reason: e.to_string(),
        }
        .into()
    })
}
