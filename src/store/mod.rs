// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Durability layer for themes and the scripture archive
//!
//! Both are small keyed documents: a named document holds a flat map of
//! field name to JSON value. Backends only need field-level merge, a
//! conditional insert and field removal.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::{StorageBackend, StorageConfig};
use crate::error::StorageError;

pub mod archive;
pub mod file;
pub mod memory;
pub mod themes;

pub use archive::ScriptureArchive;
pub use file::JsonFileStore;
pub use memory::MemoryStore;
pub use themes::ThemeStore;

/// Fields of one document
pub type Document = serde_json::Map<String, Value>;

/// Every document in a store, by name
pub(crate) type Documents = BTreeMap<String, Document>;

pub type StoreResult<T> = std::result::Result<T, StorageError>;

/// Keyed document storage
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Read a whole document; `None` if it has never been written
    async fn get(&self, document: &str) -> StoreResult<Option<Document>>;

    /// Set the given fields, leaving every other field untouched
    async fn merge_set(&self, document: &str, fields: Document) -> StoreResult<()>;

    /// Set one field only if it is absent. Returns whether this call wrote it.
    async fn set_field_if_absent(
        &self,
        document: &str,
        field: &str,
        value: Value,
    ) -> StoreResult<bool>;

    /// Remove one field. Returns whether it existed.
    async fn delete_field(&self, document: &str, field: &str) -> StoreResult<bool>;
}

/// Open the configured backend
pub fn open_store(config: &StorageConfig) -> Arc<dyn DocumentStore> {
    match config.backend {
        StorageBackend::File => {
            tracing::debug!(path = %config.path.display(), "using JSON file store");
            Arc::new(JsonFileStore::new(&config.path))
        }
        StorageBackend::Memory => {
            tracing::warn!("using in-memory store; themes and scriptures are lost on restart");
            Arc::new(MemoryStore::new())
        }
    }
}

pub(crate) fn merge_fields(documents: &mut Documents, document: &str, fields: Document) {
    let target = documents.entry(document.to_string()).or_default();
    for (field, value) in fields {
        target.insert(field, value);
    }
}

pub(crate) fn insert_if_absent(
    documents: &mut Documents,
    document: &str,
    field: &str,
    value: Value,
) -> bool {
    let target = documents.entry(document.to_string()).or_default();
    if target.contains_key(field) {
        return false;
    }
    target.insert(field.to_string(), value);
    true
}

pub(crate) fn remove_field(documents: &mut Documents, document: &str, field: &str) -> bool {
    documents
        .get_mut(document)
        .map(|target| target.remove(field).is_some())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::PathBuf;

    fn fields(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_merge_fields_keeps_siblings() {
        let mut docs = Documents::new();
        merge_fields(&mut docs, "themes", fields(json!({"2025-03": "Faith"})));
        merge_fields(&mut docs, "themes", fields(json!({"2025-04": "Hope"})));

        let themes = &docs["themes"];
        assert_eq!(themes["2025-03"], "Faith");
        assert_eq!(themes["2025-04"], "Hope");
    }

    #[test]
    fn test_insert_if_absent_only_once() {
        let mut docs = Documents::new();
        assert!(insert_if_absent(&mut docs, "d", "k", json!(1)));
        assert!(!insert_if_absent(&mut docs, "d", "k", json!(2)));
        assert_eq!(docs["d"]["k"], 1);
    }

    #[test]
    fn test_remove_field_missing_document() {
        let mut docs = Documents::new();
        assert!(!remove_field(&mut docs, "nope", "k"));
        insert_if_absent(&mut docs, "d", "k", json!(1));
        assert!(remove_field(&mut docs, "d", "k"));
        assert!(!remove_field(&mut docs, "d", "k"));
    }

    #[tokio::test]
    async fn test_open_store_memory_backend() {
        let config = StorageConfig {
            backend: StorageBackend::Memory,
            path: PathBuf::from("/nonexistent/never-written.json"),
        };
        let store = open_store(&config);
        assert!(store.get("themes").await.unwrap().is_none());
    }
}
