// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! JSON file document store
//!
//! All documents live in one JSON object keyed by document name. Writers
//! are serialized in-process and replace the file atomically via a temp
//! file and rename, so readers always see a complete snapshot without
//! taking the write lock.

use async_trait::async_trait;
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

use super::{
    insert_if_absent, merge_fields, remove_field, Document, DocumentStore, Documents, StoreResult,
};
use crate::error::StorageError;

/// Document store persisted to a single JSON file
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    async fn read_all(&self) -> StoreResult<Documents> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) if content.trim().is_empty() => Ok(Documents::new()),
            Ok(content) => parse_documents(&content),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Documents::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_all(&self, documents: &Documents) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let content = serde_json::to_string_pretty(documents)?;

        // Write atomically via temp file
        let temp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&temp_path, content).await?;
        tokio::fs::rename(&temp_path, &self.path).await?;

        Ok(())
    }

    /// Read-modify-write under the write lock. `apply` reports whether it
    /// changed anything; unchanged snapshots are not rewritten.
    async fn modify<T>(&self, apply: impl FnOnce(&mut Documents) -> (T, bool)) -> StoreResult<T> {
        let _guard = self.write_lock.lock().await;
        let mut documents = self.read_all().await?;
        let (result, changed) = apply(&mut documents);
        if changed {
            self.write_all(&documents).await?;
        }
        Ok(result)
    }
}

fn parse_documents(content: &str) -> StoreResult<Documents> {
    let Value::Object(root) = serde_json::from_str::<Value>(content)? else {
        return Err(StorageError::Corrupt {
            document: "<root>".to_string(),
            reason: "expected a JSON object of documents".to_string(),
        });
    };

    root.into_iter()
        .map(|(name, value)| match value {
            Value::Object(fields) => Ok((name, fields)),
            _ => Err(StorageError::Corrupt {
                document: name,
                reason: "expected a JSON object of fields".to_string(),
            }),
        })
        .collect()
}

#[async_trait]
impl DocumentStore for JsonFileStore {
    async fn get(&self, document: &str) -> StoreResult<Option<Document>> {
        Ok(self.read_all().await?.remove(document))
    }

    async fn merge_set(&self, document: &str, fields: Document) -> StoreResult<()> {
        self.modify(|documents| {
            merge_fields(documents, document, fields);
            ((), true)
        })
        .await
    }

    async fn set_field_if_absent(
        &self,
        document: &str,
        field: &str,
        value: Value,
    ) -> StoreResult<bool> {
        self.modify(|documents| {
            let inserted = insert_if_absent(documents, document, field, value);
            (inserted, inserted)
        })
        .await
    }

    async fn delete_field(&self, document: &str, field: &str) -> StoreResult<bool> {
        self.modify(|documents| {
            let removed = remove_field(documents, document, field);
            (removed, removed)
        })
        .await
    }
}
