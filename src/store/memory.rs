// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! In-process document store

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use super::{
    insert_if_absent, merge_fields, remove_field, Document, DocumentStore, Documents, StoreResult,
};

/// Document store held in memory, used by tests and the `memory` backend
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: RwLock<Documents>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, document: &str) -> StoreResult<Option<Document>> {
        Ok(self.documents.read().await.get(document).cloned())
    }

    async fn merge_set(&self, document: &str, fields: Document) -> StoreResult<()> {
        merge_fields(&mut *self.documents.write().await, document, fields);
        Ok(())
    }

    async fn set_field_if_absent(
        &self,
        document: &str,
        field: &str,
        value: Value,
    ) -> StoreResult<bool> {
        Ok(insert_if_absent(
            &mut *self.documents.write().await,
            document,
            field,
            value,
        ))
    }

    async fn delete_field(&self, document: &str, field: &str) -> StoreResult<bool> {
        Ok(remove_field(
            &mut *self.documents.write().await,
            document,
            field,
        ))
    }
}
