//! In-memory store used by tests and lightweight embeddings.

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::Value;

use super::{doc_id, field_matches, ContentStore, StoreError, WriteBatch, WriteOp};

type Collections = HashMap<String, BTreeMap<String, Value>>;

/// Non-persistent [`ContentStore`] keeping every collection in a single map.
///
/// A batch is applied under one write guard, so concurrent readers observe
/// either none or all of its ops.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<Collections>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Collections> {
        self.collections.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Collections> {
        self.collections.write().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError> {
        Ok(self
            .read()
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned())
    }

    async fn list(&self, collection: &str) -> Result<Vec<Value>, StoreError> {
        Ok(self
            .read()
            .get(collection)
            .map(|docs| docs.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Option<Value>, StoreError> {
        Ok(self.read().get(collection).and_then(|docs| {
            docs.values()
                .find(|doc| field_matches(doc, field, value))
                .cloned()
        }))
    }

    async fn find_by_field_excluding(
        &self,
        collection: &str,
        field: &str,
        value: &str,
        exclude_id: &str,
    ) -> Result<Option<Value>, StoreError> {
        Ok(self.read().get(collection).and_then(|docs| {
            docs.values()
                .find(|doc| field_matches(doc, field, value) && doc_id(doc) != Some(exclude_id))
                .cloned()
        }))
    }

    async fn apply(&self, batch: WriteBatch) -> Result<(), StoreError> {
        let mut collections = self.write();
        for op in batch.into_ops() {
            match op {
                WriteOp::Put {
                    collection,
                    id,
                    doc,
                } => {
                    collections.entry(collection).or_default().insert(id, doc);
                }
                WriteOp::Delete { collection, id } => {
                    if let Some(docs) = collections.get_mut(&collection) {
                        docs.remove(&id);
                    }
                }
                WriteOp::DeleteWhere {
                    collection,
                    field,
                    value,
                } => {
                    if let Some(docs) = collections.get_mut(&collection) {
                        docs.retain(|_, doc| !field_matches(doc, &field, &value));
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_put_get_delete() {
        let store = MemoryStore::new();
        store
            .put("posts", "p1", json!({"id": "p1", "slug": "hello"}))
            .await
            .unwrap();

        let doc = store.get("posts", "p1").await.unwrap().unwrap();
        assert_eq!(doc["slug"], "hello");

        store.delete("posts", "p1").await.unwrap();
        assert!(store.get("posts", "p1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_by_field_and_exclusion() {
        let store = MemoryStore::new();
        store
            .put("posts", "p1", json!({"id": "p1", "slug": "hello"}))
            .await
            .unwrap();

        assert!(store
            .find_by_field("posts", "slug", "hello")
            .await
            .unwrap()
            .is_some());
        assert!(store
            .find_by_field("posts", "slug", "other")
            .await
            .unwrap()
            .is_none());

        // The only holder of the slug is excluded, so no match
        assert!(store
            .find_by_field_excluding("posts", "slug", "hello", "p1")
            .await
            .unwrap()
            .is_none());
        assert!(store
            .find_by_field_excluding("posts", "slug", "hello", "p2")
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_delete_where_removes_matching_docs() {
        let store = MemoryStore::new();
        let mut batch = WriteBatch::new();
        batch.put("images", "i1", json!({"id": "i1", "blogPostId": "p1"}));
        batch.put("images", "i2", json!({"id": "i2", "blogPostId": "p1"}));
        batch.put("images", "i3", json!({"id": "i3", "blogPostId": "p2"}));
        store.apply(batch).await.unwrap();

        store.delete_where("images", "blogPostId", "p1").await.unwrap();

        let remaining = store.list("images").await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0]["id"], "i3");
    }

    #[tokio::test]
    async fn test_batch_put_then_replace() {
        let store = MemoryStore::new();
        let mut batch = WriteBatch::new();
        batch.put("posts", "p1", json!({"id": "p1", "title": "old"}));
        batch.put("posts", "p1", json!({"id": "p1", "title": "new"}));
        store.apply(batch).await.unwrap();

        let doc = store.get("posts", "p1").await.unwrap().unwrap();
        assert_eq!(doc["title"], "new");
        assert_eq!(store.list("posts").await.unwrap().len(), 1);
    }
}
