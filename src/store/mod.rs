//! Pluggable document storage for content entities.
//!
//! Every write goes through [`ContentStore::apply`] as a [`WriteBatch`], so a
//! logical update (entity fields plus association bookkeeping) is persisted
//! all-or-nothing. The single-document helpers are batches of one.

mod file;
pub mod handle;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Storage-level errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Corrupt collection file: {0}")]
    CorruptCollection(String),

    #[error("Store not initialized; call store::handle::init first")]
    NotInitialized,

    #[error("Store already initialized")]
    AlreadyInitialized,
}

/// A single staged write.
#[derive(Debug, Clone)]
pub enum WriteOp {
    /// Insert or fully replace the document carrying this id
    Put {
        collection: String,
        id: String,
        doc: Value,
    },
    /// Remove the document with this id (no-op when absent)
    Delete { collection: String, id: String },
    /// Remove every document whose string `field` equals `value`
    DeleteWhere {
        collection: String,
        field: String,
        value: String,
    },
}

impl WriteOp {
    /// The collection this op touches.
    #[must_use]
    pub fn collection(&self) -> &str {
        match self {
            WriteOp::Put { collection, .. }
            | WriteOp::Delete { collection, .. }
            | WriteOp::DeleteWhere { collection, .. } => collection,
        }
    }
}

/// An ordered set of writes applied as a single unit.
#[derive(Debug, Clone, Default)]
pub struct WriteBatch {
    ops: Vec<WriteOp>,
}

impl WriteBatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage an insert-or-replace of `doc` under `id`.
    pub fn put(&mut self, collection: &str, id: &str, doc: Value) {
        self.ops.push(WriteOp::Put {
            collection: collection.to_string(),
            id: id.to_string(),
            doc,
        });
    }

    /// Stage a delete by id.
    pub fn delete(&mut self, collection: &str, id: &str) {
        self.ops.push(WriteOp::Delete {
            collection: collection.to_string(),
            id: id.to_string(),
        });
    }

    /// Stage a delete of every document whose `field` equals `value`.
    pub fn delete_where(&mut self, collection: &str, field: &str, value: &str) {
        self.ops.push(WriteOp::DeleteWhere {
            collection: collection.to_string(),
            field: field.to_string(),
            value: value.to_string(),
        });
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    #[must_use]
    pub fn ops(&self) -> &[WriteOp] {
        &self.ops
    }

    #[must_use]
    pub fn into_ops(self) -> Vec<WriteOp> {
        self.ops
    }
}

/// True when the document's string `field` equals `value`.
pub(crate) fn field_matches(doc: &Value, field: &str, value: &str) -> bool {
    doc.get(field).and_then(Value::as_str) == Some(value)
}

/// The id a stored document carries, when it has one.
pub(crate) fn doc_id(doc: &Value) -> Option<&str> {
    doc.get("id").and_then(Value::as_str)
}

/// Document storage interface shared by all content operations.
///
/// Documents are JSON objects keyed by collection name plus a string `id`
/// field. Field lookups compare string fields only, which covers slugs,
/// setting keys and parent references.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Fetch a document by id.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError>;

    /// All documents in a collection, in unspecified order.
    async fn list(&self, collection: &str) -> Result<Vec<Value>, StoreError>;

    /// First document whose string `field` equals `value`.
    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Option<Value>, StoreError>;

    /// Like [`ContentStore::find_by_field`], ignoring the document whose id
    /// is `exclude_id`.
    async fn find_by_field_excluding(
        &self,
        collection: &str,
        field: &str,
        value: &str,
        exclude_id: &str,
    ) -> Result<Option<Value>, StoreError>;

    /// Apply a batch of writes as one all-or-nothing unit.
    async fn apply(&self, batch: WriteBatch) -> Result<(), StoreError>;

    /// Insert or replace a single document.
    async fn put(&self, collection: &str, id: &str, doc: Value) -> Result<(), StoreError> {
        let mut batch = WriteBatch::new();
        batch.put(collection, id, doc);
        self.apply(batch).await
    }

    /// Delete a single document by id.
    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let mut batch = WriteBatch::new();
        batch.delete(collection, id);
        self.apply(batch).await
    }

    /// Delete every document whose string `field` equals `value`.
    async fn delete_where(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<(), StoreError> {
        let mut batch = WriteBatch::new();
        batch.delete_where(collection, field, value);
        self.apply(batch).await
    }
}
