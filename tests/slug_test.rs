//! Integration tests for slug generation and unique resolution.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::{json, Value};

use stanza_cms::content::ContentError;
use stanza_cms::slug::{resolve_unique_slug, slugify, MAX_SLUG_ATTEMPTS};
use stanza_cms::store::{ContentStore, MemoryStore, StoreError, WriteBatch};

#[tokio::test]
async fn test_resolver_returns_base_when_free() {
    let store = MemoryStore::new();
    let slug = resolve_unique_slug(&store, "posts", "Hello World", None)
        .await
        .unwrap();
    assert_eq!(slug, "hello-world");
}

#[tokio::test]
async fn test_resolver_suffixes_in_order() {
    let store = MemoryStore::new();
    store
        .put("posts", "p1", json!({"id": "p1", "slug": "hello-world"}))
        .await
        .unwrap();
    store
        .put("posts", "p2", json!({"id": "p2", "slug": "hello-world-1"}))
        .await
        .unwrap();

    let slug = resolve_unique_slug(&store, "posts", "Hello World", None)
        .await
        .unwrap();
    assert_eq!(slug, "hello-world-2");
}

#[tokio::test]
async fn test_resolver_excludes_own_document() {
    let store = MemoryStore::new();
    store
        .put("posts", "p1", json!({"id": "p1", "slug": "hello-world"}))
        .await
        .unwrap();

    // The entity keeps its own slug on a rename back to the same title.
    let slug = resolve_unique_slug(&store, "posts", "Hello World", Some("p1"))
        .await
        .unwrap();
    assert_eq!(slug, "hello-world");
}

#[tokio::test]
async fn test_empty_base_is_a_validation_error() {
    let store = MemoryStore::new();
    let err = resolve_unique_slug(&store, "posts", "???", None)
        .await
        .unwrap_err();
    assert!(matches!(err, ContentError::Validation(_)));
}

/// Store stub where every candidate slug is already taken.
#[derive(Default)]
struct AlwaysColliding {
    probes: AtomicUsize,
}

#[async_trait]
impl ContentStore for AlwaysColliding {
    async fn get(&self, _collection: &str, _id: &str) -> Result<Option<Value>, StoreError> {
        Ok(None)
    }

    async fn list(&self, _collection: &str) -> Result<Vec<Value>, StoreError> {
        Ok(Vec::new())
    }

    async fn find_by_field(
        &self,
        _collection: &str,
        _field: &str,
        value: &str,
    ) -> Result<Option<Value>, StoreError> {
        self.probes.fetch_add(1, Ordering::SeqCst);
        Ok(Some(json!({"id": "other", "slug": value})))
    }

    async fn find_by_field_excluding(
        &self,
        collection: &str,
        field: &str,
        value: &str,
        _exclude_id: &str,
    ) -> Result<Option<Value>, StoreError> {
        self.find_by_field(collection, field, value).await
    }

    async fn apply(&self, _batch: WriteBatch) -> Result<(), StoreError> {
        Ok(())
    }
}

#[tokio::test]
async fn test_resolver_gives_up_after_cap() {
    let store = AlwaysColliding::default();
    let err = resolve_unique_slug(&store, "posts", "Hello World", None)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ContentError::SlugAttemptsExhausted { attempts, .. } if attempts == MAX_SLUG_ATTEMPTS
    ));
    assert_eq!(store.probes.load(Ordering::SeqCst), MAX_SLUG_ATTEMPTS as usize);
}

#[test]
fn test_slugify_matches_published_urls() {
    assert_eq!(slugify("Hello, World!"), "hello-world");
    assert_eq!(slugify("  Rust & The Web  "), "rust-the-web");
    assert_eq!(slugify("snake_case stays"), "snake_case-stays");
    assert_eq!(slugify("already-a-slug"), "already-a-slug");
    assert_eq!(slugify(""), "");
}
