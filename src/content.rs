//! Generic operations shared by all slugged content entities.

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::slug::{resolve_unique_slug, validate_slug};
use crate::store::{ContentStore, StoreError, WriteBatch};

/// Unified error type for content operations.
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("Slug '{0}' is already in use")]
    SlugTaken(String),

    #[error("Could not find a free slug for '{name}' after {attempts} attempts")]
    SlugAttemptsExhausted { name: String, attempts: u32 },
}

impl ContentError {
    /// Create a validation error with a message
    pub fn validation(msg: impl Into<String>) -> Self {
        ContentError::Validation(msg.into())
    }

    /// Create a not found error
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        ContentError::NotFound {
            kind,
            id: id.into(),
        }
    }
}

/// A content entity carrying a slug unique within its collection.
pub trait SluggedEntity: Serialize + DeserializeOwned + Send + Sync {
    /// Storage collection name (e.g. "categories")
    const COLLECTION: &'static str;
    /// Human-readable kind label used in errors and logs
    const KIND: &'static str;

    fn id(&self) -> &str;

    /// The display name the slug is derived from
    fn display_name(&self) -> &str;

    fn slug(&self) -> &str;

    fn set_slug(&mut self, slug: String);

    /// Bump the entity's updated-at timestamp
    fn touch(&mut self);
}

/// Fetch an entity by id.
pub async fn get_entity<E: SluggedEntity>(
    store: &dyn ContentStore,
    id: &str,
) -> Result<E, ContentError> {
    let doc = store
        .get(E::COLLECTION, id)
        .await?
        .ok_or_else(|| ContentError::not_found(E::KIND, id))?;
    Ok(serde_json::from_value(doc)?)
}

/// Fetch an entity by slug, if one holds it.
pub async fn find_entity_by_slug<E: SluggedEntity>(
    store: &dyn ContentStore,
    slug: &str,
) -> Result<Option<E>, ContentError> {
    match store.find_by_field(E::COLLECTION, "slug", slug).await? {
        Some(doc) => Ok(Some(serde_json::from_value(doc)?)),
        None => Ok(None),
    }
}

/// All entities in the collection, in storage order.
pub async fn list_entities<E: SluggedEntity>(
    store: &dyn ContentStore,
) -> Result<Vec<E>, ContentError> {
    store
        .list(E::COLLECTION)
        .await?
        .into_iter()
        .map(|doc| Ok(serde_json::from_value(doc)?))
        .collect()
}

/// Persist an entity (insert or full replace).
pub async fn save_entity<E: SluggedEntity>(
    store: &dyn ContentStore,
    entity: &E,
) -> Result<(), ContentError> {
    store
        .put(E::COLLECTION, entity.id(), serde_json::to_value(entity)?)
        .await?;
    Ok(())
}

/// Stage an entity write onto an existing batch.
pub fn stage_entity<E: SluggedEntity>(
    batch: &mut WriteBatch,
    entity: &E,
) -> Result<(), ContentError> {
    batch.put(E::COLLECTION, entity.id(), serde_json::to_value(entity)?);
    Ok(())
}

/// Delete an entity by id, erroring when it does not exist.
pub async fn delete_entity<E: SluggedEntity>(
    store: &dyn ContentStore,
    id: &str,
) -> Result<(), ContentError> {
    if store.get(E::COLLECTION, id).await?.is_none() {
        return Err(ContentError::not_found(E::KIND, id));
    }
    store.delete(E::COLLECTION, id).await?;
    Ok(())
}

/// Resolve the slug for a freshly created entity.
pub async fn slug_for_new<E: SluggedEntity>(
    store: &dyn ContentStore,
    name: &str,
) -> Result<String, ContentError> {
    resolve_unique_slug(store, E::COLLECTION, name, None).await
}

/// Work out the slug an updated entity should carry.
///
/// The slug is recomputed only when the display name actually changed. An
/// explicitly requested slug that differs from the current one is validated
/// and checked exactly once; a collision is a conflict, not a suffixing
/// opportunity. Otherwise the current slug is kept.
pub async fn slug_for_update<E: SluggedEntity>(
    store: &dyn ContentStore,
    current: &E,
    new_name: Option<&str>,
    requested_slug: Option<&str>,
) -> Result<String, ContentError> {
    if let Some(name) = new_name {
        if name != current.display_name() {
            return resolve_unique_slug(store, E::COLLECTION, name, Some(current.id())).await;
        }
    }

    if let Some(requested) = requested_slug {
        if requested != current.slug() {
            validate_slug(requested)?;
            if store
                .find_by_field_excluding(E::COLLECTION, "slug", requested, current.id())
                .await?
                .is_some()
            {
                return Err(ContentError::SlugTaken(requested.to_string()));
            }
            return Ok(requested.to_string());
        }
    }

    Ok(current.slug().to_string())
}

/// Apply a publish/unpublish request to a `published`/`publishedAt` pair.
///
/// The timestamp is set on the transition into published, cleared on
/// unpublish, and otherwise preserved. `None` leaves both untouched.
#[must_use]
pub fn publish_transition(
    currently_published: bool,
    published_at: Option<String>,
    requested: Option<bool>,
) -> (bool, Option<String>) {
    match requested {
        Some(true) if !currently_published => (true, Some(crate::utils::now_iso())),
        Some(true) => (true, published_at),
        Some(false) => (false, None),
        None => (currently_published, published_at),
    }
}
