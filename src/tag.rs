//! Tags. These are managed implicitly: posts upsert tags by name during
//! create/update, so there is no dedicated create/delete surface.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::content::{self, ContentError, SluggedEntity};
use crate::slug::slugify;
use crate::store::{ContentStore, WriteBatch};
use crate::utils::{new_id, now_iso};

/// A tag attached to blog posts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub created_at: String,
    pub updated_at: String,
}

impl SluggedEntity for Tag {
    const COLLECTION: &'static str = "tags";
    const KIND: &'static str = "Tag";

    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    fn slug(&self) -> &str {
        &self.slug
    }

    fn set_slug(&mut self, slug: String) {
        self.slug = slug;
    }

    fn touch(&mut self) {
        self.updated_at = now_iso();
    }
}

/// Find the tag holding `name`'s slug, or stage a new one onto `batch`.
///
/// Repeated upserts of the same name are idempotent: two names that slugify
/// identically resolve to the same tag. Callers staging several tags in one
/// batch must dedup by slug first, since staged tags are not yet visible to
/// the lookup.
pub async fn upsert_tag(
    store: &dyn ContentStore,
    name: &str,
    batch: &mut WriteBatch,
) -> Result<Tag, ContentError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ContentError::validation("Tag name cannot be empty"));
    }

    let slug = slugify(name);
    if slug.is_empty() {
        return Err(ContentError::validation(format!(
            "'{name}' does not produce a usable tag slug"
        )));
    }

    if let Some(existing) = content::find_entity_by_slug::<Tag>(store, &slug).await? {
        return Ok(existing);
    }

    let now = now_iso();
    let tag = Tag {
        id: new_id(),
        name: name.to_string(),
        slug,
        created_at: now.clone(),
        updated_at: now,
    };
    content::stage_entity(batch, &tag)?;
    info!(name = %tag.name, slug = %tag.slug, "Staged new tag");
    Ok(tag)
}

/// All tags, sorted by name.
pub async fn list_tags(store: &dyn ContentStore) -> Result<Vec<Tag>, ContentError> {
    let mut tags = content::list_entities::<Tag>(store).await?;
    tags.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(tags)
}
