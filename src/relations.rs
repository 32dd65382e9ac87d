//! Replace-whole-set association sync for blog posts.

use std::collections::HashSet;

use crate::category::Category;
use crate::content::{self, ContentError};
use crate::post::{GalleryImage, GALLERY_COLLECTION};
use crate::slug::slugify;
use crate::store::{ContentStore, WriteBatch};
use crate::tag::upsert_tag;
use crate::utils::new_id;

/// One gallery image as supplied by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct GalleryImageInput {
    pub url: String,
    pub alt_text: Option<String>,
}

/// Association changes for one post write.
///
/// `None` leaves a set unchanged; `Some(vec![])` clears it. Replacement is
/// wholesale — concurrent editors of the same post get last-write-wins
/// semantics on each set.
#[derive(Debug, Clone, Default)]
pub struct AssociationPayload {
    /// Replacement category id set
    pub category_ids: Option<Vec<String>>,
    /// Replacement tag set, given by display name (tags are upserted)
    pub tag_names: Option<Vec<String>>,
    /// Replacement gallery, in display order
    pub gallery_images: Option<Vec<GalleryImageInput>>,
}

/// The id sets a sync resolved to, to be written onto the post. `None`
/// mirrors an omitted payload field.
#[derive(Debug, Clone, Default)]
pub struct ResolvedAssociations {
    pub category_ids: Option<Vec<String>>,
    pub tag_ids: Option<Vec<String>>,
}

/// Stage the association writes for one post onto `batch`.
///
/// Categories are validated to exist; tags are upserted by slug with an
/// order-preserving dedup; gallery images are wholesale replaced (delete all
/// owned by the post, reinsert with positions). Nothing is applied here —
/// the caller commits the batch together with the post document itself.
pub async fn sync_associations(
    store: &dyn ContentStore,
    post_id: &str,
    payload: &AssociationPayload,
    batch: &mut WriteBatch,
) -> Result<ResolvedAssociations, ContentError> {
    let mut resolved = ResolvedAssociations::default();

    if let Some(ids) = &payload.category_ids {
        let mut seen = HashSet::new();
        let mut deduped = Vec::with_capacity(ids.len());
        for id in ids {
            // Every referenced category must exist
            content::get_entity::<Category>(store, id).await?;
            if seen.insert(id.clone()) {
                deduped.push(id.clone());
            }
        }
        resolved.category_ids = Some(deduped);
    }

    if let Some(names) = &payload.tag_names {
        let mut seen = HashSet::new();
        let mut tag_ids = Vec::with_capacity(names.len());
        for name in names {
            let slug = slugify(name.trim());
            if !seen.insert(slug) {
                // Dedup by slug up front; a staged tag is not yet visible to
                // the upsert lookup.
                continue;
            }
            let tag = upsert_tag(store, name, batch).await?;
            tag_ids.push(tag.id);
        }
        resolved.tag_ids = Some(tag_ids);
    }

    if let Some(images) = &payload.gallery_images {
        batch.delete_where(GALLERY_COLLECTION, "blogPostId", post_id);
        for (position, input) in images.iter().enumerate() {
            if input.url.trim().is_empty() {
                return Err(ContentError::validation("Gallery image URL cannot be empty"));
            }
            let image = GalleryImage {
                id: new_id(),
                url: input.url.trim().to_string(),
                alt_text: input.alt_text.clone(),
                blog_post_id: post_id.to_string(),
                position: position as u32,
            };
            batch.put(GALLERY_COLLECTION, &image.id, serde_json::to_value(&image)?);
        }
    }

    Ok(resolved)
}
