//! Author CRUD.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::content::{self, ContentError, SluggedEntity};
use crate::store::ContentStore;
use crate::utils::{new_id, now_iso};

/// A blog author.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub id: String,
    pub name: String,
    pub slug: String,
    /// Job title shown on the author card
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl SluggedEntity for Author {
    const COLLECTION: &'static str = "authors";
    const KIND: &'static str = "Author";

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

/// Options for creating an author
#[derive(Debug, Clone, Default)]
pub struct CreateAuthorOptions {
    pub name: String,
    pub title: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
}

/// Options for updating an author; `None` fields are left unchanged
#[derive(Debug, Clone, Default)]
pub struct UpdateAuthorOptions {
    pub name: Option<String>,
    pub title: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    /// Explicitly requested slug; conflicts error rather than suffix
    pub slug: Option<String>,
}

/// Create a new author with a collision-free slug.
pub async fn create_author(
    store: &dyn ContentStore,
    options: CreateAuthorOptions,
) -> Result<Author, ContentError> {
    let name = options.name.trim().to_string();
    if name.is_empty() {
        return Err(ContentError::validation("Author name is required"));
    }

    let slug = content::slug_for_new::<Author>(store, &name).await?;
    let now = now_iso();
    let author = Author {
        id: new_id(),
        name,
        slug,
        title: options.title,
        bio: options.bio,
        avatar_url: options.avatar_url,
        created_at: now.clone(),
        updated_at: now,
    };
    content::save_entity(store, &author).await?;
    info!(name = %author.name, slug = %author.slug, "Created author");
    Ok(author)
}

/// Get an author by id.
pub async fn get_author(store: &dyn ContentStore, id: &str) -> Result<Author, ContentError> {
    content::get_entity(store, id).await
}

/// Get an author by slug, if one holds it.
pub async fn get_author_by_slug(
    store: &dyn ContentStore,
    slug: &str,
) -> Result<Option<Author>, ContentError> {
    content::find_entity_by_slug(store, slug).await
}

/// All authors, sorted by name.
pub async fn list_authors(store: &dyn ContentStore) -> Result<Vec<Author>, ContentError> {
    let mut authors = content::list_entities::<Author>(store).await?;
    authors.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(authors)
}

/// Update an author. The slug is recomputed only when the name changes or a
/// different slug is explicitly requested.
pub async fn update_author(
    store: &dyn ContentStore,
    id: &str,
    options: UpdateAuthorOptions,
) -> Result<Author, ContentError> {
    let mut author: Author = content::get_entity(store, id).await?;

    let new_name = options
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty());
    let slug = content::slug_for_update(store, &author, new_name, options.slug.as_deref()).await?;

    if let Some(name) = new_name {
        author.name = name.to_string();
    }
    if let Some(title) = options.title {
        author.title = Some(title);
    }
    if let Some(bio) = options.bio {
        author.bio = Some(bio);
    }
    if let Some(avatar_url) = options.avatar_url {
        author.avatar_url = Some(avatar_url);
    }
    author.set_slug(slug);
    author.touch();

    content::save_entity(store, &author).await?;
    info!(id = %author.id, slug = %author.slug, "Updated author");
    Ok(author)
}

/// Delete an author by id.
pub async fn delete_author(store: &dyn ContentStore, id: &str) -> Result<(), ContentError> {
    content::delete_entity::<Author>(store, id).await?;
    info!(id, "Deleted author");
    Ok(())
}
