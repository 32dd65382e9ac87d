//! Category CRUD.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::content::{self, ContentError, SluggedEntity};
use crate::post::BlogPost;
use crate::store::{ContentStore, WriteBatch};
use crate::utils::{new_id, now_iso};

/// A blog category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl SluggedEntity for Category {
    const COLLECTION: &'static str = "categories";
    const KIND: &'static str = "Category";

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

/// Options for creating a category
#[derive(Debug, Clone, Default)]
pub struct CreateCategoryOptions {
    pub name: String,
    pub description: Option<String>,
}

/// Options for updating a category; `None` fields are left unchanged
#[derive(Debug, Clone, Default)]
pub struct UpdateCategoryOptions {
    pub name: Option<String>,
    pub description: Option<String>,
    /// Explicitly requested slug; conflicts error rather than suffix
    pub slug: Option<String>,
}

/// Create a new category with a collision-free slug.
pub async fn create_category(
    store: &dyn ContentStore,
    options: CreateCategoryOptions,
) -> Result<Category, ContentError> {
    let name = options.name.trim().to_string();
    if name.is_empty() {
        return Err(ContentError::validation("Category name is required"));
    }

    let slug = content::slug_for_new::<Category>(store, &name).await?;
    let now = now_iso();
    let category = Category {
        id: new_id(),
        name,
        slug,
        description: options.description,
        created_at: now.clone(),
        updated_at: now,
    };
    content::save_entity(store, &category).await?;
    info!(name = %category.name, slug = %category.slug, "Created category");
    Ok(category)
}

/// Get a category by id.
pub async fn get_category(store: &dyn ContentStore, id: &str) -> Result<Category, ContentError> {
    content::get_entity(store, id).await
}

/// Get a category by slug, if one holds it.
pub async fn get_category_by_slug(
    store: &dyn ContentStore,
    slug: &str,
) -> Result<Option<Category>, ContentError> {
    content::find_entity_by_slug(store, slug).await
}

/// All categories, sorted by name.
pub async fn list_categories(store: &dyn ContentStore) -> Result<Vec<Category>, ContentError> {
    let mut categories = content::list_entities::<Category>(store).await?;
    categories.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(categories)
}

/// Update a category. The slug is recomputed only when the name changes or a
/// different slug is explicitly requested.
pub async fn update_category(
    store: &dyn ContentStore,
    id: &str,
    options: UpdateCategoryOptions,
) -> Result<Category, ContentError> {
    let mut category: Category = content::get_entity(store, id).await?;

    let new_name = options
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty());
    let slug = content::slug_for_update(store, &category, new_name, options.slug.as_deref()).await?;

    if let Some(name) = new_name {
        category.name = name.to_string();
    }
    if let Some(description) = options.description {
        category.description = Some(description);
    }
    category.set_slug(slug);
    category.touch();

    content::save_entity(store, &category).await?;
    info!(id = %category.id, slug = %category.slug, "Updated category");
    Ok(category)
}

/// Delete a category and detach it from every post referencing it, as one
/// batch.
pub async fn delete_category(store: &dyn ContentStore, id: &str) -> Result<(), ContentError> {
    // Existence check first so a bad id is a not-found, not a silent no-op
    let category: Category = content::get_entity(store, id).await?;

    let mut batch = WriteBatch::new();
    batch.delete(Category::COLLECTION, id);

    let posts = content::list_entities::<BlogPost>(store).await?;
    for mut post in posts {
        if post.category_ids.iter().any(|c| c == id) {
            post.category_ids.retain(|c| c != id);
            post.touch();
            content::stage_entity(&mut batch, &post)?;
        }
    }

    store.apply(batch).await?;
    info!(name = %category.name, id, "Deleted category");
    Ok(())
}
