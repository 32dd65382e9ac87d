//! Industry CRUD.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::content::{self, ContentError, SluggedEntity};
use crate::store::ContentStore;
use crate::utils::{new_id, now_iso};

/// An industry vertical case studies are filed under.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Industry {
    pub id: String,
    pub name: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl SluggedEntity for Industry {
    const COLLECTION: &'static str = "industries";
    const KIND: &'static str = "Industry";

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

/// Options for creating an industry
#[derive(Debug, Clone, Default)]
pub struct CreateIndustryOptions {
    pub name: String,
    pub description: Option<String>,
}

/// Options for updating an industry; `None` fields are left unchanged
#[derive(Debug, Clone, Default)]
pub struct UpdateIndustryOptions {
    pub name: Option<String>,
    pub description: Option<String>,
    /// Explicitly requested slug; conflicts error rather than suffix
    pub slug: Option<String>,
}

/// Create a new industry with a collision-free slug.
pub async fn create_industry(
    store: &dyn ContentStore,
    options: CreateIndustryOptions,
) -> Result<Industry, ContentError> {
    let name = options.name.trim().to_string();
    if name.is_empty() {
        return Err(ContentError::validation("Industry name is required"));
    }

    let slug = content::slug_for_new::<Industry>(store, &name).await?;
    let now = now_iso();
    let industry = Industry {
        id: new_id(),
        name,
        slug,
        description: options.description,
        created_at: now.clone(),
        updated_at: now,
    };
    content::save_entity(store, &industry).await?;
    info!(name = %industry.name, slug = %industry.slug, "Created industry");
    Ok(industry)
}

/// Get an industry by id.
pub async fn get_industry(store: &dyn ContentStore, id: &str) -> Result<Industry, ContentError> {
    content::get_entity(store, id).await
}

/// Get an industry by slug, if one holds it.
pub async fn get_industry_by_slug(
    store: &dyn ContentStore,
    slug: &str,
) -> Result<Option<Industry>, ContentError> {
    content::find_entity_by_slug(store, slug).await
}

/// All industries, sorted by name.
pub async fn list_industries(store: &dyn ContentStore) -> Result<Vec<Industry>, ContentError> {
    let mut industries = content::list_entities::<Industry>(store).await?;
    industries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(industries)
}

/// Update an industry. The slug is recomputed only when the name changes or
/// a different slug is explicitly requested.
pub async fn update_industry(
    store: &dyn ContentStore,
    id: &str,
    options: UpdateIndustryOptions,
) -> Result<Industry, ContentError> {
    let mut industry: Industry = content::get_entity(store, id).await?;

    let new_name = options
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty());
    let slug = content::slug_for_update(store, &industry, new_name, options.slug.as_deref()).await?;

    if let Some(name) = new_name {
        industry.name = name.to_string();
    }
    if let Some(description) = options.description {
        industry.description = Some(description);
    }
    industry.set_slug(slug);
    industry.touch();

    content::save_entity(store, &industry).await?;
    info!(id = %industry.id, slug = %industry.slug, "Updated industry");
    Ok(industry)
}

/// Delete an industry by id. Case studies keep their `industryId` reference;
/// readers treat a dangling reference as "no industry".
pub async fn delete_industry(store: &dyn ContentStore, id: &str) -> Result<(), ContentError> {
    content::delete_entity::<Industry>(store, id).await?;
    info!(id, "Deleted industry");
    Ok(())
}
