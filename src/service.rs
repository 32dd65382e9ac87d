//! Service CRUD.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::content::{self, ContentError, SluggedEntity};
use crate::store::ContentStore;
use crate::utils::{new_id, now_iso};

/// A service offering shown on the marketing site.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: String,
    pub title: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl SluggedEntity for Service {
    const COLLECTION: &'static str = "services";
    const KIND: &'static str = "Service";

    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.title
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

/// Options for creating a service
#[derive(Debug, Clone, Default)]
pub struct CreateServiceOptions {
    pub title: String,
    pub description: Option<String>,
}

/// Options for updating a service; `None` fields are left unchanged
#[derive(Debug, Clone, Default)]
pub struct UpdateServiceOptions {
    pub title: Option<String>,
    pub description: Option<String>,
    /// Explicitly requested slug; conflicts error rather than suffix
    pub slug: Option<String>,
}

/// Create a new service with a collision-free slug.
pub async fn create_service(
    store: &dyn ContentStore,
    options: CreateServiceOptions,
) -> Result<Service, ContentError> {
    let title = options.title.trim().to_string();
    if title.is_empty() {
        return Err(ContentError::validation("Service title is required"));
    }

    let slug = content::slug_for_new::<Service>(store, &title).await?;
    let now = now_iso();
    let service = Service {
        id: new_id(),
        title,
        slug,
        description: options.description,
        created_at: now.clone(),
        updated_at: now,
    };
    content::save_entity(store, &service).await?;
    info!(title = %service.title, slug = %service.slug, "Created service");
    Ok(service)
}

/// Get a service by id.
pub async fn get_service(store: &dyn ContentStore, id: &str) -> Result<Service, ContentError> {
    content::get_entity(store, id).await
}

/// Get a service by slug, if one holds it.
pub async fn get_service_by_slug(
    store: &dyn ContentStore,
    slug: &str,
) -> Result<Option<Service>, ContentError> {
    content::find_entity_by_slug(store, slug).await
}

/// All services, sorted by title.
pub async fn list_services(store: &dyn ContentStore) -> Result<Vec<Service>, ContentError> {
    let mut services = content::list_entities::<Service>(store).await?;
    services.sort_by(|a, b| a.title.cmp(&b.title));
    Ok(services)
}

/// Update a service. The slug is recomputed only when the title changes or a
/// different slug is explicitly requested.
pub async fn update_service(
    store: &dyn ContentStore,
    id: &str,
    options: UpdateServiceOptions,
) -> Result<Service, ContentError> {
    let mut service: Service = content::get_entity(store, id).await?;

    let new_title = options
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty());
    let slug = content::slug_for_update(store, &service, new_title, options.slug.as_deref()).await?;

    if let Some(title) = new_title {
        service.title = title.to_string();
    }
    if let Some(description) = options.description {
        service.description = Some(description);
    }
    service.set_slug(slug);
    service.touch();

    content::save_entity(store, &service).await?;
    info!(id = %service.id, slug = %service.slug, "Updated service");
    Ok(service)
}

/// Delete a service by id.
pub async fn delete_service(store: &dyn ContentStore, id: &str) -> Result<(), ContentError> {
    content::delete_entity::<Service>(store, id).await?;
    info!(id, "Deleted service");
    Ok(())
}
