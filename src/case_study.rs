//! Case study CRUD and publish lifecycle.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::content::{self, ContentError, SluggedEntity};
use crate::industry::Industry;
use crate::store::ContentStore;
use crate::utils::{new_id, now_iso};

/// A customer case study, optionally tied to an industry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CaseStudy {
    pub id: String,
    pub title: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry_id: Option<String>,
    pub published: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl SluggedEntity for CaseStudy {
    const COLLECTION: &'static str = "case_studies";
    const KIND: &'static str = "CaseStudy";

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

/// Options for creating a case study
#[derive(Debug, Clone, Default)]
pub struct CreateCaseStudyOptions {
    pub title: String,
    pub summary: Option<String>,
    pub body: Option<String>,
    pub industry_id: Option<String>,
    pub published: bool,
}

/// Options for updating a case study; `None` fields are left unchanged
#[derive(Debug, Clone, Default)]
pub struct UpdateCaseStudyOptions {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub body: Option<String>,
    /// `Some(None)` detaches the industry; `None` leaves it as-is
    pub industry_id: Option<Option<String>>,
    pub published: Option<bool>,
    /// Explicitly requested slug; conflicts error rather than suffix
    pub slug: Option<String>,
}

async fn validate_industry(store: &dyn ContentStore, id: &str) -> Result<(), ContentError> {
    content::get_entity::<Industry>(store, id).await.map(|_| ())
}

/// Create a new case study. An `industry_id`, when given, must name an
/// existing industry.
pub async fn create_case_study(
    store: &dyn ContentStore,
    options: CreateCaseStudyOptions,
) -> Result<CaseStudy, ContentError> {
    let title = options.title.trim().to_string();
    if title.is_empty() {
        return Err(ContentError::validation("Case study title is required"));
    }
    if let Some(industry_id) = options.industry_id.as_deref() {
        validate_industry(store, industry_id).await?;
    }

    let slug = content::slug_for_new::<CaseStudy>(store, &title).await?;
    let now = now_iso();
    let published_at = options.published.then(|| now.clone());
    let case_study = CaseStudy {
        id: new_id(),
        title,
        slug,
        summary: options.summary,
        body: options.body,
        industry_id: options.industry_id,
        published: options.published,
        published_at,
        created_at: now.clone(),
        updated_at: now,
    };
    content::save_entity(store, &case_study).await?;
    info!(title = %case_study.title, slug = %case_study.slug, "Created case study");
    Ok(case_study)
}

/// Get a case study by id.
pub async fn get_case_study(store: &dyn ContentStore, id: &str) -> Result<CaseStudy, ContentError> {
    content::get_entity(store, id).await
}

/// Get a case study by slug, if one holds it.
pub async fn get_case_study_by_slug(
    store: &dyn ContentStore,
    slug: &str,
) -> Result<Option<CaseStudy>, ContentError> {
    content::find_entity_by_slug(store, slug).await
}

/// All case studies, newest first.
pub async fn list_case_studies(store: &dyn ContentStore) -> Result<Vec<CaseStudy>, ContentError> {
    let mut studies = content::list_entities::<CaseStudy>(store).await?;
    studies.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(studies)
}

/// Published case studies only, newest first.
pub async fn list_published_case_studies(
    store: &dyn ContentStore,
) -> Result<Vec<CaseStudy>, ContentError> {
    let mut studies = list_case_studies(store).await?;
    studies.retain(|s| s.published);
    Ok(studies)
}

/// Update a case study. Publishing for the first time stamps `published_at`;
/// re-publishing an already-published study preserves the original timestamp.
pub async fn update_case_study(
    store: &dyn ContentStore,
    id: &str,
    options: UpdateCaseStudyOptions,
) -> Result<CaseStudy, ContentError> {
    let mut case_study: CaseStudy = content::get_entity(store, id).await?;

    if let Some(Some(industry_id)) = options.industry_id.as_ref() {
        validate_industry(store, industry_id).await?;
    }

    let new_title = options
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty());
    let slug =
        content::slug_for_update(store, &case_study, new_title, options.slug.as_deref()).await?;

    if let Some(title) = new_title {
        case_study.title = title.to_string();
    }
    if let Some(summary) = options.summary {
        case_study.summary = Some(summary);
    }
    if let Some(body) = options.body {
        case_study.body = Some(body);
    }
    if let Some(industry_id) = options.industry_id {
        case_study.industry_id = industry_id;
    }
    let (published, published_at) = content::publish_transition(
        case_study.published,
        case_study.published_at.clone(),
        options.published,
    );
    case_study.published = published;
    case_study.published_at = published_at;

    case_study.set_slug(slug);
    case_study.touch();

    content::save_entity(store, &case_study).await?;
    info!(id = %case_study.id, slug = %case_study.slug, published = case_study.published, "Updated case study");
    Ok(case_study)
}

/// Delete a case study by id.
pub async fn delete_case_study(store: &dyn ContentStore, id: &str) -> Result<(), ContentError> {
    content::delete_entity::<CaseStudy>(store, id).await?;
    info!(id, "Deleted case study");
    Ok(())
}
