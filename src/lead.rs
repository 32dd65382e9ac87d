//! Inbound leads captured from site contact forms.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::content::ContentError;
use crate::store::ContentStore;
use crate::utils::{new_id, now_iso};

/// Collection holding lead documents.
pub const LEADS_COLLECTION: &str = "leads";

/// Pipeline status of a lead.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum LeadStatus {
    #[default]
    New,
    Contacted,
    Qualified,
    Lost,
}

/// A form submission from the public site.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub source_form_name: String,
    pub submission_url: String,
    pub status: LeadStatus,
    pub submitted_at: String,
}

/// Options for recording a lead
#[derive(Debug, Clone, Default)]
pub struct CreateLeadOptions {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub message: Option<String>,
    pub source_form_name: String,
    pub submission_url: String,
}

fn require(value: &str, field: &str) -> Result<String, ContentError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ContentError::validation(format!("Lead {field} is required")));
    }
    Ok(trimmed.to_string())
}

/// Record a new lead. All identifying fields are required; status starts as
/// [`LeadStatus::New`].
pub async fn create_lead(
    store: &dyn ContentStore,
    options: CreateLeadOptions,
) -> Result<Lead, ContentError> {
    let email = require(&options.email, "email")?;
    if !email.contains('@') {
        return Err(ContentError::validation("Lead email is not an address"));
    }

    let lead = Lead {
        id: new_id(),
        full_name: require(&options.full_name, "full name")?,
        email,
        phone: require(&options.phone, "phone")?,
        company: require(&options.company, "company")?,
        message: options.message,
        source_form_name: require(&options.source_form_name, "source form name")?,
        submission_url: require(&options.submission_url, "submission URL")?,
        status: LeadStatus::New,
        submitted_at: now_iso(),
    };
    store
        .put(LEADS_COLLECTION, &lead.id, serde_json::to_value(&lead)?)
        .await?;
    info!(email = %lead.email, form = %lead.source_form_name, "Recorded lead");
    Ok(lead)
}

/// Get a lead by id.
pub async fn get_lead(store: &dyn ContentStore, id: &str) -> Result<Lead, ContentError> {
    let doc = store
        .get(LEADS_COLLECTION, id)
        .await?
        .ok_or_else(|| ContentError::not_found("Lead", id))?;
    Ok(serde_json::from_value(doc)?)
}

/// All leads, newest first.
pub async fn list_leads(store: &dyn ContentStore) -> Result<Vec<Lead>, ContentError> {
    let mut leads: Vec<Lead> = store
        .list(LEADS_COLLECTION)
        .await?
        .into_iter()
        .map(serde_json::from_value)
        .collect::<Result<_, _>>()?;
    leads.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
    Ok(leads)
}

/// Move a lead along the pipeline.
pub async fn update_lead_status(
    store: &dyn ContentStore,
    id: &str,
    status: LeadStatus,
) -> Result<Lead, ContentError> {
    let mut lead = get_lead(store, id).await?;
    lead.status = status;
    store
        .put(LEADS_COLLECTION, &lead.id, serde_json::to_value(&lead)?)
        .await?;
    info!(id, ?status, "Updated lead status");
    Ok(lead)
}

/// Delete a lead by id.
pub async fn delete_lead(store: &dyn ContentStore, id: &str) -> Result<(), ContentError> {
    // Existence check gives callers a proper not-found.
    get_lead(store, id).await?;
    store.delete(LEADS_COLLECTION, id).await?;
    info!(id, "Deleted lead");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn options() -> CreateLeadOptions {
        CreateLeadOptions {
            full_name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: "+44 20 7946 0000".to_string(),
            company: "Analytical Engines Ltd".to_string(),
            message: Some("Interested in a redesign".to_string()),
            source_form_name: "contact".to_string(),
            submission_url: "https://example.com/contact".to_string(),
        }
    }

    #[tokio::test]
    async fn test_lead_lifecycle() {
        let store = MemoryStore::new();
        let lead = create_lead(&store, options()).await.unwrap();
        assert_eq!(lead.status, LeadStatus::New);

        let updated = update_lead_status(&store, &lead.id, LeadStatus::Contacted)
            .await
            .unwrap();
        assert_eq!(updated.status, LeadStatus::Contacted);

        delete_lead(&store, &lead.id).await.unwrap();
        assert!(matches!(
            get_lead(&store, &lead.id).await.unwrap_err(),
            ContentError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn test_missing_fields_rejected() {
        let store = MemoryStore::new();
        let err = create_lead(
            &store,
            CreateLeadOptions {
                phone: String::new(),
                ..options()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ContentError::Validation(_)));

        let err = create_lead(
            &store,
            CreateLeadOptions {
                email: "not-an-address".to_string(),
                ..options()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ContentError::Validation(_)));
    }
}
