//! Admin settings with encrypted sensitive values.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::crypto::{CryptoError, SettingsCipher};
use crate::store::{ContentStore, StoreError, WriteBatch};
use crate::utils::{new_id, now_iso};

/// Collection holding settings documents.
pub const SETTINGS_COLLECTION: &str = "settings";

/// Keys whose values are stored as encryption envelopes. Fixed allow-list;
/// everything else is stored in the clear.
pub const SENSITIVE_KEYS: &[&str] = &["unsplash_access_key", "unsplash_secret_key"];

/// Rendered in place of a sensitive value whose envelope fails to decrypt.
pub const DECRYPTION_FAILED_SENTINEL: &str = "[DECRYPTION FAILED]";

static SETTING_KEY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9_]*$").unwrap());

/// Settings operation errors
#[derive(Debug, Error)]
pub enum SettingError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Crypto error: {0}")]
    Crypto(#[from] CryptoError),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl SettingError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        SettingError::Validation(msg.into())
    }
}

/// One stored setting. `key` is globally unique across categories.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Setting {
    pub id: String,
    pub key: String,
    pub value: String,
    pub category: String,
    pub updated_at: String,
}

/// One key/value pair to save. Sensitive values are given in plaintext and
/// encrypted on the way in.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingEntry {
    pub key: String,
    pub value: String,
}

/// Whether a key's value is routed through the settings cipher.
pub fn is_sensitive_key(key: &str) -> bool {
    SENSITIVE_KEYS.contains(&key)
}

/// Upsert a batch of settings under one category. Keys are validated,
/// sensitive values encrypted, and all upserts applied as one batch.
pub async fn save_settings(
    store: &dyn ContentStore,
    cipher: &SettingsCipher,
    category: &str,
    entries: Vec<SettingEntry>,
) -> Result<Vec<Setting>, SettingError> {
    let category = category.trim();
    if category.is_empty() {
        return Err(SettingError::validation("Settings category is required"));
    }

    let mut batch = WriteBatch::new();
    let mut saved: Vec<Setting> = Vec::with_capacity(entries.len());
    // Keys staged earlier in this call are not yet visible to the store
    // lookup, so track them here to keep keys globally unique.
    let mut staged_ids: HashMap<String, String> = HashMap::new();
    for entry in entries {
        if !SETTING_KEY_REGEX.is_match(&entry.key) {
            return Err(SettingError::validation(format!(
                "Invalid setting key '{}': expected lowercase snake_case",
                entry.key
            )));
        }

        let value = if is_sensitive_key(&entry.key) {
            cipher.encrypt(&entry.value)?
        } else {
            entry.value
        };

        // Upsert by key, keeping the existing id when the key is already
        // present (stored or staged earlier in this call). A repeated key
        // within one call behaves like sequential upserts: last value wins.
        let id = match staged_ids.get(&entry.key) {
            Some(id) => id.clone(),
            None => match store
                .find_by_field(SETTINGS_COLLECTION, "key", &entry.key)
                .await?
            {
                Some(existing) => serde_json::from_value::<Setting>(existing)?.id,
                None => new_id(),
            },
        };
        staged_ids.insert(entry.key.clone(), id.clone());

        let setting = Setting {
            id,
            key: entry.key,
            value,
            category: category.to_string(),
            updated_at: now_iso(),
        };
        batch.put(SETTINGS_COLLECTION, &setting.id, serde_json::to_value(&setting)?);
        saved.retain(|s| s.key != setting.key);
        saved.push(setting);
    }

    store.apply(batch).await?;
    info!(category, count = saved.len(), "Saved settings");
    Ok(saved)
}

/// Fetch settings, optionally filtered by category, with sensitive values
/// decrypted. A value whose envelope fails to decrypt is rendered as
/// [`DECRYPTION_FAILED_SENTINEL`] rather than aborting the whole read; a
/// missing or wrong-length key is a configuration error and does abort.
pub async fn get_settings(
    store: &dyn ContentStore,
    cipher: &SettingsCipher,
    category: Option<&str>,
) -> Result<Vec<Setting>, SettingError> {
    let mut settings: Vec<Setting> = store
        .list(SETTINGS_COLLECTION)
        .await?
        .into_iter()
        .map(serde_json::from_value)
        .collect::<Result<_, _>>()?;
    if let Some(category) = category {
        settings.retain(|s| s.category == category);
    }
    settings.sort_by(|a, b| a.key.cmp(&b.key));

    for setting in &mut settings {
        if !is_sensitive_key(&setting.key) {
            continue;
        }
        match cipher.decrypt(&setting.value) {
            Ok(plaintext) => setting.value = plaintext,
            Err(err @ (CryptoError::MissingKey | CryptoError::InvalidKeyLength(_))) => {
                return Err(err.into());
            }
            Err(err) => {
                warn!(key = %setting.key, error = %err, "Failed to decrypt setting value");
                setting.value = DECRYPTION_FAILED_SENTINEL.to_string();
            }
        }
    }
    Ok(settings)
}

/// Fetch a single setting by key, decrypting sensitive values the same way
/// as [`get_settings`].
pub async fn get_setting(
    store: &dyn ContentStore,
    cipher: &SettingsCipher,
    key: &str,
) -> Result<Option<Setting>, SettingError> {
    let Some(doc) = store.find_by_field(SETTINGS_COLLECTION, "key", key).await? else {
        return Ok(None);
    };
    let mut setting: Setting = serde_json::from_value(doc)?;
    if is_sensitive_key(&setting.key) {
        match cipher.decrypt(&setting.value) {
            Ok(plaintext) => setting.value = plaintext,
            Err(err @ (CryptoError::MissingKey | CryptoError::InvalidKeyLength(_))) => {
                return Err(err.into());
            }
            Err(err) => {
                warn!(key = %setting.key, error = %err, "Failed to decrypt setting value");
                setting.value = DECRYPTION_FAILED_SENTINEL.to_string();
            }
        }
    }
    Ok(Some(setting))
}

/// Delete a setting by key. Missing keys are a no-op.
pub async fn delete_setting(store: &dyn ContentStore, key: &str) -> Result<(), SettingError> {
    if let Some(doc) = store.find_by_field(SETTINGS_COLLECTION, "key", key).await? {
        let setting: Setting = serde_json::from_value(doc)?;
        store.delete(SETTINGS_COLLECTION, &setting.id).await?;
        info!(key, "Deleted setting");
    }
    Ok(())
}
