//! Small shared helpers.

/// Get the current timestamp in ISO 8601 / RFC 3339 format
#[must_use]
pub fn now_iso() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Generate a fresh entity id (hyphenated UUID v4)
#[must_use]
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
