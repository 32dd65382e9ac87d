//! Slug generation and store-backed uniqueness resolution.

use crate::content::ContentError;
use crate::store::ContentStore;
use tracing::error;

/// Probe ceiling for the uniqueness loop. Hitting it means pathological
/// input or a collision storm, and the operation fails instead of spinning.
pub const MAX_SLUG_ATTEMPTS: u32 = 100;

/// Convert a display name into a URL-safe slug.
///
/// Lowercases, trims, turns whitespace runs into single hyphens, drops
/// everything outside `[a-z0-9_-]`, collapses hyphen runs and trims edge
/// hyphens. Empty input yields an empty string. Purely textual; uniqueness
/// is [`resolve_unique_slug`]'s job.
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;

    for c in text.trim().to_lowercase().chars() {
        if c.is_whitespace() || c == '-' {
            pending_hyphen = true;
        } else if c.is_ascii_alphanumeric() || c == '_' {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        }
        // Everything else is dropped without breaking a hyphen run
    }

    slug
}

/// Validate an explicitly supplied slug (lowercase alphanumeric, hyphens,
/// underscores, no edge hyphens).
pub fn validate_slug(slug: &str) -> Result<(), ContentError> {
    if slug.is_empty() {
        return Err(ContentError::validation("Slug cannot be empty"));
    }

    if !slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
    {
        return Err(ContentError::validation(
            "Slug can only contain lowercase letters, numbers, hyphens and underscores",
        ));
    }

    if slug.starts_with('-') || slug.ends_with('-') {
        return Err(ContentError::validation(
            "Slug cannot start or end with a hyphen",
        ));
    }

    Ok(())
}

/// Resolve a collision-free slug for `name` within `collection`.
///
/// Probes `base`, `base-1`, `base-2`, ... with one store lookup per
/// candidate. Each probe depends on the previous miss, so the loop is
/// intentionally sequential. Passing `exclude_id` keeps an entity from
/// colliding with its own stored slug on update.
///
/// Known limitation: this is a check-then-act sequence, so two concurrent
/// creates with the same name can race to the same slug.
pub async fn resolve_unique_slug(
    store: &dyn ContentStore,
    collection: &str,
    name: &str,
    exclude_id: Option<&str>,
) -> Result<String, ContentError> {
    let base = slugify(name);
    if base.is_empty() {
        return Err(ContentError::validation(format!(
            "'{name}' does not produce a usable slug"
        )));
    }

    let mut candidate = base.clone();
    let mut counter: u32 = 1;

    loop {
        let taken = match exclude_id {
            Some(id) => {
                store
                    .find_by_field_excluding(collection, "slug", &candidate, id)
                    .await?
            }
            None => store.find_by_field(collection, "slug", &candidate).await?,
        };

        if taken.is_none() {
            return Ok(candidate);
        }

        candidate = format!("{base}-{counter}");
        counter += 1;
        if counter > MAX_SLUG_ATTEMPTS {
            error!(
                collection,
                name, "Slug resolution gave up after {MAX_SLUG_ATTEMPTS} attempts"
            );
            return Err(ContentError::SlugAttemptsExhausted {
                name: name.to_string(),
                attempts: MAX_SLUG_ATTEMPTS,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("My Awesome Post!"), "my-awesome-post");
        assert_eq!(slugify("  Spaces  "), "spaces");
        assert_eq!(slugify("multiple---hyphens"), "multiple-hyphens");
        assert_eq!(slugify("Tabs\tand\nnewlines"), "tabs-and-newlines");
        assert_eq!(slugify("snake_case kept"), "snake_case-kept");
        assert_eq!(slugify("Déjà vu"), "dj-vu");
        assert_eq!(slugify("a ! b"), "a-b");
    }

    #[test]
    fn test_slugify_empty_and_symbol_only() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("   "), "");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_slugify_no_edge_hyphens() {
        assert_eq!(slugify("--edge--"), "edge");
        assert_eq!(slugify("! leading symbols"), "leading-symbols");
    }

    #[test]
    fn test_slugify_idempotent() {
        for input in ["Hello World!", "  a--b  ", "UPPER_case 123", "déjà"] {
            let once = slugify(input);
            assert_eq!(slugify(&once), once);
        }
    }

    #[test]
    fn test_validate_slug() {
        assert!(validate_slug("hello-world").is_ok());
        assert!(validate_slug("post_42").is_ok());
        assert!(validate_slug("").is_err());
        assert!(validate_slug("-leading").is_err());
        assert!(validate_slug("trailing-").is_err());
        assert!(validate_slug("Upper").is_err());
        assert!(validate_slug("has space").is_err());
    }
}
