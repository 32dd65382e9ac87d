use serde::{Deserialize, Serialize};

use crate::content::SluggedEntity;
use crate::relations::GalleryImageInput;
use crate::utils::now_iso;

/// Collection holding gallery images owned by blog posts.
pub const GALLERY_COLLECTION: &str = "gallery_images";

/// A blog post. Category and tag membership is stored as id vectors and
/// replaced wholesale on update.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub id: String,
    pub title: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_id: Option<String>,
    #[serde(default)]
    pub category_ids: Vec<String>,
    #[serde(default)]
    pub tag_ids: Vec<String>,
    pub published: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl SluggedEntity for BlogPost {
    const COLLECTION: &'static str = "blog_posts";
    const KIND: &'static str = "BlogPost";

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

/// A gallery image owned by one blog post. Images are replaced wholesale on
/// each update that carries a gallery payload, and deleted with the post.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GalleryImage {
    pub id: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_text: Option<String>,
    pub blog_post_id: String,
    pub position: u32,
}

/// Options for creating a blog post
#[derive(Debug, Clone, Default)]
pub struct CreatePostOptions {
    pub title: String,
    pub excerpt: Option<String>,
    pub body: Option<String>,
    pub cover_image_url: Option<String>,
    pub author_id: Option<String>,
    pub category_ids: Option<Vec<String>>,
    pub tag_names: Option<Vec<String>>,
    pub gallery_images: Option<Vec<GalleryImageInput>>,
    pub published: bool,
}

/// Options for updating a blog post; `None` fields are left unchanged
#[derive(Debug, Clone, Default)]
pub struct UpdatePostOptions {
    pub title: Option<String>,
    pub excerpt: Option<String>,
    pub body: Option<String>,
    pub cover_image_url: Option<String>,
    /// `Some(None)` detaches the author; `None` leaves it as-is
    pub author_id: Option<Option<String>>,
    /// Replacement category set; `Some(vec![])` clears
    pub category_ids: Option<Vec<String>>,
    /// Replacement tag set by display name; `Some(vec![])` clears
    pub tag_names: Option<Vec<String>>,
    /// Replacement gallery in display order; `Some(vec![])` clears
    pub gallery_images: Option<Vec<GalleryImageInput>>,
    pub published: Option<bool>,
    /// Explicitly requested slug; conflicts error rather than suffix
    pub slug: Option<String>,
}
