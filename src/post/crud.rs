use tracing::info;

use crate::author::Author;
use crate::content::{self, ContentError, SluggedEntity};
use crate::relations::{sync_associations, AssociationPayload};
use crate::store::{ContentStore, WriteBatch};
use crate::utils::{new_id, now_iso};

use super::types::{
    BlogPost, CreatePostOptions, GalleryImage, UpdatePostOptions, GALLERY_COLLECTION,
};

async fn validate_author(store: &dyn ContentStore, id: &str) -> Result<(), ContentError> {
    content::get_entity::<Author>(store, id).await.map(|_| ())
}

/// Create a blog post. The post document and all association writes (tags,
/// gallery) go into one batch, applied all-or-nothing.
pub async fn create_post(
    store: &dyn ContentStore,
    options: CreatePostOptions,
) -> Result<BlogPost, ContentError> {
    let title = options.title.trim().to_string();
    if title.is_empty() {
        return Err(ContentError::validation("Post title is required"));
    }
    if let Some(author_id) = options.author_id.as_deref() {
        validate_author(store, author_id).await?;
    }

    let slug = content::slug_for_new::<BlogPost>(store, &title).await?;
    let now = now_iso();
    let published_at = options.published.then(|| now.clone());
    let mut post = BlogPost {
        id: new_id(),
        title,
        slug,
        excerpt: options.excerpt,
        body: options.body,
        cover_image_url: options.cover_image_url,
        author_id: options.author_id,
        category_ids: Vec::new(),
        tag_ids: Vec::new(),
        published: options.published,
        published_at,
        created_at: now.clone(),
        updated_at: now,
    };

    let payload = AssociationPayload {
        category_ids: options.category_ids,
        tag_names: options.tag_names,
        gallery_images: options.gallery_images,
    };
    let mut batch = WriteBatch::new();
    let resolved = sync_associations(store, &post.id, &payload, &mut batch).await?;
    if let Some(ids) = resolved.category_ids {
        post.category_ids = ids;
    }
    if let Some(ids) = resolved.tag_ids {
        post.tag_ids = ids;
    }
    content::stage_entity(&mut batch, &post)?;
    store.apply(batch).await?;

    info!(title = %post.title, slug = %post.slug, "Created blog post");
    Ok(post)
}

/// Get a post by id.
pub async fn get_post(store: &dyn ContentStore, id: &str) -> Result<BlogPost, ContentError> {
    content::get_entity(store, id).await
}

/// Get a post by slug, if one holds it.
pub async fn get_post_by_slug(
    store: &dyn ContentStore,
    slug: &str,
) -> Result<Option<BlogPost>, ContentError> {
    content::find_entity_by_slug(store, slug).await
}

/// All posts, newest first.
pub async fn list_posts(store: &dyn ContentStore) -> Result<Vec<BlogPost>, ContentError> {
    let mut posts = content::list_entities::<BlogPost>(store).await?;
    posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(posts)
}

/// Published posts only, newest first.
pub async fn list_published_posts(
    store: &dyn ContentStore,
) -> Result<Vec<BlogPost>, ContentError> {
    let mut posts = list_posts(store).await?;
    posts.retain(|p| p.published);
    Ok(posts)
}

/// Update a post. Slug rules: recomputed (with collision suffixing) when the
/// title changes; an explicitly requested slug is checked once and conflicts
/// error. Association sets given in the options replace the stored sets
/// wholesale; omitted sets are untouched. Everything lands in one batch.
pub async fn update_post(
    store: &dyn ContentStore,
    id: &str,
    options: UpdatePostOptions,
) -> Result<BlogPost, ContentError> {
    let mut post: BlogPost = content::get_entity(store, id).await?;

    if let Some(Some(author_id)) = options.author_id.as_ref() {
        validate_author(store, author_id).await?;
    }

    let new_title = options
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty());
    let slug = content::slug_for_update(store, &post, new_title, options.slug.as_deref()).await?;

    if let Some(title) = new_title {
        post.title = title.to_string();
    }
    if let Some(excerpt) = options.excerpt {
        post.excerpt = Some(excerpt);
    }
    if let Some(body) = options.body {
        post.body = Some(body);
    }
    if let Some(url) = options.cover_image_url {
        post.cover_image_url = Some(url);
    }
    if let Some(author_id) = options.author_id {
        post.author_id = author_id;
    }
    let (published, published_at) = content::publish_transition(
        post.published,
        post.published_at.clone(),
        options.published,
    );
    post.published = published;
    post.published_at = published_at;

    let payload = AssociationPayload {
        category_ids: options.category_ids,
        tag_names: options.tag_names,
        gallery_images: options.gallery_images,
    };
    let mut batch = WriteBatch::new();
    let resolved = sync_associations(store, &post.id, &payload, &mut batch).await?;
    if let Some(ids) = resolved.category_ids {
        post.category_ids = ids;
    }
    if let Some(ids) = resolved.tag_ids {
        post.tag_ids = ids;
    }

    post.set_slug(slug);
    post.touch();
    content::stage_entity(&mut batch, &post)?;
    store.apply(batch).await?;

    info!(id = %post.id, slug = %post.slug, published = post.published, "Updated blog post");
    Ok(post)
}

/// Delete a post and its gallery images in one batch.
pub async fn delete_post(store: &dyn ContentStore, id: &str) -> Result<(), ContentError> {
    if store.get(BlogPost::COLLECTION, id).await?.is_none() {
        return Err(ContentError::not_found(BlogPost::KIND, id));
    }
    let mut batch = WriteBatch::new();
    batch.delete(BlogPost::COLLECTION, id);
    batch.delete_where(GALLERY_COLLECTION, "blogPostId", id);
    store.apply(batch).await?;
    info!(id, "Deleted blog post");
    Ok(())
}

/// A post's gallery images, in display order.
pub async fn list_gallery_images(
    store: &dyn ContentStore,
    post_id: &str,
) -> Result<Vec<GalleryImage>, ContentError> {
    let mut images: Vec<GalleryImage> = store
        .list(GALLERY_COLLECTION)
        .await?
        .into_iter()
        .map(serde_json::from_value)
        .collect::<Result<_, _>>()?;
    images.retain(|img| img.blog_post_id == post_id);
    images.sort_by_key(|img| img.position);
    Ok(images)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relations::GalleryImageInput;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn test_create_assigns_suffixed_slug_on_collision() {
        let store = MemoryStore::new();
        let first = create_post(
            &store,
            CreatePostOptions {
                title: "Hello World".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let second = create_post(
            &store,
            CreatePostOptions {
                title: "Hello World".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(first.slug, "hello-world");
        assert_eq!(second.slug, "hello-world-1");
    }

    #[tokio::test]
    async fn test_gallery_replaced_wholesale() {
        let store = MemoryStore::new();
        let post = create_post(
            &store,
            CreatePostOptions {
                title: "Gallery post".to_string(),
                gallery_images: Some(vec![
                    GalleryImageInput {
                        url: "https://img/1.png".to_string(),
                        alt_text: None,
                    },
                    GalleryImageInput {
                        url: "https://img/2.png".to_string(),
                        alt_text: Some("two".to_string()),
                    },
                ]),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let images = list_gallery_images(&store, &post.id).await.unwrap();
        assert_eq!(images.len(), 2);
        assert_eq!(images[0].position, 0);
        assert_eq!(images[1].alt_text.as_deref(), Some("two"));

        // None leaves the gallery untouched.
        update_post(
            &store,
            &post.id,
            UpdatePostOptions {
                excerpt: Some("tweak".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(list_gallery_images(&store, &post.id).await.unwrap().len(), 2);

        // Some(vec![]) clears it.
        update_post(
            &store,
            &post.id,
            UpdatePostOptions {
                gallery_images: Some(Vec::new()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert!(list_gallery_images(&store, &post.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_cascades_gallery() {
        let store = MemoryStore::new();
        let post = create_post(
            &store,
            CreatePostOptions {
                title: "Doomed".to_string(),
                gallery_images: Some(vec![GalleryImageInput {
                    url: "https://img/x.png".to_string(),
                    alt_text: None,
                }]),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        delete_post(&store, &post.id).await.unwrap();
        assert!(matches!(
            get_post(&store, &post.id).await.unwrap_err(),
            ContentError::NotFound { .. }
        ));
        assert!(list_gallery_images(&store, &post.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_author_rejected() {
        let store = MemoryStore::new();
        let err = create_post(
            &store,
            CreatePostOptions {
                title: "Orphan".to_string(),
                author_id: Some("ghost".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ContentError::NotFound { .. }));
    }
}
