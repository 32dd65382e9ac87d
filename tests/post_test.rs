//! Integration tests for blog post CRUD with associations, on the file store.

mod common;

use common::{create_test_dir, open_test_store};

use stanza_cms::category::{create_category, CreateCategoryOptions};
use stanza_cms::content::ContentError;
use stanza_cms::post::{
    create_post, delete_post, get_post, get_post_by_slug, list_gallery_images, update_post,
    CreatePostOptions, UpdatePostOptions,
};
use stanza_cms::relations::GalleryImageInput;
use stanza_cms::tag::list_tags;

#[tokio::test]
async fn test_two_posts_same_title_get_distinct_slugs() {
    let dir = create_test_dir();
    let store = open_test_store(&dir).await;

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

    let found = get_post_by_slug(&store, "hello-world-1").await.unwrap();
    assert_eq!(found.map(|p| p.id), Some(second.id));
}

#[tokio::test]
async fn test_associations_written_with_post() {
    let dir = create_test_dir();
    let store = open_test_store(&dir).await;

    let category = create_category(
        &store,
        CreateCategoryOptions {
            name: "Engineering".to_string(),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let post = create_post(
        &store,
        CreatePostOptions {
            title: "Shipping fast".to_string(),
            category_ids: Some(vec![category.id.clone()]),
            tag_names: Some(vec!["Rust".to_string(), "Process".to_string()]),
            gallery_images: Some(vec![GalleryImageInput {
                url: "https://img/cover.png".to_string(),
                alt_text: Some("cover".to_string()),
            }]),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(post.category_ids, vec![category.id]);
    assert_eq!(post.tag_ids.len(), 2);

    let tags = list_tags(&store).await.unwrap();
    let names: Vec<_> = tags.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["Process", "Rust"]);

    let images = list_gallery_images(&store, &post.id).await.unwrap();
    assert_eq!(images.len(), 1);
    assert_eq!(images[0].position, 0);
}

#[tokio::test]
async fn test_tag_upsert_reuses_existing_tags() {
    let dir = create_test_dir();
    let store = open_test_store(&dir).await;

    let first = create_post(
        &store,
        CreatePostOptions {
            title: "Post one".to_string(),
            tag_names: Some(vec!["Rust".to_string()]),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    let second = create_post(
        &store,
        CreatePostOptions {
            title: "Post two".to_string(),
            tag_names: Some(vec!["rust".to_string()]),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    // Same slug, same tag document.
    assert_eq!(first.tag_ids, second.tag_ids);
    assert_eq!(list_tags(&store).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_gallery_none_leaves_and_empty_clears() {
    let dir = create_test_dir();
    let store = open_test_store(&dir).await;

    let post = create_post(
        &store,
        CreatePostOptions {
            title: "Gallery".to_string(),
            gallery_images: Some(vec![GalleryImageInput {
                url: "https://img/a.png".to_string(),
                alt_text: None,
            }]),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    update_post(
        &store,
        &post.id,
        UpdatePostOptions {
            body: Some("edited".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(list_gallery_images(&store, &post.id).await.unwrap().len(), 1);

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
async fn test_requested_slug_conflict_is_rejected() {
    let dir = create_test_dir();
    let store = open_test_store(&dir).await;

    create_post(
        &store,
        CreatePostOptions {
            title: "First".to_string(),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    let second = create_post(
        &store,
        CreatePostOptions {
            title: "Second".to_string(),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let err = update_post(
        &store,
        &second.id,
        UpdatePostOptions {
            slug: Some("first".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ContentError::SlugTaken(_)));

    // Requesting the slug it already holds is a no-op.
    let same = update_post(
        &store,
        &second.id,
        UpdatePostOptions {
            slug: Some("second".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(same.slug, "second");
}

#[tokio::test]
async fn test_title_change_recomputes_slug() {
    let dir = create_test_dir();
    let store = open_test_store(&dir).await;

    let post = create_post(
        &store,
        CreatePostOptions {
            title: "Old Title".to_string(),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let renamed = update_post(
        &store,
        &post.id,
        UpdatePostOptions {
            title: Some("New Title".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(renamed.slug, "new-title");

    // Re-saving the same title keeps the slug.
    let unchanged = update_post(
        &store,
        &post.id,
        UpdatePostOptions {
            title: Some("New Title".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(unchanged.slug, "new-title");
}

#[tokio::test]
async fn test_delete_removes_post_and_gallery() {
    let dir = create_test_dir();
    let store = open_test_store(&dir).await;

    let post = create_post(
        &store,
        CreatePostOptions {
            title: "Short lived".to_string(),
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

    // Deleting again reports not-found.
    assert!(matches!(
        delete_post(&store, &post.id).await.unwrap_err(),
        ContentError::NotFound { .. }
    ));
}
