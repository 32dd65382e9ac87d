//! Blog post CRUD, associations, and the owned image gallery.

mod crud;
mod types;

pub use crud::{
    create_post, delete_post, get_post, get_post_by_slug, list_gallery_images, list_posts,
    list_published_posts, update_post,
};
pub use types::{
    BlogPost, CreatePostOptions, GalleryImage, UpdatePostOptions, GALLERY_COLLECTION,
};
