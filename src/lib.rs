pub mod author;
pub mod case_study;
pub mod category;
pub mod config;
pub mod content;
pub mod crypto;
pub mod industry;
pub mod lead;
pub mod logging;
pub mod post;
pub mod relations;
pub mod service;
pub mod setting;
pub mod slug;
pub mod store;
pub mod tag;
pub mod utils;

// Re-export commonly used types
pub use author::{
    create_author, delete_author, get_author, get_author_by_slug, list_authors, update_author,
    Author, CreateAuthorOptions, UpdateAuthorOptions,
};
pub use case_study::{
    create_case_study, delete_case_study, get_case_study, get_case_study_by_slug,
    list_case_studies, list_published_case_studies, update_case_study, CaseStudy,
    CreateCaseStudyOptions, UpdateCaseStudyOptions,
};
pub use category::{
    create_category, delete_category, get_category, get_category_by_slug, list_categories,
    update_category, Category, CreateCategoryOptions, UpdateCategoryOptions,
};
pub use config::CmsConfig;
pub use content::{ContentError, SluggedEntity};
pub use crypto::{CryptoError, SettingsCipher, KEY_ENV_VAR};
pub use industry::{
    create_industry, delete_industry, get_industry, get_industry_by_slug, list_industries,
    update_industry, CreateIndustryOptions, Industry, UpdateIndustryOptions,
};
pub use lead::{
    create_lead, delete_lead, get_lead, list_leads, update_lead_status, CreateLeadOptions, Lead,
    LeadStatus,
};
pub use logging::{init_logging, parse_rotation, LogConfig};
pub use post::{
    create_post, delete_post, get_post, get_post_by_slug, list_gallery_images, list_posts,
    list_published_posts, update_post, BlogPost, CreatePostOptions, GalleryImage,
    UpdatePostOptions,
};
pub use relations::{
    sync_associations, AssociationPayload, GalleryImageInput, ResolvedAssociations,
};
pub use service::{
    create_service, delete_service, get_service, get_service_by_slug, list_services,
    update_service, CreateServiceOptions, Service, UpdateServiceOptions,
};
pub use setting::{
    delete_setting, get_setting, get_settings, is_sensitive_key, save_settings, Setting,
    SettingEntry, SettingError, DECRYPTION_FAILED_SENTINEL, SENSITIVE_KEYS,
};
pub use slug::{resolve_unique_slug, slugify, validate_slug, MAX_SLUG_ATTEMPTS};
pub use store::{ContentStore, FileStore, MemoryStore, StoreError, WriteBatch, WriteOp};
pub use tag::{list_tags, upsert_tag, Tag};
