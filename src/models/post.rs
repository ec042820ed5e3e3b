use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A blog post. `deleted_at` marks a soft delete and is never serialized.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub slug: String,
    pub author: String,
    pub tags: Vec<String>,
    pub cover_image: String,
    pub published: bool,
    pub read_time: i32,
    pub view_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip)]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Body for create and (full-overwrite) update.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub published: bool,
}

/// Query string for post listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    pub tag: Option<String>,
    pub author: Option<String>,
    pub published: Option<bool>,
    pub sort: Option<String>,
    pub order: Option<String>,
}
