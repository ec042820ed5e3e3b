//! Content component: blog posts with filter/sort/paginate, derived fields, soft delete.

use crate::error::{AppError, Resource};
use crate::models::{Post, PostInput, PostQuery};
use crate::response::Page;
use crate::service::pagination::PageRequest;
use crate::service::text;
use crate::service::validation::{non_empty, RequestValidator};
use crate::sql::{fetch_page, Filter, Sort};
use chrono::Utc;
use sqlx::PgPool;

const POST_COLUMNS: &str = "id, title, content, excerpt, slug, author, tags, cover_image, published, \
                            read_time, view_count, created_at, updated_at, deleted_at";
const SORTABLE: &[&str] = &["created_at", "updated_at", "view_count", "read_time"];
const SEARCHABLE: &[&str] = &["title", "content", "excerpt"];
pub const DEFAULT_PAGE_SIZE: u32 = 10;
const MAX_SLUG_ATTEMPTS: u32 = 50;
/// Name Postgres gives the UNIQUE constraint on `posts.slug`.
const SLUG_CONSTRAINT: &str = "posts_slug_key";

/// Who is listing: the public only ever sees published posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    Public,
    Admin,
}

/// A post identified either by numeric id or by slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostKey {
    Id(i64),
    Slug(String),
}

impl PostKey {
    pub fn parse(raw: &str) -> Self {
        match raw.parse::<i64>() {
            Ok(id) => PostKey::Id(id),
            Err(_) => PostKey::Slug(raw.to_string()),
        }
    }
}

/// Validated, normalized fields ready to write.
struct PostFields {
    title: String,
    content: String,
    excerpt: String,
    author: String,
    tags: Vec<String>,
    cover_image: String,
    published: bool,
    read_time: i32,
}

impl PostFields {
    fn from_input(input: &PostInput) -> Result<Self, AppError> {
        let title = RequestValidator::required_max("title", &input.title, 200)?;
        RequestValidator::required("content", &input.content)?;
        let content = input.content.as_str();
        let author = RequestValidator::required_max("author", &input.author, 100)?;
        let excerpt = match non_empty(input.excerpt.as_deref()) {
            Some(e) => {
                RequestValidator::max_length("excerpt", e, 500)?;
                e.to_string()
            }
            None => text::excerpt(content),
        };
        let cover_image = non_empty(input.cover_image.as_deref()).unwrap_or("");
        RequestValidator::max_length("coverImage", cover_image, 500)?;
        let tags: Vec<String> = input
            .tags
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect();
        Ok(PostFields {
            title: title.to_string(),
            content: content.to_string(),
            excerpt,
            author: author.to_string(),
            tags,
            cover_image: cover_image.to_string(),
            published: input.published,
            read_time: text::read_time(content),
        })
    }
}

#[derive(Clone)]
pub struct ContentService {
    pool: PgPool,
}

impl ContentService {
    pub fn new(pool: PgPool) -> Self {
        ContentService { pool }
    }

    pub async fn list(&self, query: &PostQuery, audience: Audience) -> Result<Page<Post>, AppError> {
        let page = PageRequest::new(query.page, query.limit, DEFAULT_PAGE_SIZE);
        let published = match audience {
            Audience::Public => true,
            Audience::Admin => query.published.unwrap_or(true),
        };
        let mut filter = Filter::new().raw("deleted_at IS NULL").eq("published", published);
        if let Some(search) = non_empty(query.search.as_deref()) {
            filter = filter.contains_any(SEARCHABLE, search);
        }
        if let Some(tag) = non_empty(query.tag.as_deref()) {
            filter = filter.array_has_ci("tags", tag);
        }
        if let Some(author) = non_empty(query.author.as_deref()) {
            filter = filter.contains_any(&["author"], author);
        }
        let sort = Sort::parse(query.sort.as_deref(), query.order.as_deref(), SORTABLE, "created_at");
        let (list, count) = filter.into_page_queries("posts", POST_COLUMNS, &sort, &page);
        let (rows, total) = fetch_page(&self.pool, &list, &count).await?;
        Ok(page.into_page(rows, total))
    }

    /// Soft-deleted posts, most recently deleted first.
    pub async fn list_deleted(&self, page: PageRequest) -> Result<Page<Post>, AppError> {
        let sort = Sort::desc("deleted_at");
        let (list, count) = Filter::new()
            .raw("deleted_at IS NOT NULL")
            .into_page_queries("posts", POST_COLUMNS, &sort, &page);
        let (rows, total) = fetch_page(&self.pool, &list, &count).await?;
        Ok(page.into_page(rows, total))
    }

    /// Public read of a published post; counts one view.
    pub async fn get_public(&self, key: &PostKey) -> Result<Post, AppError> {
        let sql = |column: &str| {
            format!(
                "UPDATE posts SET view_count = view_count + 1 \
                 WHERE {} = $1 AND published = TRUE AND deleted_at IS NULL RETURNING {}",
                column, POST_COLUMNS
            )
        };
        let post: Option<Post> = match key {
            PostKey::Id(id) => sqlx::query_as(&sql("id")).bind(*id).fetch_optional(&self.pool).await?,
            PostKey::Slug(slug) => sqlx::query_as(&sql("slug")).bind(slug.as_str()).fetch_optional(&self.pool).await?,
        };
        post.ok_or(AppError::NotFound(Resource::Post))
    }

    /// Admin read: drafts included, no view counted.
    pub async fn get_admin(&self, id: i64) -> Result<Post, AppError> {
        let post: Option<Post> = sqlx::query_as(&format!(
            "SELECT {} FROM posts WHERE id = $1 AND deleted_at IS NULL",
            POST_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        post.ok_or(AppError::NotFound(Resource::Post))
    }

    /// Insert with the first free slug. A candidate claimed by a concurrent insert moves on to the next one.
    pub async fn create(&self, input: &PostInput) -> Result<Post, AppError> {
        let fields = PostFields::from_input(input)?;
        let base = text::base_slug(&fields.title);
        for candidate in text::slug_candidates(&base, Utc::now().timestamp(), MAX_SLUG_ATTEMPTS) {
            if self.slug_taken(&candidate).await? {
                continue;
            }
            match self.insert(&fields, &candidate).await {
                Err(AppError::Conflict(constraint)) if constraint == SLUG_CONSTRAINT => {
                    tracing::debug!(slug = %candidate, "slug claimed concurrently");
                }
                other => return other,
            }
        }
        Err(AppError::Conflict(format!("could not find a free slug for '{}'", base)))
    }

    async fn insert(&self, fields: &PostFields, slug: &str) -> Result<Post, AppError> {
        let post: Post = sqlx::query_as(&format!(
            r#"
            INSERT INTO posts (title, content, excerpt, slug, author, tags, cover_image, published, read_time)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            POST_COLUMNS
        ))
        .bind(&fields.title)
        .bind(&fields.content)
        .bind(&fields.excerpt)
        .bind(slug)
        .bind(&fields.author)
        .bind(&fields.tags)
        .bind(&fields.cover_image)
        .bind(fields.published)
        .bind(fields.read_time)
        .fetch_one(&self.pool)
        .await?;
        Ok(post)
    }

    /// Full overwrite of the mutable fields. The slug is kept.
    pub async fn update(&self, id: i64, input: &PostInput) -> Result<Post, AppError> {
        let fields = PostFields::from_input(input)?;
        let post: Option<Post> = sqlx::query_as(&format!(
            r#"
            UPDATE posts SET
                title = $2, content = $3, excerpt = $4, author = $5, tags = $6,
                cover_image = $7, published = $8, read_time = $9, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING {}
            "#,
            POST_COLUMNS
        ))
        .bind(id)
        .bind(&fields.title)
        .bind(&fields.content)
        .bind(&fields.excerpt)
        .bind(&fields.author)
        .bind(&fields.tags)
        .bind(&fields.cover_image)
        .bind(fields.published)
        .bind(fields.read_time)
        .fetch_optional(&self.pool)
        .await?;
        let post = post.ok_or(AppError::NotFound(Resource::Post))?;
        tracing::info!(post_id = post.id, "post updated");
        Ok(post)
    }

    /// Soft delete: the row stays for audit but disappears from every other query.
    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE posts SET deleted_at = NOW(), updated_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(Resource::Post));
        }
        tracing::info!(post_id = id, "post soft-deleted");
        Ok(())
    }

    async fn slug_taken(&self, slug: &str) -> Result<bool, AppError> {
        let taken: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM posts WHERE slug = $1)")
            .bind(slug)
            .fetch_one(&self.pool)
            .await?;
        Ok(taken)
    }
}
