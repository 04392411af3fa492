use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::utils::split_tags;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Article {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub summary: String,
    pub tags: Vec<String>,
    /// Unix epoch seconds.
    pub created_at: i64,
    pub author: String,
    pub disclosure: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ArticleDetail {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub summary: String,
    pub tags: Vec<String>,
    pub created_at: i64,
    pub author: String,
    pub disclosure: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct DbArticle {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub summary: String,
    pub tags: String,
    pub created_at: i64,
    pub author: String,
    pub disclosure: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct DbArticleDetail {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub summary: String,
    pub tags: String,
    pub created_at: i64,
    pub author: String,
    pub disclosure: String,
}

impl From<DbArticle> for Article {
    fn from(value: DbArticle) -> Self {
        Article {
            tags: split_tags(&value.tags),
            id: value.id,
            title: value.title,
            slug: value.slug,
            summary: value.summary,
            created_at: value.created_at,
            author: value.author,
            disclosure: value.disclosure,
        }
    }
}

impl From<DbArticleDetail> for ArticleDetail {
    fn from(value: DbArticleDetail) -> Self {
        ArticleDetail {
            tags: split_tags(&value.tags),
            id: value.id,
            title: value.title,
            slug: value.slug,
            content: value.content,
            summary: value.summary,
            created_at: value.created_at,
            author: value.author,
            disclosure: value.disclosure,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ArticleListResponse {
    pub articles: Vec<Article>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ArticleDetailResponse {
    pub article: ArticleDetail,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ArticleCreateRequest {
    #[schema(example = "Writing a token service")]
    pub title: String,
    #[schema(example = "writing-a-token-service")]
    pub slug: String,
    #[schema(example = "HMAC tokens from first principles.")]
    pub summary: String,
    #[schema(example = "# Intro\n...")]
    pub content: String,
    #[schema(example = "rust;security")]
    pub tags: String,
    pub disclosure: Option<String>,
}

/// Same as [`ArticleCreateRequest`] minus `slug`, which never changes after creation.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ArticleUpdateRequest {
    pub title: String,
    pub summary: String,
    pub content: String,
    pub tags: String,
    pub disclosure: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ArticleCreatedResponse {
    pub success: bool,
    pub id: String,
}
