use std::sync::OnceLock;

use axum::body::Body;
use axum::extract::Request;
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use regex::Regex;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::app::AppState;
use crate::authz::{authorize, is_allowed, require_auth, Operation, Principal, Resource};
use crate::errors::{AppError, AppResult};
use crate::models::article::{
    Article, ArticleCreateRequest, ArticleCreatedResponse, ArticleDetail, ArticleDetailResponse,
    ArticleListResponse, ArticleUpdateRequest, DbArticle, DbArticleDetail,
};
use crate::models::SuccessResponse;
use crate::routes::read_input;
use crate::utils::epoch_now;

const ARTICLE_NOT_FOUND: &str = "Article not found";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArticleRoute {
    List,
    Create,
    GetById(String),
    UpdateById(String),
    DeleteById(String),
    GetBySlug(String),
}

fn id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^/api/articles/id/([^/]+)$").expect("article id pattern"))
}

fn slug_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^/api/articles/([^/]+)$").expect("article slug pattern"))
}

pub fn match_route(method: &Method, path: &str) -> Option<ArticleRoute> {
    match (method, path) {
        (&Method::GET, "/api/articles/list") => return Some(ArticleRoute::List),
        (&Method::POST, "/api/articles") => return Some(ArticleRoute::Create),
        _ => {}
    }

    if let Some(captures) = id_pattern().captures(path) {
        let id = captures[1].to_string();
        if *method == Method::GET {
            return Some(ArticleRoute::GetById(id));
        }
        if *method == Method::PUT {
            return Some(ArticleRoute::UpdateById(id));
        }
        if *method == Method::DELETE {
            return Some(ArticleRoute::DeleteById(id));
        }
    }

    if *method == Method::GET {
        if let Some(captures) = slug_pattern().captures(path) {
            return Some(ArticleRoute::GetBySlug(captures[1].to_string()));
        }
    }

    None
}

pub async fn handle(route: ArticleRoute, state: &AppState, request: Request) -> AppResult<Response> {
    let (parts, body) = request.into_parts();

    let response = match route {
        ArticleRoute::List => list_articles(state).await?.into_response(),
        ArticleRoute::GetBySlug(slug) => get_article_by_slug(state, &slug).await?.into_response(),
        ArticleRoute::GetById(id) => get_article_by_id(state, &id).await?.into_response(),
        ArticleRoute::Create => create_article(state, &parts.headers, body).await?.into_response(),
        ArticleRoute::UpdateById(id) => update_article(state, &parts.headers, &id, body).await?.into_response(),
        ArticleRoute::DeleteById(id) => delete_article(state, &parts.headers, &id).await?.into_response(),
    };

    Ok(response)
}

#[utoipa::path(
    get,
    path = "/api/articles/list",
    tag = "Articles",
    responses((status = 200, description = "All articles, newest first", body = ArticleListResponse))
)]
pub async fn list_articles(state: &AppState) -> AppResult<Json<ArticleListResponse>> {
    let rows = sqlx::query_as::<_, DbArticle>(
        "SELECT id, title, slug, summary, tags, created_at, author, disclosure FROM articles ORDER BY created_at DESC",
    )
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(ArticleListResponse {
        articles: rows.into_iter().map(Article::from).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/articles/{slug}",
    tag = "Articles",
    params(("slug" = String, Path, description = "Article slug")),
    responses(
        (status = 200, description = "Article detail", body = ArticleDetailResponse),
        (status = 404, description = "Article not found")
    )
)]
pub async fn get_article_by_slug(state: &AppState, slug: &str) -> AppResult<Json<ArticleDetailResponse>> {
    let row = sqlx::query_as::<_, DbArticleDetail>(
        "SELECT id, title, slug, content, summary, tags, created_at, author, disclosure FROM articles WHERE slug = ?",
    )
    .bind(slug)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| AppError::not_found(ARTICLE_NOT_FOUND))?;

    Ok(Json(ArticleDetailResponse {
        article: ArticleDetail::from(row),
    }))
}

#[utoipa::path(
    get,
    path = "/api/articles/id/{id}",
    tag = "Articles",
    params(("id" = String, Path, description = "Article id")),
    responses(
        (status = 200, description = "Article detail", body = ArticleDetailResponse),
        (status = 404, description = "Article not found")
    )
)]
pub async fn get_article_by_id(state: &AppState, id: &str) -> AppResult<Json<ArticleDetailResponse>> {
    let row = sqlx::query_as::<_, DbArticleDetail>(
        "SELECT id, title, slug, content, summary, tags, created_at, author, disclosure FROM articles WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| AppError::not_found(ARTICLE_NOT_FOUND))?;

    Ok(Json(ArticleDetailResponse {
        article: ArticleDetail::from(row),
    }))
}

#[utoipa::path(
    post,
    path = "/api/articles",
    tag = "Articles",
    security(("bearerAuth" = [])),
    request_body = ArticleCreateRequest,
    responses(
        (status = 201, description = "Article created", body = ArticleCreatedResponse),
        (status = 400, description = "Invalid JSON or missing fields"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 409, description = "Slug already exists")
    )
)]
pub async fn create_article(
    state: &AppState,
    headers: &HeaderMap,
    body: Body,
) -> AppResult<(StatusCode, Json<ArticleCreatedResponse>)> {
    let principal = require_auth(headers, &state.jwt)?;
    authorize(&principal, Operation::Create, Resource::Article { author: None })?;

    let payload: ArticleCreateRequest = read_input(body).await?;
    ensure_slug_available(&state.pool, &payload.slug).await?;

    let id = Uuid::new_v4().simple().to_string();

    sqlx::query(
        "INSERT INTO articles (id, title, slug, summary, content, tags, created_at, author, disclosure) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(&payload.title)
    .bind(&payload.slug)
    .bind(&payload.summary)
    .bind(&payload.content)
    .bind(&payload.tags)
    .bind(epoch_now())
    .bind(&principal.username)
    .bind(payload.disclosure.as_deref().unwrap_or(""))
    .execute(&state.pool)
    .await?;

    tracing::info!(article = %id, slug = %payload.slug, author = %principal.username, "article created");

    Ok((StatusCode::CREATED, Json(ArticleCreatedResponse { success: true, id })))
}

#[utoipa::path(
    put,
    path = "/api/articles/id/{id}",
    tag = "Articles",
    security(("bearerAuth" = [])),
    params(("id" = String, Path, description = "Article id")),
    request_body = ArticleUpdateRequest,
    responses(
        (status = 200, description = "Article updated", body = SuccessResponse),
        (status = 400, description = "Invalid JSON or missing fields"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_article(
    state: &AppState,
    headers: &HeaderMap,
    id: &str,
    body: Body,
) -> AppResult<Json<SuccessResponse>> {
    let principal = require_auth(headers, &state.jwt)?;
    let owner = authorize_article_mutation(&state.pool, &principal, id, Operation::Update).await?;

    let payload: ArticleUpdateRequest = read_input(body).await?;

    // slug is immutable; the ownership guard is re-applied in the statement itself
    let result = sqlx::query(
        "UPDATE articles SET title = ?, summary = ?, content = ?, tags = ?, disclosure = ? WHERE id = ? AND author = COALESCE(?, author)",
    )
    .bind(&payload.title)
    .bind(&payload.summary)
    .bind(&payload.content)
    .bind(&payload.tags)
    .bind(payload.disclosure.as_deref().unwrap_or(""))
    .bind(id)
    .bind(owner)
    .execute(&state.pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Not found"));
    }

    tracing::info!(article = %id, user = %principal.username, "article updated");
    Ok(Json(SuccessResponse::ok()))
}

#[utoipa::path(
    delete,
    path = "/api/articles/id/{id}",
    tag = "Articles",
    security(("bearerAuth" = [])),
    params(("id" = String, Path, description = "Article id")),
    responses(
        (status = 200, description = "Article deleted", body = SuccessResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_article(state: &AppState, headers: &HeaderMap, id: &str) -> AppResult<Json<SuccessResponse>> {
    let principal = require_auth(headers, &state.jwt)?;
    let owner = authorize_article_mutation(&state.pool, &principal, id, Operation::Delete).await?;

    let result = sqlx::query("DELETE FROM articles WHERE id = ? AND author = COALESCE(?, author)")
        .bind(id)
        .bind(owner)
        .execute(&state.pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Not found"));
    }

    tracing::info!(article = %id, user = %principal.username, "article deleted");
    Ok(Json(SuccessResponse::ok()))
}

/// Check an update/delete against the permission model.
///
/// Principals allowed unconditionally skip the lookup and get `None`. Scoped
/// principals need the stored author: a missing row is 404, a different author
/// is 403, and on success their username is returned as the statement guard.
async fn authorize_article_mutation<'p>(
    pool: &SqlitePool,
    principal: &'p Principal,
    id: &str,
    op: Operation,
) -> AppResult<Option<&'p str>> {
    if is_allowed(Some(principal), op, Resource::Article { author: None }) {
        return Ok(None);
    }

    let author: String = sqlx::query_scalar("SELECT author FROM articles WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::not_found("Not found"))?;

    authorize(principal, op, Resource::Article { author: Some(&author) })?;
    Ok(Some(principal.username.as_str()))
}

async fn ensure_slug_available(pool: &SqlitePool, slug: &str) -> AppResult<()> {
    let existing: Option<String> = sqlx::query_scalar("SELECT id FROM articles WHERE slug = ?")
        .bind(slug)
        .fetch_optional(pool)
        .await?;

    if existing.is_some() {
        return Err(AppError::conflict("Slug already exists"));
    }

    Ok(())
}
