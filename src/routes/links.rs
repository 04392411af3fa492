use std::sync::OnceLock;

use axum::body::Body;
use axum::extract::Request;
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use regex::Regex;

use crate::app::AppState;
use crate::authz::{require_auth, require_permission, PermissionTier};
use crate::errors::{AppError, AppResult};
use crate::models::link::{Link, LinkInput, LinkListResponse};
use crate::models::SuccessResponse;
use crate::routes::read_input;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkRoute {
    List,
    Create,
    /// `None` when the digits overflow `i64`; no row can have that id.
    Update(Option<i64>),
    Delete(Option<i64>),
}

fn id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^/api/links/([0-9]+)$").expect("link id pattern"))
}

pub fn match_route(method: &Method, path: &str) -> Option<LinkRoute> {
    match (method, path) {
        (&Method::GET, "/api/links/list") => return Some(LinkRoute::List),
        (&Method::POST, "/api/links") => return Some(LinkRoute::Create),
        _ => {}
    }

    let id: Option<i64> = id_pattern().captures(path)?[1].parse().ok();
    if *method == Method::PUT {
        return Some(LinkRoute::Update(id));
    }
    if *method == Method::DELETE {
        return Some(LinkRoute::Delete(id));
    }

    None
}

pub async fn handle(route: LinkRoute, state: &AppState, request: Request) -> AppResult<Response> {
    let (parts, body) = request.into_parts();

    let response = match route {
        LinkRoute::List => list_links(state).await?.into_response(),
        LinkRoute::Create => create_link(state, &parts.headers, body).await?.into_response(),
        LinkRoute::Update(id) => update_link(state, &parts.headers, id, body).await?.into_response(),
        LinkRoute::Delete(id) => delete_link(state, &parts.headers, id).await?.into_response(),
    };

    Ok(response)
}

#[utoipa::path(
    get,
    path = "/api/links/list",
    tag = "Links",
    responses((status = 200, description = "Link exchange entries", body = LinkListResponse))
)]
pub async fn list_links(state: &AppState) -> AppResult<Json<LinkListResponse>> {
    let links = sqlx::query_as::<_, Link>("SELECT id, name, description, avatar, link FROM link_exchange")
        .fetch_all(&state.pool)
        .await?;

    Ok(Json(LinkListResponse { links }))
}

#[utoipa::path(
    post,
    path = "/api/links",
    tag = "Links",
    security(("bearerAuth" = [])),
    request_body = LinkInput,
    responses(
        (status = 201, description = "Link created", body = SuccessResponse),
        (status = 400, description = "Invalid JSON or missing fields"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    )
)]
pub async fn create_link(
    state: &AppState,
    headers: &HeaderMap,
    body: Body,
) -> AppResult<(StatusCode, Json<SuccessResponse>)> {
    let principal = require_auth(headers, &state.jwt)?;
    require_permission(&principal, PermissionTier::All)?;

    let payload: LinkInput = read_input(body).await?;

    let result = sqlx::query("INSERT INTO link_exchange (name, description, avatar, link) VALUES (?, ?, ?, ?)")
        .bind(&payload.name)
        .bind(&payload.description)
        .bind(&payload.avatar)
        .bind(&payload.link)
        .execute(&state.pool)
        .await?;

    tracing::info!(link = result.last_insert_rowid(), user = %principal.username, "link created");
    Ok((StatusCode::CREATED, Json(SuccessResponse::ok())))
}

#[utoipa::path(
    put,
    path = "/api/links/{id}",
    tag = "Links",
    security(("bearerAuth" = [])),
    params(("id" = i64, Path, description = "Link id")),
    request_body = LinkInput,
    responses(
        (status = 200, description = "Link updated", body = SuccessResponse),
        (status = 400, description = "Invalid JSON or missing fields"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_link(
    state: &AppState,
    headers: &HeaderMap,
    id: Option<i64>,
    body: Body,
) -> AppResult<Json<SuccessResponse>> {
    let principal = require_auth(headers, &state.jwt)?;
    require_permission(&principal, PermissionTier::All)?;

    let payload: LinkInput = read_input(body).await?;
    let id = id.ok_or_else(|| AppError::not_found("Not found"))?;

    let result = sqlx::query("UPDATE link_exchange SET name = ?, description = ?, avatar = ?, link = ? WHERE id = ?")
        .bind(&payload.name)
        .bind(&payload.description)
        .bind(&payload.avatar)
        .bind(&payload.link)
        .bind(id)
        .execute(&state.pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Not found"));
    }

    tracing::info!(link = id, user = %principal.username, "link updated");
    Ok(Json(SuccessResponse::ok()))
}

#[utoipa::path(
    delete,
    path = "/api/links/{id}",
    tag = "Links",
    security(("bearerAuth" = [])),
    params(("id" = i64, Path, description = "Link id")),
    responses(
        (status = 200, description = "Link deleted", body = SuccessResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_link(state: &AppState, headers: &HeaderMap, id: Option<i64>) -> AppResult<Json<SuccessResponse>> {
    let principal = require_auth(headers, &state.jwt)?;
    require_permission(&principal, PermissionTier::All)?;
    let id = id.ok_or_else(|| AppError::not_found("Not found"))?;

    let result = sqlx::query("DELETE FROM link_exchange WHERE id = ?")
        .bind(id)
        .execute(&state.pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Not found"));
    }

    tracing::info!(link = id, user = %principal.username, "link deleted");
    Ok(Json(SuccessResponse::ok()))
}
