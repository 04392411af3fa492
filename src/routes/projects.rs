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
use crate::models::project::{DbProject, Project, ProjectInput, ProjectListResponse};
use crate::models::SuccessResponse;
use crate::routes::read_input;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectRoute {
    List,
    Create,
    /// `None` when the digits overflow `i64`; no row can have that id.
    Update(Option<i64>),
    Delete(Option<i64>),
}

fn id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^/api/projects/([0-9]+)$").expect("project id pattern"))
}

pub fn match_route(method: &Method, path: &str) -> Option<ProjectRoute> {
    match (method, path) {
        (&Method::GET, "/api/projects/list") => return Some(ProjectRoute::List),
        (&Method::POST, "/api/projects") => return Some(ProjectRoute::Create),
        _ => {}
    }

    let id: Option<i64> = id_pattern().captures(path)?[1].parse().ok();
    if *method == Method::PUT {
        return Some(ProjectRoute::Update(id));
    }
    if *method == Method::DELETE {
        return Some(ProjectRoute::Delete(id));
    }

    None
}

pub async fn handle(route: ProjectRoute, state: &AppState, request: Request) -> AppResult<Response> {
    let (parts, body) = request.into_parts();

    let response = match route {
        ProjectRoute::List => list_projects(state).await?.into_response(),
        ProjectRoute::Create => create_project(state, &parts.headers, body).await?.into_response(),
        ProjectRoute::Update(id) => update_project(state, &parts.headers, id, body).await?.into_response(),
        ProjectRoute::Delete(id) => delete_project(state, &parts.headers, id).await?.into_response(),
    };

    Ok(response)
}

#[utoipa::path(
    get,
    path = "/api/projects/list",
    tag = "Projects",
    responses((status = 200, description = "All projects", body = ProjectListResponse))
)]
pub async fn list_projects(state: &AppState) -> AppResult<Json<ProjectListResponse>> {
    let rows = sqlx::query_as::<_, DbProject>(
        "SELECT id, name, description, tags, link, link_demo FROM projects",
    )
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(ProjectListResponse {
        projects: rows.into_iter().map(Project::from).collect(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/projects",
    tag = "Projects",
    security(("bearerAuth" = [])),
    request_body = ProjectInput,
    responses(
        (status = 201, description = "Project created", body = SuccessResponse),
        (status = 400, description = "Invalid JSON or missing fields"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    )
)]
pub async fn create_project(
    state: &AppState,
    headers: &HeaderMap,
    body: Body,
) -> AppResult<(StatusCode, Json<SuccessResponse>)> {
    let principal = require_auth(headers, &state.jwt)?;
    require_permission(&principal, PermissionTier::All)?;

    let payload: ProjectInput = read_input(body).await?;

    let result = sqlx::query(
        "INSERT INTO projects (name, description, tags, link, link_demo) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&payload.name)
    .bind(&payload.description)
    .bind(&payload.tags)
    .bind(&payload.link)
    .bind(&payload.link_demo)
    .execute(&state.pool)
    .await?;

    tracing::info!(project = result.last_insert_rowid(), user = %principal.username, "project created");
    Ok((StatusCode::CREATED, Json(SuccessResponse::ok())))
}

#[utoipa::path(
    put,
    path = "/api/projects/{id}",
    tag = "Projects",
    security(("bearerAuth" = [])),
    params(("id" = i64, Path, description = "Project id")),
    request_body = ProjectInput,
    responses(
        (status = 200, description = "Project updated", body = SuccessResponse),
        (status = 400, description = "Invalid JSON or missing fields"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_project(
    state: &AppState,
    headers: &HeaderMap,
    id: Option<i64>,
    body: Body,
) -> AppResult<Json<SuccessResponse>> {
    let principal = require_auth(headers, &state.jwt)?;
    require_permission(&principal, PermissionTier::All)?;

    let payload: ProjectInput = read_input(body).await?;
    let id = id.ok_or_else(|| AppError::not_found("Not found"))?;

    let result = sqlx::query(
        "UPDATE projects SET name = ?, description = ?, tags = ?, link = ?, link_demo = ? WHERE id = ?",
    )
    .bind(&payload.name)
    .bind(&payload.description)
    .bind(&payload.tags)
    .bind(&payload.link)
    .bind(&payload.link_demo)
    .bind(id)
    .execute(&state.pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Not found"));
    }

    tracing::info!(project = id, user = %principal.username, "project updated");
    Ok(Json(SuccessResponse::ok()))
}

#[utoipa::path(
    delete,
    path = "/api/projects/{id}",
    tag = "Projects",
    security(("bearerAuth" = [])),
    params(("id" = i64, Path, description = "Project id")),
    responses(
        (status = 200, description = "Project deleted", body = SuccessResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_project(state: &AppState, headers: &HeaderMap, id: Option<i64>) -> AppResult<Json<SuccessResponse>> {
    let principal = require_auth(headers, &state.jwt)?;
    require_permission(&principal, PermissionTier::All)?;
    let id = id.ok_or_else(|| AppError::not_found("Not found"))?;

    let result = sqlx::query("DELETE FROM projects WHERE id = ?")
        .bind(id)
        .execute(&state.pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Not found"));
    }

    tracing::info!(project = id, user = %principal.username, "project deleted");
    Ok(Json(SuccessResponse::ok()))
}
