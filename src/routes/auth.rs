use axum::body::Body;
use axum::extract::Request;
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::app::AppState;
use crate::authz::{require_auth, PermissionTier, UnknownTier};
use crate::errors::{AppError, AppResult};
use crate::jwt::TokenIdentity;
use crate::models::user::{DbUser, LoginRequest, TokenResponse, ValidateResponse};
use crate::routes::{read_json, validate_as};
use crate::utils::verify_password;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthRoute {
    Authenticate,
    Validate,
}

pub fn match_route(method: &Method, path: &str) -> Option<AuthRoute> {
    match (method, path) {
        (&Method::POST, "/api/authenticate") => Some(AuthRoute::Authenticate),
        (&Method::GET, "/api/validate") => Some(AuthRoute::Validate),
        _ => None,
    }
}

pub async fn handle(route: AuthRoute, state: &AppState, request: Request) -> AppResult<Response> {
    match route {
        AuthRoute::Authenticate => authenticate(state, request.into_body())
            .await
            .map(IntoResponse::into_response),
        AuthRoute::Validate => Ok(validate(state, request.headers())),
    }
}

fn credentials_required() -> AppError {
    AppError::validation("username and password are required")
}

#[utoipa::path(
    post,
    path = "/api/authenticate",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 400, description = "Missing username or password"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn authenticate(state: &AppState, body: Body) -> AppResult<Json<TokenResponse>> {
    let payload: LoginRequest = validate_as(read_json(body).await?, credentials_required)?;

    let (username, password) = match (payload.username.as_deref(), payload.password.as_deref()) {
        (Some(username), Some(password)) if !username.is_empty() && !password.is_empty() => {
            (username, password)
        }
        _ => return Err(credentials_required()),
    };

    let user = sqlx::query_as::<_, DbUser>(
        "SELECT id, name, password_hash, permission FROM users WHERE name = ?",
    )
    .bind(username)
    .fetch_optional(&state.pool)
    .await?;

    let Some(user) = user else {
        tracing::warn!(user = %username, "login failed: unknown user");
        return Err(AppError::InvalidCredentials);
    };

    if !verify_password(password, &user.password_hash) {
        tracing::warn!(user = %username, "login failed: wrong password");
        return Err(AppError::InvalidCredentials);
    }

    let permission: PermissionTier = user
        .permission
        .parse()
        .map_err(|err: UnknownTier| AppError::internal(format!("user {}: {err}", user.id)))?;

    let token = state.jwt.sign(&TokenIdentity::new(user.id, user.name, permission))?;
    tracing::info!(user = %username, permission = %permission, "login succeeded");

    Ok(Json(TokenResponse { token }))
}

#[utoipa::path(
    get,
    path = "/api/validate",
    tag = "Auth",
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Token is valid", body = ValidateResponse),
        (status = 401, description = "Token missing, invalid or expired", body = ValidateResponse)
    )
)]
pub fn validate(state: &AppState, headers: &HeaderMap) -> Response {
    match require_auth(headers, &state.jwt) {
        Ok(principal) => Json(ValidateResponse {
            valid: true,
            username: Some(principal.username),
            permission: Some(principal.permission),
        })
        .into_response(),
        Err(_) => (StatusCode::UNAUTHORIZED, Json(ValidateResponse::invalid())).into_response(),
    }
}
