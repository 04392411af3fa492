use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;

use super::evaluator::{is_allowed, Operation, Resource};
use super::principal::{PermissionTier, Principal};
use crate::errors::{AppError, AppResult};
use crate::jwt::JwtConfig;

const BEARER_PREFIX: &str = "Bearer ";

/// The raw token from an `Authorization: Bearer <token>` header, if present.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix(BEARER_PREFIX))
}

/// Resolve the request's principal from its bearer token.
///
/// Missing header, wrong scheme, bad signature and expiry all collapse to
/// `AppError::Unauthorized`.
pub fn require_auth(headers: &HeaderMap, jwt: &JwtConfig) -> AppResult<Principal> {
    let token = bearer_token(headers).ok_or(AppError::Unauthorized)?;

    match jwt.verify(token) {
        Some(claims) => Ok(Principal::from(claims)),
        None => {
            tracing::warn!("rejected bearer token");
            Err(AppError::Unauthorized)
        }
    }
}

/// Require an exact permission tier.
pub fn require_permission(principal: &Principal, tier: PermissionTier) -> AppResult<()> {
    if principal.permission != tier {
        tracing::debug!(
            user = %principal.username,
            permission = %principal.permission,
            required = %tier,
            "permission tier mismatch"
        );
        return Err(AppError::Forbidden);
    }
    Ok(())
}

/// `is_allowed` as an early-return check.
pub fn authorize(principal: &Principal, op: Operation, resource: Resource<'_>) -> AppResult<()> {
    if is_allowed(Some(principal), op, resource) {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}
