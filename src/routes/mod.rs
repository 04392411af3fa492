use axum::body::Body;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::errors::{AppError, AppResult};

pub mod articles;
pub mod auth;
pub mod links;
pub mod projects;

const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Read the request body as JSON. Unreadable or malformed bodies are `InvalidJson`.
pub(crate) async fn read_json(body: Body) -> AppResult<Value> {
    let bytes = axum::body::to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|_| AppError::InvalidJson)?;
    serde_json::from_slice(&bytes).map_err(|_| AppError::InvalidJson)
}

/// Shape-check a parsed body. Anything but an object with the expected string
/// fields fails with `err`.
pub(crate) fn validate_as<T: DeserializeOwned>(value: Value, err: fn() -> AppError) -> AppResult<T> {
    if !value.is_object() {
        return Err(err());
    }
    serde_path_to_error::deserialize(value).map_err(|rejection| {
        tracing::debug!(field = %rejection.path(), "request body rejected");
        err()
    })
}

pub(crate) async fn read_input<T: DeserializeOwned>(body: Body) -> AppResult<T> {
    validate_as(read_json(body).await?, AppError::missing_fields)
}
