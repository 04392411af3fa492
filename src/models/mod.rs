use serde::Serialize;
use utoipa::ToSchema;

pub mod article;
pub mod link;
pub mod project;
pub mod user;

/// `{ "success": true }` acknowledgement for mutations.
#[derive(Debug, Serialize, ToSchema)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}
