use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Entry of the link exchange ("friends") list.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Link {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub avatar: String,
    pub link: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LinkListResponse {
    pub links: Vec<Link>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LinkInput {
    #[schema(example = "Ada")]
    pub name: String,
    #[schema(example = "Notes on engines.")]
    pub description: String,
    #[schema(example = "https://example.com/avatar.png")]
    pub avatar: String,
    #[schema(example = "https://example.com")]
    pub link: String,
}
