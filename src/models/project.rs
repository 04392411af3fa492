use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::utils::split_tags;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub tags: Vec<String>,
    pub link: String,
    pub link_demo: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct DbProject {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub tags: String,
    pub link: String,
    pub link_demo: Option<String>,
}

impl From<DbProject> for Project {
    fn from(value: DbProject) -> Self {
        Project {
            tags: split_tags(&value.tags),
            id: value.id,
            name: value.name,
            description: value.description,
            link: value.link,
            link_demo: value.link_demo,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProjectListResponse {
    pub projects: Vec<Project>,
}

/// Body for both create and update.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ProjectInput {
    #[schema(example = "resetpower.moe")]
    pub name: String,
    #[schema(example = "Personal site and API.")]
    pub description: String,
    #[schema(example = "rust;axum")]
    pub tags: String,
    #[schema(example = "https://github.com/example/site")]
    pub link: String,
    pub link_demo: Option<String>,
}
