use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::jwt::Claims;

/// Coarse permission level carried inside a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PermissionTier {
    /// Every mutation on every resource.
    All,
    /// Article creation, plus update/delete of articles the principal authored.
    Articles,
}

impl PermissionTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionTier::All => "all",
            PermissionTier::Articles => "articles",
        }
    }
}

impl fmt::Display for PermissionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown permission tier: {0}")]
pub struct UnknownTier(pub String);

impl FromStr for PermissionTier {
    type Err = UnknownTier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(PermissionTier::All),
            "articles" => Ok(PermissionTier::Articles),
            other => Err(UnknownTier(other.to_string())),
        }
    }
}

/// Authenticated identity for the duration of one request.
///
/// Rebuilt from a verified token every time; never stored between requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub subject_id: String,
    pub username: String,
    pub permission: PermissionTier,
}

impl Principal {
    pub fn new(
        subject_id: impl Into<String>,
        username: impl Into<String>,
        permission: PermissionTier,
    ) -> Self {
        Self {
            subject_id: subject_id.into(),
            username: username.into(),
            permission,
        }
    }
}

impl From<Claims> for Principal {
    fn from(claims: Claims) -> Self {
        Self {
            subject_id: claims.sub,
            username: claims.username,
            permission: claims.permission,
        }
    }
}
