use std::path::PathBuf;

use crate::errors::AppError;
use crate::headers::CorsConfig;
use crate::jwt::JwtConfig;

/// Runtime configuration injected into [`crate::app::AppState`].
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub jwt: JwtConfig,
    pub cors: CorsConfig,
    /// Built SPA bundle; non-API paths answer 404 when unset.
    pub assets_dir: Option<PathBuf>,
}

impl AppConfig {
    pub fn new(jwt: JwtConfig, cors: CorsConfig) -> Self {
        Self {
            jwt,
            cors,
            assets_dir: None,
        }
    }

    pub fn with_assets_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.assets_dir = Some(dir.into());
        self
    }

    pub fn from_env() -> Result<Self, AppError> {
        let assets_dir = std::env::var("ASSETS_DIR")
            .ok()
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from);

        Ok(Self {
            jwt: JwtConfig::from_env()?,
            cors: CorsConfig::from_env()?,
            assets_dir,
        })
    }
}
