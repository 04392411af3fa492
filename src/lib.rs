pub mod app;
pub mod assets;
pub mod authz;
pub mod config;
pub mod db;
pub mod docs;
pub mod errors;
pub mod headers;
pub mod jwt;
pub mod models;
pub mod router;
pub mod routes;
pub mod utils;

// Re-export commonly used items for tests
pub use app::{create_app, create_app_with_config};
pub use config::AppConfig;
