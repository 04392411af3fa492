#![allow(dead_code)]

use std::path::Path;

use anyhow::{Context, Result};
use axum::body::{self, Body};
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use serde_json::Value;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::SqlitePool;
use tempfile::TempDir;
use tower::util::ServiceExt; // for `oneshot`

use resetpower_api::authz::PermissionTier;
use resetpower_api::headers::CorsConfig;
use resetpower_api::jwt::{JwtConfig, TokenIdentity};
use resetpower_api::utils::hash_password;
use resetpower_api::{create_app_with_config, AppConfig};

pub const SECRET: &str = "integration-secret";
pub const PROD_ORIGIN: &str = "https://resetpower.moe";

pub struct TestApp {
    pub app: Router,
    pub pool: SqlitePool,
    pub jwt: JwtConfig,
    // keeps the sqlite file alive for the duration of the test
    _dir: TempDir,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Value,
}

impl TestApp {
    pub async fn new() -> Result<Self> {
        Self::with_config(|config| config).await
    }

    pub async fn with_config(customize: impl FnOnce(AppConfig) -> AppConfig) -> Result<Self> {
        let dir = tempfile::tempdir().context("failed to create tempdir")?;
        let opts = SqliteConnectOptions::new()
            .filename(dir.path().join("test.db"))
            .create_if_missing(true);
        let pool = SqlitePool::connect_with(opts).await?;

        let migrator = sqlx::migrate::Migrator::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("migrations")).await?;
        migrator.run(&pool).await?;

        let jwt = JwtConfig::new(SECRET);
        let config = customize(AppConfig::new(jwt.clone(), CorsConfig::new(PROD_ORIGIN)));
        let app = create_app_with_config(pool.clone(), config).await?;

        Ok(Self {
            app,
            pool,
            jwt,
            _dir: dir,
        })
    }

    pub async fn seed_user(&self, name: &str, password: &str, permission: PermissionTier) -> Result<String> {
        let id = format!("user-{name}");
        sqlx::query("INSERT INTO users (id, name, password_hash, permission) VALUES (?, ?, ?, ?)")
            .bind(&id)
            .bind(name)
            .bind(hash_password(password))
            .bind(permission.as_str())
            .execute(&self.pool)
            .await?;
        Ok(id)
    }

    /// Token signed directly, without going through the login endpoint.
    pub fn token_for(&self, name: &str, permission: PermissionTier) -> Result<String> {
        Ok(self
            .jwt
            .sign(&TokenIdentity::new(format!("user-{name}"), name, permission))?)
    }

    pub async fn seed_article(&self, id: &str, slug: &str, author: &str, created_at: i64) -> Result<()> {
        sqlx::query(
            "INSERT INTO articles (id, title, slug, summary, content, tags, created_at, author, disclosure) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(format!("Title {slug}"))
        .bind(slug)
        .bind("summary")
        .bind("content")
        .bind("rust; web")
        .bind(created_at)
        .bind(author)
        .bind("")
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn send(&self, req: Request<Body>) -> Result<Response> {
        Ok(self.app.clone().oneshot(req).await?)
    }

    pub async fn call(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Result<TestResponse> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        let req = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))?,
            None => builder.body(Body::empty())?,
        };

        read(self.send(req).await?).await
    }
}

pub async fn read(resp: Response) -> Result<TestResponse> {
    let status = resp.status();
    let headers = resp.headers().clone();
    let bytes = body::to_bytes(resp.into_body(), 10_485_760).await?;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .with_context(|| format!("non-JSON body ({status}): {}", String::from_utf8_lossy(&bytes)))?
    };

    Ok(TestResponse { status, headers, body })
}

pub fn header<'a>(resp: &'a TestResponse, name: &str) -> Option<&'a str> {
    resp.headers.get(name).and_then(|value| value.to_str().ok())
}
