use std::path::Path;

use axum::body::Body;
use axum::extract::Request;
use axum::http::request::Parts;
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use tower::ServiceExt;
use tower_http::services::ServeDir;

/// Static SPA bundle served for every non-API path.
#[derive(Debug, Clone)]
pub struct StaticAssets {
    dir: ServeDir,
}

impl StaticAssets {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            dir: ServeDir::new(root),
        }
    }

    /// Serve the requested file; a miss is retried as `/` so client-side
    /// routes resolve to `index.html`.
    pub async fn serve(&self, request: Request) -> Response {
        let (parts, _body) = request.into_parts();

        let first = self.fetch(rebuild(&parts, parts.uri.clone())).await;
        if first.status() != StatusCode::NOT_FOUND {
            return first;
        }

        self.fetch(rebuild(&parts, Uri::from_static("/"))).await
    }

    async fn fetch(&self, request: Request) -> Response {
        match self.dir.clone().oneshot(request).await {
            Ok(response) => response.map(Body::new).into_response(),
            Err(never) => match never {},
        }
    }
}

fn rebuild(parts: &Parts, uri: Uri) -> Request {
    let mut request = Request::new(Body::empty());
    *request.method_mut() = parts.method.clone();
    *request.uri_mut() = uri;
    *request.headers_mut() = parts.headers.clone();
    request
}
