mod common;

use anyhow::Result;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use serde_json::json;

use common::{header, TestApp, PROD_ORIGIN};

#[tokio::test]
async fn preflight_answers_any_path() -> Result<()> {
    let t = TestApp::new().await?;

    for uri in ["/api/articles", "/api/does-not-exist", "/anything/at/all"] {
        let req = Request::builder().method("OPTIONS").uri(uri).body(Body::empty())?;
        let resp = common::read(t.send(req).await?).await?;

        assert_eq!(resp.status, StatusCode::NO_CONTENT, "{uri}");
        assert_eq!(header(&resp, "access-control-allow-origin"), Some(PROD_ORIGIN));
        assert_eq!(
            header(&resp, "access-control-allow-methods"),
            Some("GET, POST, PUT, DELETE, OPTIONS")
        );
        assert_eq!(header(&resp, "access-control-allow-headers"), Some("Content-Type, Authorization"));
        assert_eq!(header(&resp, "access-control-max-age"), Some("86400"));
    }
    Ok(())
}

#[tokio::test]
async fn dev_origin_is_reflected_and_other_origins_are_not() -> Result<()> {
    let t = TestApp::new().await?;

    let req = Request::builder()
        .method("GET")
        .uri("/api/articles/list")
        .header("origin", "http://localhost:5173")
        .body(Body::empty())?;
    let resp = common::read(t.send(req).await?).await?;
    assert_eq!(header(&resp, "access-control-allow-origin"), Some("http://localhost:5173"));

    let req = Request::builder()
        .method("GET")
        .uri("/api/articles/list")
        .header("origin", "https://evil.example")
        .body(Body::empty())?;
    let resp = common::read(t.send(req).await?).await?;
    assert_eq!(header(&resp, "access-control-allow-origin"), Some(PROD_ORIGIN));
    Ok(())
}

#[tokio::test]
async fn unknown_api_route_is_wrapped_404() -> Result<()> {
    let t = TestApp::new().await?;

    for (method, uri) in [
        (Method::GET, "/api/nothing"),
        (Method::PATCH, "/api/articles/id/a1"),
        (Method::GET, "/api/projects/1"),
        (Method::PUT, "/api/projects/not-a-number"),
    ] {
        let resp = t.call(method.clone(), uri, None, None).await?;
        assert_eq!(resp.status, StatusCode::NOT_FOUND, "{method} {uri}");
        assert_eq!(resp.body, json!({"error": "Not found"}));
        assert_eq!(header(&resp, "x-content-type-options"), Some("nosniff"));
        assert_eq!(header(&resp, "x-frame-options"), Some("DENY"));
    }
    Ok(())
}

#[tokio::test]
async fn non_api_path_without_assets_is_404() -> Result<()> {
    let t = TestApp::new().await?;

    let resp = t.call(Method::GET, "/blog/some-post", None, None).await?;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert_eq!(resp.body, json!({"error": "Not found"}));
    assert!(header(&resp, "content-security-policy").is_some());
    Ok(())
}

#[tokio::test]
async fn every_response_carries_hardening_headers() -> Result<()> {
    let t = TestApp::new().await?;

    let ok = t.call(Method::GET, "/api/links/list", None, None).await?;
    let denied = t.call(Method::POST, "/api/links", None, Some(json!({}))).await?;

    for resp in [&ok, &denied] {
        assert_eq!(header(resp, "referrer-policy"), Some("strict-origin-when-cross-origin"));
        assert_eq!(
            header(resp, "content-security-policy"),
            Some("default-src 'self'; script-src 'self'; style-src 'self' 'unsafe-inline'; img-src 'self' data:; connect-src 'self'")
        );
        assert_eq!(resp.headers.get_all("access-control-allow-origin").iter().count(), 1);
    }
    Ok(())
}

#[tokio::test]
async fn dev_prefix_is_a_plain_string_prefix() -> Result<()> {
    let t = TestApp::new().await?;

    let req = Request::builder()
        .method("GET")
        .uri("/api/links/list")
        .header("origin", "http://localhost.evil.example")
        .body(Body::empty())?;
    let resp = common::read(t.send(req).await?).await?;
    assert_eq!(header(&resp, "access-control-allow-origin"), Some("http://localhost.evil.example"));

    let strict = TestApp::with_config(|mut config| {
        config.cors = config.cors.with_dev_origin_prefix(Some("http://localhost:".to_string()));
        config
    })
    .await?;
    let req = Request::builder()
        .method("GET")
        .uri("/api/links/list")
        .header("origin", "http://localhost.evil.example")
        .body(Body::empty())?;
    let resp = common::read(strict.send(req).await?).await?;
    assert_eq!(header(&resp, "access-control-allow-origin"), Some(PROD_ORIGIN));
    Ok(())
}
