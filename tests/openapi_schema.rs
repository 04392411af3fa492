use serde_json::Value;

#[test]
fn openapi_lists_every_endpoint() -> anyhow::Result<()> {
    let doc = resetpower_api::docs::build_openapi();
    let v = serde_json::to_value(&doc)?;

    let paths = v
        .get("paths")
        .and_then(Value::as_object)
        .expect("paths must exist");

    let expected = [
        ("/api/authenticate", "post"),
        ("/api/validate", "get"),
        ("/api/articles/list", "get"),
        ("/api/articles", "post"),
        ("/api/articles/{slug}", "get"),
        ("/api/articles/id/{id}", "get"),
        ("/api/articles/id/{id}", "put"),
        ("/api/articles/id/{id}", "delete"),
        ("/api/projects/list", "get"),
        ("/api/projects", "post"),
        ("/api/projects/{id}", "put"),
        ("/api/projects/{id}", "delete"),
        ("/api/links/list", "get"),
        ("/api/links", "post"),
        ("/api/links/{id}", "put"),
        ("/api/links/{id}", "delete"),
    ];
    for (path, method) in expected {
        assert!(
            paths.get(path).and_then(|p| p.get(method)).is_some(),
            "OpenAPI missing {} {}",
            method,
            path
        );
    }

    Ok(())
}

#[test]
fn openapi_declares_bearer_scheme() -> anyhow::Result<()> {
    let v = serde_json::to_value(resetpower_api::docs::build_openapi())?;

    let scheme = v
        .pointer("/components/securitySchemes/bearerAuth")
        .expect("bearerAuth scheme must exist");
    assert_eq!(scheme.get("scheme").and_then(Value::as_str), Some("bearer"));

    let tier = v
        .pointer("/components/schemas/PermissionTier/enum")
        .and_then(Value::as_array)
        .expect("PermissionTier enum");
    assert_eq!(tier.len(), 2);
    Ok(())
}
