//! CORS and hardening headers applied to every outgoing response.

use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    ACCESS_CONTROL_MAX_AGE, CONTENT_SECURITY_POLICY, REFERRER_POLICY, X_CONTENT_TYPE_OPTIONS,
    X_FRAME_OPTIONS,
};
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::errors::AppError;

pub const DEFAULT_DEV_ORIGIN_PREFIX: &str = "http://localhost";
pub const DEFAULT_ALLOWED_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";

const ALLOWED_HEADERS: &str = "Content-Type, Authorization";
const MAX_AGE_SECONDS: &str = "86400";
const CSP: &str = "default-src 'self'; script-src 'self'; style-src 'self' 'unsafe-inline'; img-src 'self' data:; connect-src 'self'";

#[derive(Debug, Clone)]
pub struct CorsConfig {
    /// Production origin sent to every caller outside local development.
    pub allowed_origin: String,
    /// Request origins starting with this prefix are reflected back verbatim.
    pub dev_origin_prefix: Option<String>,
    pub allowed_methods: String,
}

impl CorsConfig {
    pub fn new(allowed_origin: impl Into<String>) -> Self {
        Self {
            allowed_origin: allowed_origin.into(),
            dev_origin_prefix: Some(DEFAULT_DEV_ORIGIN_PREFIX.to_string()),
            allowed_methods: DEFAULT_ALLOWED_METHODS.to_string(),
        }
    }

    pub fn with_dev_origin_prefix(mut self, prefix: Option<String>) -> Self {
        self.dev_origin_prefix = prefix;
        self
    }

    pub fn with_allowed_methods(mut self, methods: impl Into<String>) -> Self {
        self.allowed_methods = methods.into();
        self
    }

    pub fn from_env() -> Result<Self, AppError> {
        let allowed_origin =
            std::env::var("ALLOWED_ORIGIN").map_err(|_| AppError::configuration("ALLOWED_ORIGIN not set"))?;

        // An empty DEV_ORIGIN_PREFIX disables reflection entirely.
        let dev_origin_prefix = match std::env::var("DEV_ORIGIN_PREFIX") {
            Ok(prefix) if prefix.is_empty() => None,
            Ok(prefix) => Some(prefix),
            Err(_) => Some(DEFAULT_DEV_ORIGIN_PREFIX.to_string()),
        };

        Ok(Self::new(allowed_origin).with_dev_origin_prefix(dev_origin_prefix))
    }

    fn is_dev_origin(&self, origin: &str) -> bool {
        self.dev_origin_prefix
            .as_deref()
            .is_some_and(|prefix| origin.starts_with(prefix))
    }
}

#[derive(Debug, Clone)]
pub struct SecurityHeaders {
    config: CorsConfig,
    allowed_origin: HeaderValue,
    allowed_methods: HeaderValue,
}

impl SecurityHeaders {
    pub fn new(config: CorsConfig) -> Result<Self, AppError> {
        let allowed_origin = HeaderValue::from_str(&config.allowed_origin)
            .map_err(|_| AppError::configuration("ALLOWED_ORIGIN is not a valid header value"))?;
        let allowed_methods = HeaderValue::from_str(&config.allowed_methods)
            .map_err(|_| AppError::configuration("allowed methods is not a valid header value"))?;

        Ok(Self {
            config,
            allowed_origin,
            allowed_methods,
        })
    }

    fn allow_origin_for(&self, request_origin: Option<&str>) -> HeaderValue {
        match request_origin {
            Some(origin) if self.config.is_dev_origin(origin) => {
                HeaderValue::from_str(origin).unwrap_or_else(|_| self.allowed_origin.clone())
            }
            _ => self.allowed_origin.clone(),
        }
    }

    /// Set the CORS and hardening headers on `response`, overwriting any
    /// existing values for those names and keeping every other header.
    pub fn wrap(&self, mut response: Response, request_origin: Option<&str>) -> Response {
        let headers = response.headers_mut();

        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, self.allow_origin_for(request_origin));
        headers.insert(ACCESS_CONTROL_ALLOW_METHODS, self.allowed_methods.clone());
        headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static(ALLOWED_HEADERS));
        headers.insert(ACCESS_CONTROL_MAX_AGE, HeaderValue::from_static(MAX_AGE_SECONDS));

        headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
        headers.insert(X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
        headers.insert(REFERRER_POLICY, HeaderValue::from_static("strict-origin-when-cross-origin"));
        headers.insert(CONTENT_SECURITY_POLICY, HeaderValue::from_static(CSP));

        response
    }

    /// Empty 204 answer to a CORS preflight.
    pub fn preflight(&self, request_origin: Option<&str>) -> Response {
        self.wrap(StatusCode::NO_CONTENT.into_response(), request_origin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::CONTENT_TYPE;

    const PROD: &str = "https://resetpower.moe";

    fn headers() -> SecurityHeaders {
        SecurityHeaders::new(CorsConfig::new(PROD)).unwrap()
    }

    fn header<'a>(response: &'a Response, name: &str) -> &'a str {
        response.headers().get(name).unwrap().to_str().unwrap()
    }

    #[test]
    fn wrap_sets_full_header_set() {
        let response = headers().wrap(StatusCode::OK.into_response(), None);

        assert_eq!(header(&response, "access-control-allow-origin"), PROD);
        assert_eq!(
            header(&response, "access-control-allow-methods"),
            "GET, POST, PUT, DELETE, OPTIONS"
        );
        assert_eq!(header(&response, "access-control-allow-headers"), "Content-Type, Authorization");
        assert_eq!(header(&response, "access-control-max-age"), "86400");
        assert_eq!(header(&response, "x-content-type-options"), "nosniff");
        assert_eq!(header(&response, "x-frame-options"), "DENY");
        assert_eq!(header(&response, "referrer-policy"), "strict-origin-when-cross-origin");

        let csp = header(&response, "content-security-policy");
        assert!(csp.contains("default-src 'self'"));
        assert!(csp.contains("style-src 'self' 'unsafe-inline'"));
        assert!(csp.contains("img-src 'self' data:"));
        assert!(csp.contains("connect-src 'self'"));
    }

    #[test]
    fn dev_origin_is_reflected() {
        let response = headers().wrap(StatusCode::OK.into_response(), Some("http://localhost:5173"));
        assert_eq!(header(&response, "access-control-allow-origin"), "http://localhost:5173");
    }

    #[test]
    fn foreign_origin_gets_production_origin() {
        let response = headers().wrap(StatusCode::OK.into_response(), Some("https://evil.example"));
        assert_eq!(header(&response, "access-control-allow-origin"), PROD);
    }

    #[test]
    fn reflection_can_be_disabled() {
        let headers = SecurityHeaders::new(CorsConfig::new(PROD).with_dev_origin_prefix(None)).unwrap();
        let response = headers.wrap(StatusCode::OK.into_response(), Some("http://localhost:5173"));
        assert_eq!(header(&response, "access-control-allow-origin"), PROD);
    }

    #[test]
    fn existing_headers_are_kept_and_conflicts_overwritten() {
        let mut response = StatusCode::OK.into_response();
        response.headers_mut().insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        response.headers_mut().insert(X_FRAME_OPTIONS, HeaderValue::from_static("SAMEORIGIN"));

        let response = headers().wrap(response, None);
        assert_eq!(header(&response, "content-type"), "application/json");
        assert_eq!(header(&response, "x-frame-options"), "DENY");
        assert_eq!(response.headers().get_all(X_FRAME_OPTIONS).iter().count(), 1);
    }

    #[test]
    fn preflight_is_empty_204() {
        let response = headers().preflight(Some("http://localhost:3000"));
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(header(&response, "access-control-allow-origin"), "http://localhost:3000");
        assert!(response.headers().contains_key(ACCESS_CONTROL_ALLOW_METHODS));
        assert!(response.headers().contains_key(ACCESS_CONTROL_ALLOW_HEADERS));
    }

    #[test]
    fn allowed_methods_are_configurable() {
        let config = CorsConfig::new(PROD).with_allowed_methods("GET, POST, OPTIONS");
        let response = SecurityHeaders::new(config).unwrap().preflight(None);
        assert_eq!(header(&response, "access-control-allow-methods"), "GET, POST, OPTIONS");
    }

    #[test]
    fn invalid_origin_is_a_configuration_error() {
        let err = SecurityHeaders::new(CorsConfig::new("bad\norigin")).unwrap_err();
        assert!(matches!(err, AppError::Configuration(_)));
    }
}
