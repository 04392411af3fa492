//! Request dispatch.
//!
//! `OPTIONS` is answered as a CORS preflight whatever the path. Paths under
//! `/api/` are offered to each route group in [`RouteGroup::PROBE_ORDER`]; the
//! first group to claim `(method, path)` handles the request. Everything else
//! goes to the static asset bundle. Every response leaves through
//! [`SecurityHeaders::wrap`](crate::headers::SecurityHeaders::wrap) exactly once.

use axum::extract::{Request, State};
use axum::http::header::ORIGIN;
use axum::http::Method;
use axum::response::{IntoResponse, Response};

use crate::app::AppState;
use crate::errors::{AppError, AppResult};
use crate::routes::articles::{self, ArticleRoute};
use crate::routes::auth::{self, AuthRoute};
use crate::routes::links::{self, LinkRoute};
use crate::routes::projects::{self, ProjectRoute};

pub const API_PREFIX: &str = "/api/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteGroup {
    Auth,
    Articles,
    Projects,
    Links,
}

impl RouteGroup {
    pub const PROBE_ORDER: [RouteGroup; 4] = [
        RouteGroup::Auth,
        RouteGroup::Articles,
        RouteGroup::Projects,
        RouteGroup::Links,
    ];

    /// `None` means "not mine": the next group gets a look.
    pub fn claim(self, method: &Method, path: &str) -> Option<ApiRoute> {
        match self {
            RouteGroup::Auth => auth::match_route(method, path).map(ApiRoute::Auth),
            RouteGroup::Articles => articles::match_route(method, path).map(ApiRoute::Articles),
            RouteGroup::Projects => projects::match_route(method, path).map(ApiRoute::Projects),
            RouteGroup::Links => links::match_route(method, path).map(ApiRoute::Links),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiRoute {
    Auth(AuthRoute),
    Articles(ArticleRoute),
    Projects(ProjectRoute),
    Links(LinkRoute),
}

impl ApiRoute {
    pub async fn handle(self, state: &AppState, request: Request) -> AppResult<Response> {
        match self {
            ApiRoute::Auth(route) => auth::handle(route, state, request).await,
            ApiRoute::Articles(route) => articles::handle(route, state, request).await,
            ApiRoute::Projects(route) => projects::handle(route, state, request).await,
            ApiRoute::Links(route) => links::handle(route, state, request).await,
        }
    }
}

/// First claim in probe order.
pub fn resolve(method: &Method, path: &str) -> Option<ApiRoute> {
    RouteGroup::PROBE_ORDER
        .iter()
        .find_map(|group| group.claim(method, path))
}

pub async fn dispatch(State(state): State<AppState>, request: Request) -> Response {
    let origin = request
        .headers()
        .get(ORIGIN)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);

    if request.method() == Method::OPTIONS {
        return state.headers.preflight(origin.as_deref());
    }

    let response = if request.uri().path().starts_with(API_PREFIX) {
        match resolve(request.method(), request.uri().path()) {
            Some(route) => route
                .handle(&state, request)
                .await
                .unwrap_or_else(IntoResponse::into_response),
            None => AppError::not_found("Not found").into_response(),
        }
    } else {
        match &state.assets {
            Some(assets) => assets.serve(request).await,
            None => AppError::not_found("Not found").into_response(),
        }
    };

    state.headers.wrap(response, origin.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_order_is_fixed() {
        assert_eq!(
            RouteGroup::PROBE_ORDER,
            [RouteGroup::Auth, RouteGroup::Articles, RouteGroup::Projects, RouteGroup::Links]
        );
    }

    #[test]
    fn each_group_claims_its_paths() {
        assert_eq!(
            resolve(&Method::POST, "/api/authenticate"),
            Some(ApiRoute::Auth(AuthRoute::Authenticate))
        );
        assert_eq!(
            resolve(&Method::GET, "/api/articles/list"),
            Some(ApiRoute::Articles(ArticleRoute::List))
        );
        assert_eq!(
            resolve(&Method::DELETE, "/api/projects/4"),
            Some(ApiRoute::Projects(ProjectRoute::Delete(Some(4))))
        );
        assert_eq!(resolve(&Method::GET, "/api/links/list"), Some(ApiRoute::Links(LinkRoute::List)));
    }

    #[test]
    fn unclaimed_paths_resolve_to_nothing() {
        assert_eq!(resolve(&Method::GET, "/api/unknown"), None);
        assert_eq!(resolve(&Method::PATCH, "/api/articles/id/1"), None);
        assert_eq!(resolve(&Method::GET, "/api/projects/1"), None);
    }

    #[test]
    fn groups_decline_foreign_paths() {
        for group in RouteGroup::PROBE_ORDER {
            if group != RouteGroup::Auth {
                assert_eq!(group.claim(&Method::POST, "/api/authenticate"), None);
            }
        }
        assert_eq!(RouteGroup::Auth.claim(&Method::GET, "/api/articles/list"), None);
    }
}
