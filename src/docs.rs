use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::authz::PermissionTier;
use crate::models;
use crate::routes;

#[derive(OpenApi)]
#[openapi(
	paths(
		routes::auth::authenticate,
		routes::auth::validate,
		routes::articles::list_articles,
		routes::articles::get_article_by_slug,
		routes::articles::get_article_by_id,
		routes::articles::create_article,
		routes::articles::update_article,
		routes::articles::delete_article,
		routes::projects::list_projects,
		routes::projects::create_project,
		routes::projects::update_project,
		routes::projects::delete_project,
		routes::links::list_links,
		routes::links::create_link,
		routes::links::update_link,
		routes::links::delete_link
	),
	components(
		schemas(
			PermissionTier,
			models::SuccessResponse,
			models::user::LoginRequest,
			models::user::TokenResponse,
			models::user::ValidateResponse,
			models::article::Article,
			models::article::ArticleDetail,
			models::article::ArticleListResponse,
			models::article::ArticleDetailResponse,
			models::article::ArticleCreateRequest,
			models::article::ArticleUpdateRequest,
			models::article::ArticleCreatedResponse,
			models::project::Project,
			models::project::ProjectListResponse,
			models::project::ProjectInput,
			models::link::Link,
			models::link::LinkListResponse,
			models::link::LinkInput
		)
	),
	modifiers(&SecurityAddon),
	tags(
		(name = "Auth", description = "Login and token validation"),
		(name = "Articles", description = "Blog articles"),
		(name = "Projects", description = "Portfolio projects"),
		(name = "Links", description = "Link exchange")
	)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
	fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
		let components = openapi.components.get_or_insert_with(Default::default);
		components.add_security_scheme(
			"bearerAuth",
			SecurityScheme::Http(
				HttpBuilder::new()
					.scheme(HttpAuthScheme::Bearer)
					.bearer_format("JWT")
					.build(),
			),
		);
	}
}

pub fn build_openapi() -> utoipa::openapi::OpenApi {
	ApiDoc::openapi()
}
