/// OpenAPI documentation for the Quill blog service
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Quill Blog Service API",
        version = "1.0.0",
        description = "Blogging backend: authors publish posts, organize them into groups, comment on each other's posts and follow other authors. Serves the paginated global, group, profile and following feeds.",
        contact(
            name = "Quill Team",
            email = "team@quill.dev"
        ),
        license(
            name = "MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Development server"),
    ),
    tags(
        (name = "health", description = "Service health checks"),
        (name = "feed", description = "Global, group and following feeds"),
        (name = "posts", description = "Post creation, viewing, and guarded editing"),
        (name = "comments", description = "Comments on posts"),
        (name = "profile", description = "Author profiles and follow relationships"),
    ),
    modifiers(&SecurityAddon),
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer token from the identity provider"))
                        .build(),
                ),
            )
        }
    }
}
