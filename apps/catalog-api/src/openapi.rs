//! OpenAPI documentation configuration

use utoipa::OpenApi;

/// Combined OpenAPI documentation for Catalog API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Catalog API",
        version = "0.1.0",
        description = "Product category hierarchy management",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    nest(
        (path = "/api/categories", api = domain_categories::ApiDoc)
    ),
    tags(
        (name = "Categories", description = "Category hierarchy management")
    )
)]
pub struct ApiDoc;
