use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::categories::{
    dtos as categories_dtos, handlers as categories_handlers, models as categories_models,
};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Categories (public)
        categories_handlers::list_categories,
        categories_handlers::get_category,
        // Categories (admin)
        categories_handlers::admin_list_categories,
        categories_handlers::refresh_categories,
    ),
    components(
        schemas(
            Meta,
            categories_models::CategoryRecord,
            categories_dtos::CategoryNode,
            categories_dtos::CategoryView,
            categories_dtos::CategorySortBy,
            categories_dtos::SortDirection,
            categories_dtos::AdminCategoryListDto,
            categories_handlers::CategoryListing,
            ApiResponse<categories_handlers::CategoryListing>,
            ApiResponse<categories_dtos::CategoryNode>,
            ApiResponse<categories_dtos::AdminCategoryListDto>,
        )
    ),
    tags(
        (name = "categories", description = "Storefront category navigation (public)"),
        (name = "admin", description = "Category management listing (admin)"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Storefront Catalog API",
        version = "0.1.0",
        description = "Category navigation and admin listing for the storefront",
    )
)]
pub struct ApiDoc;

/// Adds the HTTP basic security scheme used by admin routes
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "basic_auth",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Basic).build()),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
