use std::sync::Arc;

use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};

use crate::core::middleware::basic_auth_middleware;
use crate::features::categories::handlers;
use crate::features::categories::services::CategoryService;
use crate::shared::constants::ADMIN_REALM;

/// Create routes for the categories feature
///
/// Note: This feature is public (no authentication required)
pub fn routes(service: Arc<CategoryService>) -> Router {
    Router::new()
        .route("/api/categories", get(handlers::list_categories))
        .route("/api/categories/{slug}", get(handlers::get_category))
        .with_state(service)
}

/// Admin routes, nested under `/api/admin`
///
/// Guarded by basic auth when `credentials` are configured.
pub fn admin_routes(service: Arc<CategoryService>, credentials: Option<String>) -> Router {
    let router = Router::new()
        .route("/categories", get(handlers::admin_list_categories))
        .route("/categories/refresh", post(handlers::refresh_categories))
        .with_state(service);

    match credentials {
        Some(credentials) => router.layer(from_fn(basic_auth_middleware(
            ADMIN_REALM,
            Arc::new(credentials),
        ))),
        None => router,
    }
}
