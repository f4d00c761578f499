use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::core::error::Result;
use crate::features::categories::dtos::{AdminCategoryListDto, AdminCategoryQuery, CategoryNode};
use crate::features::categories::models::CategoryRecord;
use crate::features::categories::services::CategoryService;
use crate::features::categories::tree;
use crate::shared::types::{ApiResponse, Meta};

/// Query params for listing categories
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListCategoriesQuery {
    /// If true, return tree structure. Default: false (flat list)
    #[serde(default)]
    pub tree: bool,
}

/// Public category listing, flat or nested
#[derive(Debug, Serialize, ToSchema)]
#[serde(untagged)]
pub enum CategoryListing {
    Flat(Vec<CategoryRecord>),
    Tree(Vec<CategoryNode>),
}

/// List all active categories
///
/// Returns categories as flat list or tree structure based on `tree` query param.
#[utoipa::path(
    get,
    path = "/api/categories",
    params(ListCategoriesQuery),
    responses(
        (status = 200, description = "List of categories", body = ApiResponse<CategoryListing>),
        (status = 502, description = "Catalog API unavailable")
    ),
    tag = "categories"
)]
pub async fn list_categories(
    State(service): State<Arc<CategoryService>>,
    Query(query): Query<ListCategoriesQuery>,
) -> Result<Json<ApiResponse<CategoryListing>>> {
    let listing = if query.tree {
        CategoryListing::Tree(service.list_tree().await?)
    } else {
        CategoryListing::Flat(service.list().await?)
    };

    let total = match &listing {
        CategoryListing::Flat(items) => items.len(),
        CategoryListing::Tree(forest) => tree::count_nodes(forest),
    };

    Ok(Json(ApiResponse::success(
        Some(listing),
        None,
        Some(Meta::with_total(total)),
    )))
}

/// Get category by slug
///
/// Returns the category together with its active subtree.
#[utoipa::path(
    get,
    path = "/api/categories/{slug}",
    params(
        ("slug" = String, Path, description = "Category slug")
    ),
    responses(
        (status = 200, description = "Category found", body = ApiResponse<CategoryNode>),
        (status = 404, description = "Category not found")
    ),
    tag = "categories"
)]
pub async fn get_category(
    State(service): State<Arc<CategoryService>>,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<CategoryNode>>> {
    let category = service.get_by_slug(&slug).await?;
    Ok(Json(ApiResponse::success(Some(category), None, None)))
}

/// List categories for the admin screen
///
/// Sorted tree by default; a non-blank `search` returns matching categories as a flat list.
#[utoipa::path(
    get,
    path = "/api/admin/categories",
    params(AdminCategoryQuery),
    responses(
        (status = 200, description = "Category listing", body = ApiResponse<AdminCategoryListDto>),
        (status = 400, description = "Invalid query"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "admin",
    security(
        ("basic_auth" = [])
    )
)]
pub async fn admin_list_categories(
    State(service): State<Arc<CategoryService>>,
    Query(query): Query<AdminCategoryQuery>,
) -> Result<Json<ApiResponse<AdminCategoryListDto>>> {
    let (listing, total) = service.admin_list(&query).await?;

    Ok(Json(ApiResponse::success(
        Some(listing),
        None,
        Some(Meta::with_total(total)),
    )))
}

/// Drop the cached category list
#[utoipa::path(
    post,
    path = "/api/admin/categories/refresh",
    responses(
        (status = 200, description = "Cache invalidated"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "admin",
    security(
        ("basic_auth" = [])
    )
)]
pub async fn refresh_categories(
    State(service): State<Arc<CategoryService>>,
) -> Json<ApiResponse<()>> {
    service.invalidate().await;
    Json(ApiResponse::success(
        None,
        Some("Category cache invalidated".to_string()),
        None,
    ))
}
