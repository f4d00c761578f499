use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::features::categories::models::CategoryRecord;

/// Category with its ordered subtree
///
/// Serializes as the flat record plus a `children` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(no_recursion)]
pub struct CategoryNode {
    #[serde(flatten)]
    pub category: CategoryRecord,
    pub children: Vec<CategoryNode>,
}

impl CategoryNode {
    /// Node without children
    pub fn leaf(category: CategoryRecord) -> Self {
        Self {
            category,
            children: Vec::new(),
        }
    }
}

// =============================================================================
// ADMIN LISTING
// =============================================================================

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Sort fields for the admin category screen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CategorySortBy {
    Name,
    #[default]
    SortOrder,
    IsActive,
}

/// Query params for the admin category list
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct AdminCategoryQuery {
    /// Search in name or slug. A non-blank term switches to the flat view.
    pub search: Option<String>,
    /// Sort by field (default: sort_order)
    #[serde(default)]
    pub sort_by: CategorySortBy,
    /// Sort direction (default: asc)
    #[serde(default)]
    pub sort: SortDirection,
    /// Filter by active flag
    pub is_active: Option<bool>,
}

impl AdminCategoryQuery {
    /// Trimmed search term, `None` when blank
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// How the admin listing is shaped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CategoryView {
    /// Sorted forest
    Tree,
    /// Search hits across the whole hierarchy, each without children
    Flat,
}

/// Response DTO for the admin category list
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AdminCategoryListDto {
    pub view: CategoryView,
    pub items: Vec<CategoryNode>,
}
