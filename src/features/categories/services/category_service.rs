use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use crate::core::error::{AppError, Result};
use crate::features::categories::clients::CategorySource;
use crate::features::categories::dtos::{
    AdminCategoryListDto, AdminCategoryQuery, CategoryNode, CategoryView,
};
use crate::features::categories::models::CategoryRecord;
use crate::features::categories::tree::{self, InactivePolicy};
use crate::shared::constants::MAX_SEARCH_LENGTH;

struct CachedCategories {
    records: Arc<Vec<CategoryRecord>>,
    fetched_at: Instant,
}

/// Service for category operations
///
/// Every view is derived from one flat snapshot of the upstream list, cached
/// for `cache_ttl`.
pub struct CategoryService {
    source: Arc<dyn CategorySource>,
    cache: RwLock<Option<CachedCategories>>,
    cache_ttl: Duration,
    inactive_policy: InactivePolicy,
}

impl CategoryService {
    pub fn new(
        source: Arc<dyn CategorySource>,
        cache_ttl: Duration,
        inactive_policy: InactivePolicy,
    ) -> Self {
        Self {
            source,
            cache: RwLock::new(None),
            cache_ttl,
            inactive_policy,
        }
    }

    /// List all active categories (flat list, default sibling order)
    pub async fn list(&self) -> Result<Vec<CategoryRecord>> {
        let records = self.records().await?;

        let mut active: Vec<CategoryRecord> =
            records.iter().filter(|c| c.is_active).cloned().collect();
        active.sort_by(tree::by_sort_order);

        Ok(active)
    }

    /// List all active categories as tree structure
    pub async fn list_tree(&self) -> Result<Vec<CategoryNode>> {
        let records = self.records().await?;
        let forest = tree::build_active_tree(&records, self.inactive_policy);

        tracing::debug!(
            "Built public category tree: roots={}, nodes={}, policy={:?}",
            forest.len(),
            tree::count_nodes(&forest),
            self.inactive_policy
        );

        Ok(forest)
    }

    /// Get an active category and its subtree by slug
    pub async fn get_by_slug(&self, slug: &str) -> Result<CategoryNode> {
        let forest = self.list_tree().await?;

        tree::find_by_slug(&forest, slug)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Category '{}' not found", slug)))
    }

    /// Admin listing: sorted tree, or flat search hits while searching
    ///
    /// Returns the listing and the number of categories it holds.
    pub async fn admin_list(
        &self,
        query: &AdminCategoryQuery,
    ) -> Result<(AdminCategoryListDto, usize)> {
        let term = query.search_term();
        if let Some(term) = term {
            if term.chars().count() > MAX_SEARCH_LENGTH {
                return Err(AppError::BadRequest(format!(
                    "Search term must be at most {} characters",
                    MAX_SEARCH_LENGTH
                )));
            }
        }

        let records = self.records().await?;
        let records: Vec<CategoryRecord> = match query.is_active {
            Some(flag) => records
                .iter()
                .filter(|c| c.is_active == flag)
                .cloned()
                .collect(),
            None => records.as_ref().clone(),
        };

        let compare = tree::comparator(query.sort_by, query.sort);

        let listing = match term {
            Some(term) => {
                let mut hits = tree::search(&records, term);
                hits.sort_by(&compare);
                tracing::debug!("Admin category search '{}': {} hits", term, hits.len());

                let total = hits.len();
                let items = hits.into_iter().map(CategoryNode::leaf).collect();
                (
                    AdminCategoryListDto {
                        view: CategoryView::Flat,
                        items,
                    },
                    total,
                )
            }
            None => (
                AdminCategoryListDto {
                    view: CategoryView::Tree,
                    items: tree::build_tree_by(&records, &compare),
                },
                records.len(),
            ),
        };

        Ok(listing)
    }

    /// Drop the cached snapshot so the next request refetches
    pub async fn invalidate(&self) {
        let mut cache = self.cache.write().await;
        *cache = None;
        tracing::info!("Category cache invalidated");
    }

    /// Flat snapshot, from cache while fresh
    ///
    /// Refreshes run under the write lock, so concurrent callers that find
    /// the cache stale wait for one upstream fetch instead of issuing their own.
    async fn records(&self) -> Result<Arc<Vec<CategoryRecord>>> {
        if self.cache_ttl.is_zero() {
            return self.fetch().await;
        }

        {
            let cache = self.cache.read().await;
            if let Some(records) = self.fresh(&cache) {
                return Ok(records);
            }
        }

        let mut cache = self.cache.write().await;
        // Another request may have refreshed while we waited for the lock
        if let Some(records) = self.fresh(&cache) {
            return Ok(records);
        }

        let records = self.fetch().await?;
        *cache = Some(CachedCategories {
            records: Arc::clone(&records),
            fetched_at: Instant::now(),
        });

        Ok(records)
    }

    fn fresh(&self, cache: &Option<CachedCategories>) -> Option<Arc<Vec<CategoryRecord>>> {
        cache
            .as_ref()
            .filter(|cached| cached.fetched_at.elapsed() < self.cache_ttl)
            .map(|cached| Arc::clone(&cached.records))
    }

    async fn fetch(&self) -> Result<Arc<Vec<CategoryRecord>>> {
        let records = self.source.fetch_categories().await?;
        tracing::info!("Fetched {} categories from catalog", records.len());
        Ok(Arc::new(records))
    }
}
