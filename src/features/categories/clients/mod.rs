mod catalog_client;

use async_trait::async_trait;

use crate::core::error::Result;
use crate::features::categories::models::CategoryRecord;

pub use catalog_client::CatalogApiClient;

/// Source of the flat category list
#[async_trait]
pub trait CategorySource: Send + Sync {
    async fn fetch_categories(&self) -> Result<Vec<CategoryRecord>>;
}
