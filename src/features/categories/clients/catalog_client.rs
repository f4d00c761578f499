use async_trait::async_trait;
use serde::Deserialize;

use crate::core::config::CatalogConfig;
use crate::core::error::{AppError, Result};
use crate::features::categories::clients::CategorySource;
use crate::features::categories::models::CategoryRecord;

/// Category listing body: a bare array or wrapped in `data`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CategoryListBody {
    Bare(Vec<CategoryRecord>),
    Wrapped { data: Vec<CategoryRecord> },
}

impl CategoryListBody {
    fn into_records(self) -> Vec<CategoryRecord> {
        let mut records = match self {
            CategoryListBody::Bare(records) => records,
            CategoryListBody::Wrapped { data } => data,
        };
        records.iter_mut().for_each(CategoryRecord::strip_children);
        records
    }
}

/// HTTP client for the upstream catalog REST API
pub struct CatalogApiClient {
    client: reqwest::Client,
    categories_url: String,
}

impl CatalogApiClient {
    pub fn new(config: &CatalogConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("StorefrontCatalog/0.1")
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            categories_url: config.categories_url(),
        })
    }

    pub fn categories_url(&self) -> &str {
        &self.categories_url
    }
}

#[async_trait]
impl CategorySource for CatalogApiClient {
    async fn fetch_categories(&self) -> Result<Vec<CategoryRecord>> {
        tracing::debug!("Fetching categories from {}", self.categories_url);

        let response = self
            .client
            .get(&self.categories_url)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Catalog request failed: {:?}", e);
                AppError::ExternalServiceError(format!("Catalog request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Catalog API returned {}: {}", status, body);
            return Err(AppError::ExternalServiceError(format!(
                "Catalog API returned status {}",
                status
            )));
        }

        let body: CategoryListBody = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse catalog categories: {:?}", e);
            AppError::ExternalServiceError(format!("Invalid category payload: {}", e))
        })?;

        Ok(body.into_records())
    }
}
