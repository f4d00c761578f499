#[cfg(test)]
use std::sync::atomic::{AtomicUsize, Ordering};
#[cfg(test)]
use std::time::Duration;

#[cfg(test)]
use async_trait::async_trait;

#[cfg(test)]
use crate::core::error::{AppError, Result};
#[cfg(test)]
use crate::features::categories::clients::CategorySource;
#[cfg(test)]
use crate::features::categories::models::CategoryRecord;

/// Active category with slug `cat-{id}`
#[cfg(test)]
pub fn category(id: i64, name: &str, parent_id: Option<i64>, sort_order: i32) -> CategoryRecord {
    CategoryRecord {
        id,
        name: name.to_string(),
        slug: format!("cat-{}", id),
        parent_id,
        sort_order,
        is_active: true,
        extra: Default::default(),
    }
}

/// In-memory category source that counts fetches
#[cfg(test)]
pub struct StaticCategorySource {
    records: Vec<CategoryRecord>,
    fail: bool,
    delay: Duration,
    fetches: AtomicUsize,
}

#[cfg(test)]
impl StaticCategorySource {
    pub fn new(records: Vec<CategoryRecord>) -> Self {
        Self {
            records,
            fail: false,
            delay: Duration::ZERO,
            fetches: AtomicUsize::new(0),
        }
    }

    /// Source whose every fetch fails like an unreachable upstream
    pub fn failing() -> Self {
        Self {
            records: Vec::new(),
            fail: true,
            delay: Duration::ZERO,
            fetches: AtomicUsize::new(0),
        }
    }

    /// Simulate upstream latency on every fetch
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
#[async_trait]
impl CategorySource for StaticCategorySource {
    async fn fetch_categories(&self) -> Result<Vec<CategoryRecord>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.fail {
            return Err(AppError::ExternalServiceError(
                "Catalog request failed: connection refused".to_string(),
            ));
        }
        Ok(self.records.clone())
    }
}
