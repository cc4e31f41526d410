use crate::config::CatalogConfig;
use climbate_catalog_client::CatalogApi;
use climbate_catalog_client::CatalogError;
use climbate_catalog_client::Result;
use climbate_protocol::Crag;
use std::sync::Arc;
use tracing::debug;
use tracing::info;
use tracing::warn;

/// Pulls the complete crag listing one page at a time.
///
/// A page shorter than the page size marks the end. Any failing page fails
/// the whole fetch; partial listings are never returned.
pub struct PaginatedFetcher {
    catalog: Arc<dyn CatalogApi>,
    page_size: u32,
    max_pages: u32,
}

impl PaginatedFetcher {
    pub fn new(catalog: Arc<dyn CatalogApi>, config: &CatalogConfig) -> Self {
        Self::with_limits(catalog, config.page_size, config.max_pages)
    }

    pub fn with_limits(catalog: Arc<dyn CatalogApi>, page_size: u32, max_pages: u32) -> Self {
        Self {
            catalog,
            page_size: page_size.max(1),
            max_pages: max_pages.max(1),
        }
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub async fn fetch_all(&self) -> Result<Vec<Crag>> {
        let mut all = Vec::new();
        for page in 1..=self.max_pages {
            let batch = self
                .catalog
                .list_crags(page, self.page_size)
                .await
                .inspect_err(|err| warn!("listing page {page} failed: {err}"))?;
            let count = batch.len();
            all.extend(batch);
            debug!("listing page {page}: {count} items ({} total)", all.len());
            if count < self.page_size as usize {
                info!("fetched {} crags in {page} pages", all.len());
                return Ok(all);
            }
        }
        warn!(
            "listing still full after {} pages; giving up",
            self.max_pages
        );
        Err(CatalogError::PageLimitExceeded {
            max_pages: self.max_pages,
        })
    }
}
