/*!
# Climbate core

Client-side engine behind the Climbate app: everything between the catalog
service and the screens.

- [`PaginatedFetcher`]: complete crag listing, page by page, all or nothing.
- [`HierarchyNavigator`]: lazy walk over the area tree with breadcrumbs.
- [`DebouncedSearch`]: search-as-you-type where only the latest query wins.
- [`SavedCatalog`]: the user's saved crags, persisted on every change.
- [`DiscoveryEngine`]: alternatives near a crag, ranked by travel time.

```text
UI intent
  ├─> PaginatedFetcher ─┐
  ├─> HierarchyNavigator ├─> CatalogApi (HTTP)
  ├─> DebouncedSearch ──┘
  ├─> DiscoveryEngine ─────> PlaceSearch / RoutingService
  └─> SavedCatalog ────────> KeyValueStore
```

[`Climbate`] wires the pieces from a [`ClimbateConfig`].
*/

pub mod config;
pub mod discovery;
mod error;
pub mod geo;
mod hierarchy;
mod pagination;
mod saved;
pub mod search;
pub mod storage;

pub use config::ClimbateConfig;
pub use discovery::Discovery;
pub use discovery::DiscoveryEngine;
pub use error::ClimbateErr;
pub use error::Result;
pub use hierarchy::Affordances;
pub use hierarchy::AreaRow;
pub use hierarchy::HierarchyNavigator;
pub use hierarchy::rows;
pub use pagination::PaginatedFetcher;
pub use saved::SAVED_CRAGS_KEY;
pub use saved::SavedCatalog;
pub use saved::SavedCatalogEvent;
pub use search::DebouncedSearch;
pub use search::SearchState;
pub use storage::JsonFileStore;
pub use storage::KeyValueStore;
pub use storage::MemoryStore;

use climbate_catalog_client::CatalogApi;
use climbate_catalog_client::CatalogClient;
use climbate_catalog_client::ClientOptions;
use discovery::PlaceSearch;
use discovery::RoutingService;
use search::AreaSearch;
use search::CragSearch;
use std::sync::Arc;
use tracing::info;

/// Shared handles for one app session.
pub struct Climbate {
    config: ClimbateConfig,
    catalog: Arc<dyn CatalogApi>,
    saved: Arc<SavedCatalog>,
}

impl Climbate {
    /// HTTP catalog client plus file-backed saved crags, both from `config`.
    pub fn from_config(config: ClimbateConfig) -> Result<Self> {
        config.validate()?;
        let mut options = ClientOptions::new(config.catalog.base_url.clone());
        options.timeout = config.catalog.request_timeout();
        let catalog = CatalogClient::new(options)?;

        let dir = config.storage.resolved_dir()?;
        info!("saved crags stored under {}", dir.display());
        let store = JsonFileStore::new(dir);
        Ok(Self::with_parts(config, Arc::new(catalog), Arc::new(store)))
    }

    pub fn with_parts(
        config: ClimbateConfig,
        catalog: Arc<dyn CatalogApi>,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        let saved = Arc::new(SavedCatalog::load(store));
        Self {
            config,
            catalog,
            saved,
        }
    }

    pub fn config(&self) -> &ClimbateConfig {
        &self.config
    }

    pub fn catalog(&self) -> Arc<dyn CatalogApi> {
        Arc::clone(&self.catalog)
    }

    pub fn saved(&self) -> Arc<SavedCatalog> {
        Arc::clone(&self.saved)
    }

    pub fn fetcher(&self) -> PaginatedFetcher {
        PaginatedFetcher::new(self.catalog(), &self.config.catalog)
    }

    pub fn navigator(&self) -> HierarchyNavigator {
        HierarchyNavigator::new(self.catalog())
    }

    pub fn crag_search(&self) -> DebouncedSearch<CragSearch> {
        DebouncedSearch::new(
            CragSearch::new(self.catalog(), self.config.search.limit),
            &self.config.search,
        )
    }

    pub fn area_search(&self) -> DebouncedSearch<AreaSearch> {
        DebouncedSearch::new(AreaSearch::new(self.catalog()), &self.config.search)
    }

    pub fn discovery(
        &self,
        places: Arc<dyn PlaceSearch>,
        routing: Arc<dyn RoutingService>,
    ) -> DiscoveryEngine {
        DiscoveryEngine::new(places, routing, self.config.discovery.clone())
    }
}
