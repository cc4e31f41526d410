//! `climbate.toml` configuration.
//!
//! Every field has a default, so an empty file (or no file) is a valid
//! configuration. Values are checked once by [`ClimbateConfig::validate`]
//! when loaded; components trust them afterwards.

use crate::error::ClimbateErr;
use crate::error::Result;
use climbate_protocol::AdventureCategory;
use serde::Deserialize;
use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

pub const CONFIG_FILENAME: &str = "climbate.toml";
const DATA_DIR_NAME: &str = "climbate";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClimbateConfig {
    pub catalog: CatalogConfig,
    pub search: SearchConfig,
    pub discovery: DiscoveryConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Items requested per page when fetching the full listing.
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Upper bound on pages fetched before the listing is declared runaway.
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Queries shorter than this never reach the network.
    #[serde(default = "default_min_query_chars")]
    pub min_query_chars: usize,

    #[serde(default = "default_search_limit")]
    pub limit: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    #[serde(default = "default_radius_miles")]
    pub radius_miles: f64,

    #[serde(default = "default_per_category_limit")]
    pub per_category_limit: usize,

    /// Used to estimate travel time when routing fails.
    #[serde(default = "default_assumed_speed_mph")]
    pub assumed_speed_mph: f64,

    /// Cap on simultaneous routing requests.
    #[serde(default = "default_max_concurrent_routes")]
    pub max_concurrent_routes: usize,

    /// Limit on each place search and each routing request.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Categories searched through the place-search service.
    #[serde(default = "default_categories")]
    pub categories: Vec<CategoryQuery>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryQuery {
    pub category: AdventureCategory,
    pub keyword: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory for persisted state. Defaults to the platform data dir.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

fn default_base_url() -> String {
    "https://api.climbate.app".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_page_size() -> u32 {
    500
}

fn default_max_pages() -> u32 {
    1_000
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_min_query_chars() -> usize {
    2
}

fn default_search_limit() -> u32 {
    20
}

fn default_radius_miles() -> f64 {
    50.0
}

fn default_per_category_limit() -> usize {
    10
}

fn default_assumed_speed_mph() -> f64 {
    45.0
}

fn default_max_concurrent_routes() -> usize {
    4
}

fn default_categories() -> Vec<CategoryQuery> {
    [
        AdventureCategory::ClimbingGym,
        AdventureCategory::Hiking,
        AdventureCategory::Brewery,
    ]
    .into_iter()
    .filter_map(|category| {
        category.default_keyword().map(|keyword| CategoryQuery {
            category,
            keyword: keyword.to_string(),
        })
    })
    .collect()
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            page_size: default_page_size(),
            max_pages: default_max_pages(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            min_query_chars: default_min_query_chars(),
            limit: default_search_limit(),
        }
    }
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            radius_miles: default_radius_miles(),
            per_category_limit: default_per_category_limit(),
            assumed_speed_mph: default_assumed_speed_mph(),
            max_concurrent_routes: default_max_concurrent_routes(),
            request_timeout_secs: default_request_timeout_secs(),
            categories: default_categories(),
        }
    }
}

impl CatalogConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl SearchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl DiscoveryConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl StorageConfig {
    pub fn resolved_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.dir {
            return Ok(dir.clone());
        }
        dirs::data_dir()
            .map(|dir| dir.join(DATA_DIR_NAME))
            .ok_or_else(|| ClimbateErr::Config("no platform data directory available".to_string()))
    }
}

impl ClimbateConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|err| ClimbateErr::Config(format!("failed to read {}: {err}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Like [`ClimbateConfig::load`], but a missing file means defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)
            .map_err(|err| ClimbateErr::Config(format!("invalid configuration: {err}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |message: String| Err(ClimbateErr::Config(message));

        if self.catalog.page_size == 0 {
            return invalid("catalog.page_size must be > 0".to_string());
        }
        if self.catalog.max_pages == 0 {
            return invalid("catalog.max_pages must be > 0".to_string());
        }
        if self.catalog.request_timeout_secs == 0 {
            return invalid("catalog.request_timeout_secs must be > 0".to_string());
        }
        if self.search.min_query_chars == 0 {
            return invalid("search.min_query_chars must be > 0".to_string());
        }
        if !(self.discovery.radius_miles.is_finite() && self.discovery.radius_miles > 0.0) {
            return invalid(format!(
                "discovery.radius_miles must be > 0, got {}",
                self.discovery.radius_miles
            ));
        }
        if !(self.discovery.assumed_speed_mph.is_finite()
            && self.discovery.assumed_speed_mph > 0.0)
        {
            return invalid(format!(
                "discovery.assumed_speed_mph must be > 0, got {}",
                self.discovery.assumed_speed_mph
            ));
        }
        if self.discovery.max_concurrent_routes == 0 {
            return invalid("discovery.max_concurrent_routes must be > 0".to_string());
        }
        if self.discovery.request_timeout_secs == 0 {
            return invalid("discovery.request_timeout_secs must be > 0".to_string());
        }
        let mut seen = HashSet::new();
        for query in &self.discovery.categories {
            if query.category == AdventureCategory::SafeCrag {
                return invalid(
                    "discovery.categories cannot search safe_crag; it comes from saved crags"
                        .to_string(),
                );
            }
            if query.keyword.trim().is_empty() {
                return invalid(format!(
                    "discovery.categories entry for {} has an empty keyword",
                    query.category
                ));
            }
            if !seen.insert(query.category) {
                return invalid(format!(
                    "discovery.categories lists {} more than once",
                    query.category
                ));
            }
        }
        Ok(())
    }
}
