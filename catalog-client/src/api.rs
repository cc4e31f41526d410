use crate::error::Result;
use async_trait::async_trait;
use climbate_protocol::Area;
use climbate_protocol::AreaDetail;
use climbate_protocol::AreaSearchHit;
use climbate_protocol::Coordinate;
use climbate_protocol::Crag;
use climbate_protocol::CragDetail;
use climbate_protocol::Forecast;

/// Typed view of the catalog service.
///
/// [`crate::CatalogClient`] talks HTTP; tests and alternative transports
/// implement this directly. Every call is a single request: no retries, no
/// caching.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// One page of the full crag listing, in server order. `page` is 1-based.
    async fn list_crags(&self, page: u32, per_page: u32) -> Result<Vec<Crag>>;

    async fn search_crags(&self, query: &str, limit: u32) -> Result<Vec<Crag>>;

    async fn nearby_crags(
        &self,
        origin: Coordinate,
        radius_km: f64,
        limit: u32,
    ) -> Result<Vec<Crag>>;

    async fn crag_detail(&self, crag_id: &str) -> Result<CragDetail>;

    async fn crag_forecast(&self, crag_id: &str, days: u32) -> Result<Forecast>;

    /// Areas directly under `parent_id`, or the top level when `None`.
    async fn list_areas(&self, parent_id: Option<&str>) -> Result<Vec<Area>>;

    /// The area itself with its precipitation summary and children.
    async fn area_detail(&self, area_id: &str) -> Result<AreaDetail>;

    async fn area_children(&self, area_id: &str) -> Result<Vec<Area>>;

    /// Path from the root down to and including `area_id`.
    async fn area_breadcrumb(&self, area_id: &str) -> Result<Vec<Area>>;

    async fn search_areas(&self, query: &str) -> Result<Vec<AreaSearchHit>>;
}
