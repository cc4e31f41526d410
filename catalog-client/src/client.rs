use crate::api::CatalogApi;
use crate::error::CatalogError;
use crate::error::Result;
use async_trait::async_trait;
use climbate_protocol::Area;
use climbate_protocol::AreaDetail;
use climbate_protocol::AreaSearchHit;
use climbate_protocol::Coordinate;
use climbate_protocol::Crag;
use climbate_protocol::CragDetail;
use climbate_protocol::Forecast;
use reqwest::header::ACCEPT;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderValue;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;
use tracing::warn;
use url::Url;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = concat!("climbate-client/", env!("CARGO_PKG_VERSION"));

#[derive(Clone, Debug)]
pub struct ClientOptions {
    pub base_url: String,
    pub timeout: Duration,
}

impl ClientOptions {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// HTTP implementation of [`CatalogApi`].
///
/// Cheap to clone; construct once at startup and hand clones (or an
/// `Arc<dyn CatalogApi>`) to whoever needs it.
#[derive(Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: Url,
}

impl CatalogClient {
    pub fn new(opts: ClientOptions) -> Result<Self> {
        let mut base_url = Url::parse(&opts.base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(CatalogError::InvalidUrl(format!(
                "{} cannot be used as a base url",
                opts.base_url
            )));
        }
        // Url::join semantics differ with and without a trailing slash; we
        // only ever append segments, so normalise it away.
        if base_url.path().ends_with('/') {
            let trimmed = base_url.path().trim_end_matches('/').to_string();
            base_url.set_path(&trimmed);
        }
        let http = reqwest::Client::builder()
            .timeout(opts.timeout)
            .user_agent(USER_AGENT)
            .default_headers(default_headers())
            .build()?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| CatalogError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T>(&self, url: Url) -> Result<T>
    where
        T: DeserializeOwned,
    {
        debug!(%url, "catalog request");
        let resp = self.http.get(url.clone()).send().await.map_err(|err| {
            warn!(%url, "catalog request failed: {err}");
            CatalogError::from(err)
        })?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            warn!(%url, %status, "catalog request rejected");
            return Err(CatalogError::Status {
                status: status.as_u16(),
                body,
            });
        }
        let bytes = resp.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|err| {
            warn!(%url, "catalog response did not decode: {err}");
            CatalogError::from(err)
        })
    }
}

fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers
}

#[async_trait]
impl CatalogApi for CatalogClient {
    async fn list_crags(&self, page: u32, per_page: u32) -> Result<Vec<Crag>> {
        let mut url = self.endpoint(&["crags"])?;
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("per_page", &per_page.to_string());
        self.get_json(url).await
    }

    async fn search_crags(&self, query: &str, limit: u32) -> Result<Vec<Crag>> {
        let mut url = self.endpoint(&["crags", "search"])?;
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("limit", &limit.to_string());
        self.get_json(url).await
    }

    async fn nearby_crags(
        &self,
        origin: Coordinate,
        radius_km: f64,
        limit: u32,
    ) -> Result<Vec<Crag>> {
        let mut url = self.endpoint(&["crags", "nearby"])?;
        url.query_pairs_mut()
            .append_pair("lat", &origin.latitude.to_string())
            .append_pair("lon", &origin.longitude.to_string())
            .append_pair("radius_km", &radius_km.to_string())
            .append_pair("limit", &limit.to_string());
        self.get_json(url).await
    }

    async fn crag_detail(&self, crag_id: &str) -> Result<CragDetail> {
        let url = self.endpoint(&["crags", crag_id])?;
        self.get_json(url).await
    }

    async fn crag_forecast(&self, crag_id: &str, days: u32) -> Result<Forecast> {
        let mut url = self.endpoint(&["crags", crag_id, "forecast"])?;
        url.query_pairs_mut().append_pair("days", &days.to_string());
        self.get_json(url).await
    }

    async fn list_areas(&self, parent_id: Option<&str>) -> Result<Vec<Area>> {
        let mut url = self.endpoint(&["areas"])?;
        if let Some(parent_id) = parent_id {
            url.query_pairs_mut().append_pair("parent_id", parent_id);
        }
        self.get_json(url).await
    }

    async fn area_detail(&self, area_id: &str) -> Result<AreaDetail> {
        let url = self.endpoint(&["areas", area_id])?;
        self.get_json(url).await
    }

    async fn area_children(&self, area_id: &str) -> Result<Vec<Area>> {
        let url = self.endpoint(&["areas", area_id, "children"])?;
        self.get_json(url).await
    }

    async fn area_breadcrumb(&self, area_id: &str) -> Result<Vec<Area>> {
        let url = self.endpoint(&["areas", area_id, "breadcrumb"])?;
        self.get_json(url).await
    }

    async fn search_areas(&self, query: &str) -> Result<Vec<AreaSearchHit>> {
        let mut url = self.endpoint(&["areas", "search"])?;
        url.query_pairs_mut().append_pair("q", query);
        self.get_json(url).await
    }
}
