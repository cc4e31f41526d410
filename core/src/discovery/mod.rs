//! "What else can I do today" discovery.
//!
//! Two phases. First every configured category is searched concurrently
//! (saved crags are turned into adventures locally). Once all of those are
//! in, every adventure without a travel time is routed, a bounded number at
//! a time, falling back to a straight-line estimate when routing fails.
//! Each category is then ordered by travel time.

mod services;

pub use services::PlaceHit;
pub use services::PlaceSearch;
pub use services::RouteEstimate;
pub use services::RoutingService;
pub use services::ServiceError;

use crate::config::CategoryQuery;
use crate::config::DiscoveryConfig;
use crate::geo::estimate_minutes;
use crate::geo::haversine_miles;
use climbate_async_utils::CancelErr;
use climbate_async_utils::OrCancelExt;
use climbate_protocol::Adventure;
use climbate_protocol::AdventureCategory;
use climbate_protocol::Coordinate;
use climbate_protocol::Crag;
use climbate_protocol::TravelTimeSource;
use futures::StreamExt;
use futures::stream;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::task::JoinSet;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use tracing::info;
use tracing::warn;
use uuid::Uuid;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Discovery {
    pub by_category: BTreeMap<AdventureCategory, Vec<Adventure>>,
    /// Categories whose search failed. They are present in `by_category`
    /// with no results.
    pub failed_categories: Vec<AdventureCategory>,
}

impl Discovery {
    pub fn category(&self, category: AdventureCategory) -> &[Adventure] {
        self.by_category
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn total(&self) -> usize {
        self.by_category.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

pub struct DiscoveryEngine {
    places: Arc<dyn PlaceSearch>,
    routing: Arc<dyn RoutingService>,
    config: DiscoveryConfig,
}

struct Enrichment {
    minutes: u32,
    miles: f64,
    source: TravelTimeSource,
}

impl DiscoveryEngine {
    pub fn new(
        places: Arc<dyn PlaceSearch>,
        routing: Arc<dyn RoutingService>,
        config: DiscoveryConfig,
    ) -> Self {
        Self {
            places,
            routing,
            config,
        }
    }

    /// Find alternatives around `origin`. `known_good` becomes the safe-crag
    /// category as is; pass [`crate::SavedCatalog::safe_crags`] for the
    /// usual behavior.
    ///
    /// Individual search and routing failures never fail the call. Each
    /// request is held to `request_timeout_secs`, and one that runs over
    /// counts as failed. The only error is cancellation, which also aborts
    /// the outstanding searches.
    pub async fn discover(
        &self,
        origin: Coordinate,
        known_good: &[Crag],
        cancel: &CancellationToken,
    ) -> Result<Discovery, CancelErr> {
        let discovery = self.run(origin, known_good).or_cancel(cancel).await;
        if discovery.is_err() {
            info!("discovery cancelled");
        }
        discovery
    }

    async fn run(&self, origin: Coordinate, known_good: &[Crag]) -> Discovery {
        let mut discovery = self.search_categories(origin).await;
        discovery.by_category.insert(
            AdventureCategory::SafeCrag,
            known_good.iter().map(Adventure::from_crag).collect(),
        );

        self.enrich(origin, &mut discovery).await;

        for adventures in discovery.by_category.values_mut() {
            adventures.sort_by_key(|adventure| {
                (
                    adventure.travel_time_minutes.is_none(),
                    adventure.travel_time_minutes,
                )
            });
        }
        info!(
            "discovered {} adventures ({} categories failed)",
            discovery.total(),
            discovery.failed_categories.len()
        );
        discovery
    }

    async fn search_categories(&self, origin: Coordinate) -> Discovery {
        let mut searches = JoinSet::new();
        for (index, query) in self.config.categories.iter().cloned().enumerate() {
            let places = Arc::clone(&self.places);
            let radius = self.config.radius_miles;
            let limit = self.config.per_category_limit;
            let request_timeout = self.config.request_timeout();
            searches.spawn(async move {
                let outcome = timeout(
                    request_timeout,
                    places.search(origin, radius, &query.keyword, limit),
                )
                .await
                .unwrap_or(Err(ServiceError::TimedOut(request_timeout)));
                (index, query, outcome)
            });
        }

        let mut discovery = Discovery::default();
        for query in &self.config.categories {
            discovery.by_category.entry(query.category).or_default();
        }

        let mut found: Vec<(usize, CategoryQuery, Vec<PlaceHit>)> = Vec::new();
        while let Some(joined) = searches.join_next().await {
            match joined {
                Ok((index, query, Ok(hits))) => {
                    debug!(
                        category = %query.category,
                        "{} places for {:?}",
                        hits.len(),
                        query.keyword
                    );
                    found.push((index, query, hits));
                }
                Ok((_, query, Err(err))) => {
                    warn!(category = %query.category, "place search failed: {err}");
                    discovery.failed_categories.push(query.category);
                }
                Err(err) => warn!("place search task failed: {err}"),
            }
        }

        // A category listed twice only failed if none of its queries answered.
        discovery
            .failed_categories
            .retain(|category| !found.iter().any(|(_, query, _)| query.category == *category));
        found.sort_by_key(|(index, _, _)| *index);
        for (_, query, hits) in found {
            let adventures = discovery.by_category.entry(query.category).or_default();
            adventures.extend(
                hits.into_iter()
                    .take(self.config.per_category_limit)
                    .map(|hit| {
                        Adventure::from_place(
                            Uuid::new_v4().to_string(),
                            hit.name,
                            query.category,
                            hit.coordinate,
                        )
                    }),
            );
        }
        discovery.failed_categories.sort();
        discovery.failed_categories.dedup();
        discovery
    }

    async fn enrich(&self, origin: Coordinate, discovery: &mut Discovery) {
        let pending: Vec<(AdventureCategory, usize, Coordinate)> = discovery
            .by_category
            .iter()
            .flat_map(|(category, adventures)| {
                adventures
                    .iter()
                    .enumerate()
                    .filter(|(_, adventure)| adventure.needs_travel_time())
                    .map(move |(index, adventure)| (*category, index, adventure.coordinate))
            })
            .collect();
        if pending.is_empty() {
            return;
        }
        debug!("routing {} adventures", pending.len());

        let mut routes = Vec::with_capacity(pending.len());
        for (category, index, destination) in pending {
            routes.push(async move {
                (category, index, self.travel(origin, destination).await)
            });
        }
        let enriched: Vec<(AdventureCategory, usize, Enrichment)> = stream::iter(routes)
            .buffer_unordered(self.config.max_concurrent_routes.max(1))
            .collect()
            .await;

        for (category, index, enrichment) in enriched {
            let Some(adventure) = discovery
                .by_category
                .get_mut(&category)
                .and_then(|adventures| adventures.get_mut(index))
            else {
                continue;
            };
            adventure.travel_time_minutes = Some(enrichment.minutes);
            adventure.distance_miles = Some(enrichment.miles);
            adventure.travel_time_source = Some(enrichment.source);
        }
    }

    async fn travel(&self, origin: Coordinate, destination: Coordinate) -> Enrichment {
        let limit = self.config.request_timeout();
        let route = timeout(limit, self.routing.route(origin, destination))
            .await
            .unwrap_or(Err(ServiceError::TimedOut(limit)));
        match route {
            Ok(route) => Enrichment {
                minutes: route.travel_minutes,
                miles: route.distance_miles,
                source: TravelTimeSource::Routed,
            },
            Err(err) => {
                let miles = haversine_miles(origin, destination);
                debug!("routing failed ({err}); estimating from {miles:.1} mi");
                Enrichment {
                    minutes: estimate_minutes(miles, self.config.assumed_speed_mph),
                    miles,
                    source: TravelTimeSource::Estimated,
                }
            }
        }
    }
}
