//! External services discovery depends on. Only test doubles live in this
//! repository; real providers plug in behind these traits.

use async_trait::async_trait;
use climbate_protocol::Coordinate;
use std::time::Duration;
use thiserror::Error;

#[derive(Clone, Debug, PartialEq)]
pub struct PlaceHit {
    pub name: String,
    pub coordinate: Coordinate,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RouteEstimate {
    pub travel_minutes: u32,
    pub distance_miles: f64,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ServiceError {
    #[error("service unavailable: {0}")]
    Unavailable(String),

    #[error("no route between the given points")]
    NoRoute,

    #[error("service returned an invalid response: {0}")]
    InvalidResponse(String),

    #[error("no answer within {0:?}")]
    TimedOut(Duration),
}

#[async_trait]
pub trait PlaceSearch: Send + Sync {
    /// Places matching `keyword` within `radius_miles` of `origin`, at most
    /// `limit` of them.
    async fn search(
        &self,
        origin: Coordinate,
        radius_miles: f64,
        keyword: &str,
        limit: usize,
    ) -> Result<Vec<PlaceHit>, ServiceError>;
}

#[async_trait]
pub trait RoutingService: Send + Sync {
    async fn route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<RouteEstimate, ServiceError>;
}
