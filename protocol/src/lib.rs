//! Wire and domain types shared by the Climbate client crates.
//!
//! Everything here mirrors what the catalog service returns (crags, areas,
//! forecasts) plus the client-side discovery result type. The types carry no
//! I/O; see `climbate-catalog-client` for the HTTP side.

mod adventure;
mod area;
mod crag;
mod forecast;

pub use adventure::Adventure;
pub use adventure::AdventureCategory;
pub use adventure::TravelTimeSource;
pub use area::Area;
pub use area::AreaDetail;
pub use area::AreaKind;
pub use area::AreaSearchHit;
pub use area::BREADCRUMB_SEPARATOR;
pub use area::Breadcrumb;
pub use crag::Crag;
pub use crag::CragDetail;
pub use crag::PrecipitationData;
pub use forecast::DayForecast;
pub use forecast::Forecast;

use serde::Deserialize;
use serde::Serialize;

/// A point on the globe, in degrees.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Safety classification computed by the backend from recent precipitation.
#[derive(
    Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash, strum_macros::Display,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum SafetyStatus {
    Safe,
    Caution,
    Unsafe,
    #[default]
    #[serde(other)]
    Unknown,
}
