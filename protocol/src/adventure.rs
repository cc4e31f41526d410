use crate::Coordinate;
use crate::Crag;
use serde::Deserialize;
use serde::Serialize;
use serde_with::skip_serializing_none;

/// Buckets of alternatives offered when the user's chosen crag is out.
///
/// Ordering follows how the buckets are presented: known-good crags first.
#[derive(
    Clone,
    Copy,
    Debug,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum_macros::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AdventureCategory {
    /// Saved crags currently reported safe.
    SafeCrag,
    /// Indoor alternative.
    ClimbingGym,
    /// Outdoor-activity alternative.
    Hiking,
    /// Amenity alternative.
    Brewery,
}

impl AdventureCategory {
    /// Keyword sent to the place-search service. `None` for the category
    /// sourced from local data.
    pub fn default_keyword(self) -> Option<&'static str> {
        match self {
            AdventureCategory::SafeCrag => None,
            AdventureCategory::ClimbingGym => Some("climbing gym"),
            AdventureCategory::Hiking => Some("hiking trail"),
            AdventureCategory::Brewery => Some("brewery"),
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            AdventureCategory::SafeCrag => "Safe Crags",
            AdventureCategory::ClimbingGym => "Climbing Gyms",
            AdventureCategory::Hiking => "Hiking",
            AdventureCategory::Brewery => "Breweries",
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TravelTimeSource {
    /// Reported by the routing service.
    Routed,
    /// Straight-line distance over an assumed average speed.
    Estimated,
}

#[skip_serializing_none]
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Adventure {
    pub id: String,
    pub name: String,
    pub category: AdventureCategory,
    pub coordinate: Coordinate,
    #[serde(default)]
    pub travel_time_minutes: Option<u32>,
    #[serde(default)]
    pub distance_miles: Option<f64>,
    #[serde(default)]
    pub travel_time_source: Option<TravelTimeSource>,
    /// Back-reference for adventures sourced from saved crags.
    #[serde(default)]
    pub crag: Option<Crag>,
}

impl Adventure {
    pub fn from_crag(crag: &Crag) -> Self {
        Self {
            id: crag.id.clone(),
            name: crag.name.clone(),
            category: AdventureCategory::SafeCrag,
            coordinate: crag.coordinate,
            travel_time_minutes: None,
            distance_miles: None,
            travel_time_source: None,
            crag: Some(crag.clone()),
        }
    }

    pub fn from_place(
        id: impl Into<String>,
        name: impl Into<String>,
        category: AdventureCategory,
        coordinate: Coordinate,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
            coordinate,
            travel_time_minutes: None,
            distance_miles: None,
            travel_time_source: None,
            crag: None,
        }
    }

    pub fn needs_travel_time(&self) -> bool {
        self.travel_time_minutes.is_none()
    }

    /// Human form of the travel time, e.g. `"45 min"` or `"2h 5m"`.
    pub fn travel_time_label(&self) -> Option<String> {
        let minutes = self.travel_time_minutes?;
        if minutes < 60 {
            Some(format!("{minutes} min"))
        } else {
            let hours = minutes / 60;
            let rest = minutes % 60;
            if rest == 0 {
                Some(format!("{hours}h"))
            } else {
                Some(format!("{hours}h {rest}m"))
            }
        }
    }
}
