use crate::Area;
use crate::Breadcrumb;
use crate::Coordinate;
use crate::SafetyStatus;
use chrono::NaiveDate;
use serde::Deserialize;
use serde::Serialize;
use serde_with::skip_serializing_none;
use std::hash::Hash;
use std::hash::Hasher;

/// Precipitation summary over the trailing week.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct PrecipitationData {
    #[serde(default)]
    pub last_7_days_mm: f64,
    #[serde(default)]
    pub last_rain_date: Option<NaiveDate>,
    #[serde(default)]
    pub days_since_rain: Option<i64>,
}

/// A saved (or saveable) climbing site: a denormalized snapshot of a leaf
/// area with its full location string.
///
/// Two crags are the same crag when their ids match; the other fields are a
/// snapshot and may drift between fetches.
#[skip_serializing_none]
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Crag {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub location: String,
    #[serde(flatten)]
    pub coordinate: Coordinate,
    #[serde(default)]
    pub safety_status: SafetyStatus,
    #[serde(default)]
    pub precipitation: Option<PrecipitationData>,
    #[serde(default)]
    pub google_maps_url: Option<String>,
    #[serde(default)]
    pub mountain_project_url: Option<String>,
}

impl PartialEq for Crag {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Crag {}

impl Hash for Crag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Crag {
    /// Snapshot a site reached while browsing the hierarchy. Returns `None`
    /// for areas without coordinates.
    pub fn from_area(area: &Area, breadcrumb: &Breadcrumb) -> Option<Self> {
        let coordinate = area.coordinate()?;
        Some(Self {
            id: area.id.clone(),
            name: area.name.clone(),
            location: breadcrumb.to_string(),
            coordinate,
            safety_status: area.safety_status.unwrap_or_default(),
            precipitation: None,
            google_maps_url: area.google_maps_url.clone(),
            mountain_project_url: area.mountain_project_url.clone(),
        })
    }

    pub fn breadcrumb(&self) -> Breadcrumb {
        Breadcrumb::parse(&self.location)
    }

    /// Top-level grouping of the crag's location, falling back to its own
    /// name when the location is empty.
    pub fn state(&self) -> &str {
        self.location
            .split(crate::BREADCRUMB_SEPARATOR)
            .map(str::trim)
            .find(|segment| !segment.is_empty())
            .unwrap_or(&self.name)
    }

    pub fn is_safe(&self) -> bool {
        self.safety_status == SafetyStatus::Safe
    }
}

/// Item-detail payload: the crag plus its precipitation summary.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CragDetail {
    #[serde(flatten)]
    pub crag: Crag,
}

impl CragDetail {
    pub fn precipitation(&self) -> Option<&PrecipitationData> {
        self.crag.precipitation.as_ref()
    }

    pub fn into_crag(self) -> Crag {
        self.crag
    }
}
