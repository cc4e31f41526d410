use crate::Coordinate;
use crate::PrecipitationData;
use crate::SafetyStatus;
use serde::Deserialize;
use serde::Serialize;
use serde_with::skip_serializing_none;
use std::fmt;

pub const BREADCRUMB_SEPARATOR: &str = " > ";

/// A node in the catalog hierarchy (state, region, crag, wall...).
#[skip_serializing_none]
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Area {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub has_children: bool,
    /// True when the node carries coordinates. The service calls these crags.
    #[serde(default, rename = "is_crag")]
    pub is_site: bool,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub safety_status: Option<SafetyStatus>,
    #[serde(default)]
    pub google_maps_url: Option<String>,
    #[serde(default)]
    pub mountain_project_url: Option<String>,
}

/// How a node should be treated by consumers, derived from its two flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AreaKind {
    /// Pure grouping container with children.
    Region,
    /// Located site with nothing beneath it.
    LeafSite,
    /// Located site that also contains sub-areas.
    HybridSite,
    /// Container the service reports with no children and no coordinates.
    Empty,
}

impl Area {
    pub fn kind(&self) -> AreaKind {
        match (self.is_site, self.has_children) {
            (false, true) => AreaKind::Region,
            (true, false) => AreaKind::LeafSite,
            (true, true) => AreaKind::HybridSite,
            (false, false) => AreaKind::Empty,
        }
    }

    /// Coordinates are only meaningful for sites and only when both halves
    /// are present.
    pub fn coordinate(&self) -> Option<Coordinate> {
        if !self.is_site {
            return None;
        }
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinate::new(latitude, longitude)),
            _ => None,
        }
    }
}

/// One area with its precipitation summary and direct children, as served
/// by the area detail endpoint. Precipitation is only reported for sites.
#[skip_serializing_none]
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AreaDetail {
    #[serde(flatten)]
    pub area: Area,
    #[serde(default)]
    pub precipitation: Option<PrecipitationData>,
    #[serde(default)]
    pub children: Vec<Area>,
}

/// Result row of an area search: the area plus its ancestor path as the
/// service rendered it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AreaSearchHit {
    #[serde(flatten)]
    pub area: Area,
    #[serde(default)]
    pub breadcrumb: String,
}

impl AreaSearchHit {
    pub fn breadcrumb(&self) -> Breadcrumb {
        Breadcrumb::parse(&self.breadcrumb)
    }
}

/// Ancestor names leading to a node, rendered as `"A > B"`.
///
/// Breadcrumbs are carried by the caller while descending; an [`Area`] never
/// stores its own.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Breadcrumb {
    segments: Vec<String>,
}

impl Breadcrumb {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    pub fn parse(rendered: &str) -> Self {
        Self::from_segments(
            rendered
                .split(BREADCRUMB_SEPARATOR)
                .map(str::trim)
                .filter(|segment| !segment.is_empty()),
        )
    }

    /// The breadcrumb seen by the children of `name`.
    pub fn child(&self, name: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(name.into());
        Self { segments }
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Top-level grouping (the US state in practice).
    pub fn state(&self) -> Option<&str> {
        self.segments.first().map(String::as_str)
    }

    /// State of a node named `name` sitting under this breadcrumb; top-level
    /// nodes are their own state.
    pub fn state_for<'a>(&'a self, name: &'a str) -> &'a str {
        self.state().unwrap_or(name)
    }
}

impl fmt::Display for Breadcrumb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join(BREADCRUMB_SEPARATOR))
    }
}
