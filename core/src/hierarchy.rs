use climbate_catalog_client::CatalogApi;
use climbate_catalog_client::Result;
use climbate_protocol::Area;
use climbate_protocol::AreaDetail;
use climbate_protocol::AreaKind;
use climbate_protocol::AreaSearchHit;
use climbate_protocol::Breadcrumb;
use climbate_protocol::Crag;
use std::sync::Arc;
use tracing::debug;

/// Lazy, stateless walker over the area tree.
///
/// Children are fetched each time a node is entered and never cached, so
/// re-entering a node always shows fresh safety data. Breadcrumbs are the
/// caller's business: extend the parent's with [`Breadcrumb::child`] before
/// descending.
#[derive(Clone)]
pub struct HierarchyNavigator {
    catalog: Arc<dyn CatalogApi>,
}

impl HierarchyNavigator {
    pub fn new(catalog: Arc<dyn CatalogApi>) -> Self {
        Self { catalog }
    }

    /// Areas with no parent (states, in practice).
    pub async fn top_level(&self) -> Result<Vec<Area>> {
        let areas = self.catalog.list_areas(None).await?;
        debug!("top level: {} areas", areas.len());
        Ok(areas)
    }

    pub async fn children(&self, area: &Area) -> Result<Vec<Area>> {
        let children = self.catalog.area_children(&area.id).await?;
        debug!(area = %area.id, "{} children", children.len());
        Ok(children)
    }

    /// Detail view of a site: its precipitation plus whatever sits beneath
    /// it, in one request.
    pub async fn detail(&self, area_id: &str) -> Result<AreaDetail> {
        let detail = self.catalog.area_detail(area_id).await?;
        debug!(
            area = %area_id,
            has_precipitation = detail.precipitation.is_some(),
            "detail with {} children",
            detail.children.len()
        );
        Ok(detail)
    }

    /// Breadcrumb for a node reached without walking down to it (a search
    /// hit or a deep link): its ancestors' names, root first.
    pub async fn breadcrumb_of(&self, area_id: &str) -> Result<Breadcrumb> {
        let mut path = self.catalog.area_breadcrumb(area_id).await?;
        if path.last().is_some_and(|last| last.id == area_id) {
            path.pop();
        }
        Ok(Breadcrumb::from_segments(path.into_iter().map(|area| area.name)))
    }

    pub async fn search(&self, query: &str) -> Result<Vec<AreaSearchHit>> {
        self.catalog.search_areas(query).await
    }
}

/// What a list row for an area should offer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Affordances {
    /// Open a sub-list of children.
    pub descend: bool,
    /// Open the detail / forecast view.
    pub detail: bool,
    /// Offer the save toggle.
    pub save: bool,
    /// Render a safety badge.
    pub show_safety: bool,
}

impl Affordances {
    /// Top-level nodes never count as sites: there is no weather at state
    /// granularity, whatever the flag says.
    pub fn for_area(area: &Area, breadcrumb: &Breadcrumb) -> Self {
        let site = !breadcrumb.is_empty() && area.is_site;
        Self {
            descend: area.has_children,
            detail: site,
            save: site && area.coordinate().is_some(),
            show_safety: site && area.safety_status.is_some(),
        }
    }

    pub fn effective_kind(area: &Area, breadcrumb: &Breadcrumb) -> AreaKind {
        if breadcrumb.is_empty() && area.is_site {
            if area.has_children {
                AreaKind::Region
            } else {
                AreaKind::Empty
            }
        } else {
            area.kind()
        }
    }
}

/// A row as the navigation layer hands it to presentation: the node, the
/// breadcrumb its children will see, and what it offers.
#[derive(Clone, Debug, PartialEq)]
pub struct AreaRow {
    pub area: Area,
    pub breadcrumb: Breadcrumb,
    pub affordances: Affordances,
}

impl AreaRow {
    pub fn new(area: Area, parent: &Breadcrumb) -> Self {
        let affordances = Affordances::for_area(&area, parent);
        Self {
            area,
            breadcrumb: parent.clone(),
            affordances,
        }
    }

    pub fn child_breadcrumb(&self) -> Breadcrumb {
        self.breadcrumb.child(self.area.name.clone())
    }

    /// State shown for the row: the breadcrumb root, or the node itself at
    /// the top level.
    pub fn state(&self) -> &str {
        self.breadcrumb.state_for(&self.area.name)
    }

    /// Saveable snapshot, if the row offers saving.
    pub fn as_crag(&self) -> Option<Crag> {
        if !self.affordances.save {
            return None;
        }
        Crag::from_area(&self.area, &self.breadcrumb)
    }
}

pub fn rows(areas: Vec<Area>, parent: &Breadcrumb) -> Vec<AreaRow> {
    areas
        .into_iter()
        .map(|area| AreaRow::new(area, parent))
        .collect()
}
