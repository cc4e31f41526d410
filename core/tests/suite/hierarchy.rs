use climbate_catalog_client::CatalogError;
use climbate_core::HierarchyNavigator;
use climbate_core::rows;
use climbate_protocol::AreaKind;
use climbate_protocol::Breadcrumb;
use core_test_support::FakeCatalog;
use core_test_support::region;
use core_test_support::site;
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn yosemite_tree() -> Arc<FakeCatalog> {
    Arc::new(FakeCatalog::default().with_areas(vec![
        region("ca", "California", None),
        region("ut", "Utah", None),
        site("yosemite", "Yosemite", "ca", true),
        site("el-cap", "El Capitan", "yosemite", false),
        site("half-dome", "Half Dome", "yosemite", false),
        region("zion", "Zion", Some("ut")),
    ]))
}

#[tokio::test]
async fn walking_down_builds_breadcrumbs() -> anyhow::Result<()> {
    let navigator = HierarchyNavigator::new(yosemite_tree());

    let top = rows(navigator.top_level().await?, &Breadcrumb::root());
    assert_eq!(
        top.iter().map(|row| row.area.name.as_str()).collect::<Vec<_>>(),
        vec!["California", "Utah"]
    );
    let california = &top[0];
    assert!(california.affordances.descend);
    assert!(!california.affordances.detail);
    assert_eq!(california.state(), "California");

    let second = rows(
        navigator.children(&california.area).await?,
        &california.child_breadcrumb(),
    );
    let yosemite = &second[0];
    assert_eq!(yosemite.area.kind(), AreaKind::HybridSite);
    assert!(yosemite.affordances.descend);
    assert!(yosemite.affordances.detail);
    assert_eq!(yosemite.breadcrumb.to_string(), "California");

    let third = rows(
        navigator.children(&yosemite.area).await?,
        &yosemite.child_breadcrumb(),
    );
    let Some(el_cap) = third.iter().find(|row| row.area.id == "el-cap") else {
        anyhow::bail!("El Capitan missing under Yosemite");
    };
    assert_eq!(el_cap.area.kind(), AreaKind::LeafSite);
    assert!(!el_cap.affordances.descend);
    assert!(el_cap.affordances.save);
    assert_eq!(el_cap.breadcrumb.to_string(), "California > Yosemite");
    assert_eq!(el_cap.state(), "California");

    let saved = el_cap
        .as_crag()
        .ok_or_else(|| anyhow::anyhow!("El Capitan should be saveable"))?;
    assert_eq!(saved.id, "el-cap");
    assert_eq!(saved.location, "California > Yosemite");
    assert_eq!(saved.state(), "California");
    Ok(())
}

#[tokio::test]
async fn children_are_fetched_fresh_every_time() {
    let catalog = yosemite_tree();
    let navigator = HierarchyNavigator::new(catalog.clone());
    let top = navigator.top_level().await.unwrap();

    navigator.children(&top[0]).await.unwrap();
    navigator.children(&top[0]).await.unwrap();

    assert_eq!(catalog.request_count(), 3);
}

#[tokio::test]
async fn breadcrumb_of_a_deep_node_excludes_itself() {
    let navigator = HierarchyNavigator::new(yosemite_tree());

    let crumb = navigator.breadcrumb_of("el-cap").await.unwrap();
    assert_eq!(crumb.to_string(), "California > Yosemite");
    assert_eq!(crumb.state(), Some("California"));

    let top = navigator.breadcrumb_of("ca").await.unwrap();
    assert!(top.is_empty());
}

#[tokio::test]
async fn search_hits_carry_their_ancestry() {
    let navigator = HierarchyNavigator::new(yosemite_tree());

    let hits = navigator.search("capitan").await.unwrap();

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].area.id, "el-cap");
    assert_eq!(hits[0].breadcrumb().to_string(), "California > Yosemite");
}

#[tokio::test]
async fn unknown_node_is_an_error() {
    let navigator = HierarchyNavigator::new(yosemite_tree());
    let ghost = region("ghost", "Ghost", None);

    let err = navigator.children(&ghost).await.unwrap_err();

    assert!(matches!(err, CatalogError::Status { status: 404, .. }));
}

#[tokio::test]
async fn site_detail_carries_children_in_one_request() {
    let catalog = yosemite_tree();
    let navigator = HierarchyNavigator::new(catalog.clone());

    let detail = navigator.detail("yosemite").await.unwrap();

    assert_eq!(catalog.request_count(), 1);
    assert_eq!(detail.area.kind(), AreaKind::HybridSite);
    assert!(detail.precipitation.is_some());
    assert_eq!(
        detail
            .children
            .iter()
            .map(|child| child.id.as_str())
            .collect::<Vec<_>>(),
        vec!["el-cap", "half-dome"]
    );

    let region = navigator.detail("ca").await.unwrap();
    assert_eq!(region.precipitation, None);
    assert_eq!(region.children.len(), 1);

    let err = navigator.detail("ghost").await.unwrap_err();
    assert!(matches!(err, CatalogError::Status { status: 404, .. }));
}
