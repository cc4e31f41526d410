use climbate_async_utils::CancelErr;
use climbate_core::DiscoveryEngine;
use climbate_core::config::CategoryQuery;
use climbate_core::config::DiscoveryConfig;
use climbate_core::geo::EARTH_RADIUS_MILES;
use climbate_protocol::AdventureCategory;
use climbate_protocol::Coordinate;
use climbate_protocol::SafetyStatus;
use climbate_protocol::TravelTimeSource;
use core_test_support::FakePlaces;
use core_test_support::FakeRouter;
use core_test_support::crag_at;
use core_test_support::place;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

const ORIGIN: Coordinate = Coordinate::new(0.0, 0.0);

fn engine(
    places: FakePlaces,
    router: FakeRouter,
) -> (DiscoveryEngine, Arc<FakePlaces>, Arc<FakeRouter>) {
    engine_with(DiscoveryConfig::default(), places, router)
}

fn engine_with(
    config: DiscoveryConfig,
    places: FakePlaces,
    router: FakeRouter,
) -> (DiscoveryEngine, Arc<FakePlaces>, Arc<FakeRouter>) {
    let places = Arc::new(places);
    let router = Arc::new(router);
    let engine = DiscoveryEngine::new(places.clone(), router.clone(), config);
    (engine, places, router)
}

fn names(adventures: &[climbate_protocol::Adventure]) -> Vec<&str> {
    adventures.iter().map(|adventure| adventure.name.as_str()).collect()
}

#[tokio::test]
async fn unroutable_place_falls_back_to_straight_line_estimate() {
    // Due north of the origin, exactly 90 miles away.
    let north = Coordinate::new((90.0 / EARTH_RADIUS_MILES).to_degrees(), 0.0);
    let (engine, _, _) = engine(
        FakePlaces::default().with("brewery", vec![place("Far Brewing", north.latitude, 0.0)]),
        FakeRouter::default(),
    );

    let discovery = engine
        .discover(ORIGIN, &[], &CancellationToken::new())
        .await
        .unwrap();

    let brewery = &discovery.category(AdventureCategory::Brewery)[0];
    assert_eq!(brewery.travel_time_minutes, Some(120));
    assert_eq!(brewery.travel_time_source, Some(TravelTimeSource::Estimated));
    let miles = brewery.distance_miles.unwrap();
    assert!((miles - 90.0).abs() < 1e-6, "got {miles}");
}

#[tokio::test]
async fn failing_category_does_not_sink_the_others() {
    let gym = place("Movement", 0.1, 0.1);
    let saved = crag_at("saved", Coordinate::new(0.3, 0.3), SafetyStatus::Safe);
    let (engine, places, _) = engine(
        FakePlaces::default()
            .with("climbing gym", vec![gym.clone()])
            .failing("hiking trail")
            .with("brewery", vec![place("Avery", 0.2, 0.2)]),
        FakeRouter::default()
            .with_route(gym.coordinate, 12, 8.5)
            .with_route(saved.coordinate, 25, 19.0),
    );

    let discovery = engine
        .discover(ORIGIN, &[saved.clone()], &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(places.calls(), 3);
    assert_eq!(discovery.failed_categories, vec![AdventureCategory::Hiking]);
    assert!(discovery.category(AdventureCategory::Hiking).is_empty());
    assert_eq!(names(discovery.category(AdventureCategory::Brewery)), vec!["Avery"]);

    let gym = &discovery.category(AdventureCategory::ClimbingGym)[0];
    assert_eq!(gym.travel_time_minutes, Some(12));
    assert_eq!(gym.distance_miles, Some(8.5));
    assert_eq!(gym.travel_time_source, Some(TravelTimeSource::Routed));
    assert!(gym.crag.is_none());

    let known_good = discovery.category(AdventureCategory::SafeCrag);
    assert_eq!(known_good.len(), 1);
    assert_eq!(known_good[0].crag.as_ref(), Some(&saved));
    assert_eq!(known_good[0].travel_time_minutes, Some(25));
    assert_eq!(known_good[0].distance_miles, Some(19.0));
    assert_eq!(
        known_good[0].travel_time_source,
        Some(TravelTimeSource::Routed)
    );
}

#[tokio::test]
async fn category_with_one_answering_query_is_not_failed() {
    let config = DiscoveryConfig {
        categories: vec![
            CategoryQuery {
                category: AdventureCategory::Hiking,
                keyword: "hiking trail".to_string(),
            },
            CategoryQuery {
                category: AdventureCategory::Hiking,
                keyword: "trailhead".to_string(),
            },
        ],
        ..DiscoveryConfig::default()
    };
    let (engine, places, _) = engine_with(
        config,
        FakePlaces::default()
            .failing("hiking trail")
            .with("trailhead", vec![place("Mesa Trail", 0.1, 0.0)]),
        FakeRouter::default(),
    );

    let discovery = engine
        .discover(ORIGIN, &[], &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(places.calls(), 2);
    assert!(discovery.failed_categories.is_empty());
    assert_eq!(
        names(discovery.category(AdventureCategory::Hiking)),
        vec!["Mesa Trail"]
    );
}

#[tokio::test(start_paused = true)]
async fn stalled_router_times_out_into_an_estimate() {
    let (engine, _, router) = engine(
        FakePlaces::default().with("brewery", vec![place("Slow Road Brewing", 0.5, 0.0)]),
        FakeRouter::default().with_delay(Duration::from_secs(3600)),
    );
    let started = Instant::now();

    let discovery = engine
        .discover(ORIGIN, &[], &CancellationToken::new())
        .await
        .unwrap();

    let elapsed = started.elapsed();
    assert!(elapsed <= Duration::from_secs(31), "took {elapsed:?}");
    assert_eq!(router.calls(), 1);
    let brewery = &discovery.category(AdventureCategory::Brewery)[0];
    assert_eq!(brewery.travel_time_source, Some(TravelTimeSource::Estimated));
    assert!(brewery.travel_time_minutes.is_some());
    assert!(discovery.failed_categories.is_empty());
}

#[tokio::test(start_paused = true)]
async fn stalled_place_search_marks_categories_failed() {
    let config = DiscoveryConfig {
        request_timeout_secs: 5,
        ..DiscoveryConfig::default()
    };
    let saved = crag_at("saved", Coordinate::new(0.1, 0.0), SafetyStatus::Safe);
    let (engine, _, router) = engine_with(
        config,
        FakePlaces::default()
            .with("brewery", vec![place("Never Seen", 0.2, 0.0)])
            .with_delay(Duration::from_secs(3600)),
        FakeRouter::default().with_route(saved.coordinate, 7, 4.0),
    );
    let started = Instant::now();

    let discovery = engine
        .discover(ORIGIN, &[saved], &CancellationToken::new())
        .await
        .unwrap();

    assert!(started.elapsed() <= Duration::from_secs(6));
    assert_eq!(
        discovery.failed_categories,
        vec![
            AdventureCategory::ClimbingGym,
            AdventureCategory::Hiking,
            AdventureCategory::Brewery,
        ]
    );
    assert!(discovery.category(AdventureCategory::Brewery).is_empty());
    assert_eq!(router.calls(), 1);
    assert_eq!(
        discovery.category(AdventureCategory::SafeCrag)[0].travel_time_minutes,
        Some(7)
    );
}

#[tokio::test]
async fn categories_are_sorted_by_travel_time_with_stable_ties() {
    let a = place("Thirty", 0.1, 0.0);
    let b = place("Ten", 0.2, 0.0);
    let c = place("Twenty", 0.3, 0.0);
    let d = place("Also Ten", 0.4, 0.0);
    let (engine, _, _) = engine(
        FakePlaces::default().with(
            "hiking trail",
            vec![a.clone(), b.clone(), c.clone(), d.clone()],
        ),
        FakeRouter::default()
            .with_route(a.coordinate, 30, 20.0)
            .with_route(b.coordinate, 10, 5.0)
            .with_route(c.coordinate, 20, 12.0)
            .with_route(d.coordinate, 10, 6.0),
    );

    let discovery = engine
        .discover(ORIGIN, &[], &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(
        names(discovery.category(AdventureCategory::Hiking)),
        vec!["Ten", "Also Ten", "Twenty", "Thirty"]
    );
}

#[tokio::test]
async fn saved_crags_become_the_known_good_category() {
    let near = crag_at("near", Coordinate::new(0.05, 0.0), SafetyStatus::Safe);
    let far = crag_at("far", Coordinate::new(0.5, 0.0), SafetyStatus::Safe);
    let (engine, places, _) = engine(
        FakePlaces::default(),
        FakeRouter::default()
            .with_route(near.coordinate, 9, 4.0)
            .with_route(far.coordinate, 55, 40.0),
    );

    let discovery = engine
        .discover(ORIGIN, &[far, near.clone()], &CancellationToken::new())
        .await
        .unwrap();

    let safe = discovery.category(AdventureCategory::SafeCrag);
    assert_eq!(
        safe.iter().map(|adventure| adventure.id.as_str()).collect::<Vec<_>>(),
        vec!["near", "far"]
    );
    assert_eq!(safe[0].crag.as_ref(), Some(&near));
    // Only the searched categories go over the network.
    assert_eq!(places.calls(), 3);
}

#[tokio::test]
async fn results_are_capped_per_category() {
    let hits = (0..15)
        .map(|i| place(&format!("Gym {i}"), 0.01 * f64::from(i), 0.0))
        .collect();
    let (engine, _, router) = engine(
        FakePlaces::default().with("climbing gym", hits),
        FakeRouter::default(),
    );

    let discovery = engine
        .discover(ORIGIN, &[], &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(discovery.category(AdventureCategory::ClimbingGym).len(), 10);
    assert_eq!(router.calls(), 10);
}

#[tokio::test(start_paused = true)]
async fn routing_concurrency_is_bounded() {
    let hits = (0..10)
        .map(|i| place(&format!("Trail {i}"), 0.01 * f64::from(i), 0.0))
        .collect();
    let (engine, _, router) = engine(
        FakePlaces::default().with("hiking trail", hits),
        FakeRouter::default().with_delay(Duration::from_millis(100)),
    );

    let discovery = engine
        .discover(ORIGIN, &[], &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(discovery.category(AdventureCategory::Hiking).len(), 10);
    assert_eq!(router.calls(), 10);
    assert!(router.max_in_flight() <= 4, "saw {}", router.max_in_flight());
    assert!(router.max_in_flight() > 1);
}

#[tokio::test(start_paused = true)]
async fn cancellation_stops_discovery() {
    let (engine, _, router) = engine(
        FakePlaces::default()
            .with("brewery", vec![place("Slow Brewing", 0.1, 0.1)])
            .with_delay(Duration::from_secs(10)),
        FakeRouter::default(),
    );
    let token = CancellationToken::new();
    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        canceller.cancel();
    });

    let outcome = engine.discover(ORIGIN, &[], &token).await;

    assert_eq!(outcome, Err(CancelErr::Cancelled));
    assert_eq!(router.calls(), 0);
}
