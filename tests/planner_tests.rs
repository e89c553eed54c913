//! Tests for the plan model and the even slice planner.

use route_demo::error::DemoError;
use route_demo::geo::LatLng;
use route_demo::plan::{AgentRoute, Algorithm, Plan, SolveRequest};
use route_demo::planner::{EvenSlicePlanner, Planner};
use std::collections::HashSet;

/// Depot at the origin with four locations on a unit grid.
fn create_square_request(num_salesmen: usize) -> SolveRequest {
    SolveRequest {
        depot: LatLng::new(0.0, 0.0),
        locations: vec![
            LatLng::new(0.0, 1.0),
            LatLng::new(1.0, 1.0),
            LatLng::new(1.0, 0.0),
            LatLng::new(2.0, 0.0),
        ],
        num_salesmen,
        algorithm: Algorithm::SmoAco,
    }
}

#[test]
fn test_slice_routes_even_chunks() {
    let routes = EvenSlicePlanner::slice_routes(10, 3);

    assert_eq!(
        routes,
        vec![
            AgentRoute::new(1, vec![0, 1, 2, 3, 4, 0]),
            AgentRoute::new(2, vec![0, 5, 6, 7, 8, 0]),
            AgentRoute::new(3, vec![0, 9, 10, 0]),
        ]
    );
}

#[test]
fn test_slice_routes_runs_out_of_locations() {
    // ceil(5 / 4) = 2 locations each, so the fourth agent gets nothing.
    let routes = EvenSlicePlanner::slice_routes(5, 4);
    assert_eq!(routes.len(), 3);
    assert_eq!(routes[2].route, vec![0, 5, 0]);

    let routes = EvenSlicePlanner::slice_routes(2, 5);
    assert_eq!(routes.len(), 2);
    assert_eq!(routes[0].route, vec![0, 1, 0]);
    assert_eq!(routes[1].route, vec![0, 2, 0]);

    assert!(EvenSlicePlanner::slice_routes(0, 3).is_empty());
    assert!(EvenSlicePlanner::slice_routes(3, 0).is_empty());
}

#[test]
fn test_slice_routes_visit_every_location_once() {
    for n in 1..40 {
        for k in 1..=10 {
            let routes = EvenSlicePlanner::slice_routes(n, k);
            let mut seen = HashSet::new();

            for (i, route) in routes.iter().enumerate() {
                assert_eq!(route.salesman, i + 1);
                assert_eq!(route.route.first(), Some(&0));
                assert_eq!(route.route.last(), Some(&0));
                for &index in &route.route[1..route.route.len() - 1] {
                    assert!(seen.insert(index), "location {} visited twice", index);
                }
            }

            assert_eq!(seen.len(), n);
            assert!(routes.len() <= k);
        }
    }
}

#[test]
fn test_solve_computes_euclidean_distance() {
    let plan = EvenSlicePlanner.solve(&create_square_request(2)).unwrap();

    assert_eq!(plan.routes.len(), 2);
    assert_eq!(plan.routes[0].route, vec![0, 1, 2, 0]);
    assert_eq!(plan.routes[1].route, vec![0, 3, 4, 0]);

    // 0 -> (0,1) -> (1,1) -> 0 and 0 -> (1,0) -> (2,0) -> 0, in degrees.
    let expected = (1.0 + 1.0 + 2f64.sqrt() + 1.0 + 1.0 + 2.0) * 111.32;
    assert!((plan.total_distance - expected).abs() < 1e-9);
    assert!(plan.computation_time >= 0.0);
}

#[test]
fn test_solve_rejects_missing_input() {
    let mut request = create_square_request(2);
    request.locations.clear();
    assert!(matches!(
        EvenSlicePlanner.solve(&request),
        Err(DemoError::NoLocations)
    ));

    let request = create_square_request(0);
    assert!(matches!(
        EvenSlicePlanner.solve(&request),
        Err(DemoError::InvalidConfig { .. })
    ));
}

#[test]
fn test_unresolved_index_fails_distance() {
    let request = create_square_request(1);
    let route = AgentRoute::new(1, vec![0, 1, 7, 0]);

    assert!(matches!(
        route.distance(|i| request.point(i)),
        Err(DemoError::UnknownOrder(7))
    ));
    assert!(matches!(
        Plan::new(vec![route], |i| request.point(i), 0.0),
        Err(DemoError::UnknownOrder(7))
    ));

    let valid = AgentRoute::new(1, vec![0, 4, 0]);
    let distance = valid.distance(|i| request.point(i)).unwrap();
    assert!((distance - 4.0 * 111.32).abs() < 1e-9);
}

#[test]
fn test_agent_route_counts_and_display() {
    let route = AgentRoute::new(2, vec![0, 4, 5, 6, 0]);

    assert_eq!(route.order_count(), 3);
    assert_eq!(route.stop_count(), 3);
    assert_eq!(route.to_string(), "Agent 2: 0 -> 4 -> 5 -> 6 -> 0");
}

#[test]
fn test_plan_lookup_and_serialization() {
    let request = create_square_request(2);
    let plan = Plan::new(
        vec![
            AgentRoute::new(1, vec![0, 1, 0]),
            AgentRoute::new(2, vec![0, 2, 3, 0]),
        ],
        |i| request.point(i),
        12.5,
    )
    .unwrap();

    assert_eq!(plan.order_count(), 3);
    assert_eq!(plan.route_for(2).unwrap().route, vec![0, 2, 3, 0]);
    assert!(plan.route_for(3).is_none());

    let json = serde_json::to_value(&plan).unwrap();
    assert!(json.get("totalDistance").is_some());
    assert_eq!(json["computationTime"], 12.5);
    assert_eq!(json["routes"][1]["salesman"], 2);
}

#[test]
fn test_request_uses_backend_field_names() {
    let json = serde_json::to_value(create_square_request(3)).unwrap();

    assert_eq!(json["numSalesmen"], 3);
    assert_eq!(json["algorithm"], "smo-aco");
    assert_eq!(json["depot"]["lat"], 0.0);
}

#[test]
fn test_algorithm_names() {
    assert_eq!("SMO".parse::<Algorithm>().unwrap(), Algorithm::Smo);
    assert_eq!("smo-aco".parse::<Algorithm>().unwrap(), Algorithm::SmoAco);
    assert!(matches!(
        "genetic".parse::<Algorithm>(),
        Err(DemoError::UnknownAlgorithm(_))
    ));

    assert_eq!(Algorithm::default(), Algorithm::SmoAco);
    assert_eq!(Algorithm::Aco.name(), "Ant Colony Optimization");
    assert_eq!(Algorithm::Aco.parameters().len(), 5);
    assert_eq!(
        serde_json::from_str::<Algorithm>("\"aco\"").unwrap(),
        Algorithm::Aco
    );
}
