mod common;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use common::grid;
use waypoint_lib::{
    compare_routers, generate_pairs, run_route_benchmark, run_weight_benchmark, BenchmarkKind,
    FastestProfile, Router, RouterConfig, SearchAlgorithm, ShortestProfile, Vehicle,
};

#[test]
fn pair_generation_is_reproducible() {
    let graph = grid(3);
    let router = Router::new(&graph, FastestProfile, RouterConfig::default());

    let first = generate_pairs(
        &router,
        Vehicle::Car,
        20,
        500,
        &mut ChaCha8Rng::seed_from_u64(99),
    )
    .expect("pairs generate");
    let second = generate_pairs(
        &router,
        Vehicle::Car,
        20,
        500,
        &mut ChaCha8Rng::seed_from_u64(99),
    )
    .expect("pairs generate");

    assert_eq!(first.len(), 20);
    assert_eq!(first, second);
}

#[test]
fn attempts_bound_pair_generation() {
    let graph = grid(3);
    let router = Router::new(&graph, FastestProfile, RouterConfig::default());
    let pairs = generate_pairs(
        &router,
        Vehicle::Car,
        50,
        3,
        &mut ChaCha8Rng::seed_from_u64(1),
    )
    .expect("pairs generate");
    assert!(pairs.len() <= 3);
}

#[test]
fn benchmark_counts_successes() {
    let graph = grid(4);
    let router = Router::new(&graph, FastestProfile, RouterConfig::default());
    let pairs = generate_pairs(
        &router,
        Vehicle::Car,
        25,
        1_000,
        &mut ChaCha8Rng::seed_from_u64(4),
    )
    .expect("pairs generate");

    let report = run_weight_benchmark(&router, Vehicle::Car, &pairs).expect("benchmark runs");
    assert_eq!(report.algorithm, SearchAlgorithm::Dijkstra);
    assert_eq!(report.kind, BenchmarkKind::Weight);
    assert_eq!(report.queries, pairs.len());
    assert!(report.successes > 0);
    assert!(report.successes <= report.queries);
}

#[test]
fn route_benchmark_finds_the_same_routes_as_weight_benchmark() {
    let graph = grid(4);
    let router = Router::new(&graph, FastestProfile, RouterConfig::default());
    let pairs = generate_pairs(
        &router,
        Vehicle::Car,
        25,
        1_000,
        &mut ChaCha8Rng::seed_from_u64(4),
    )
    .expect("pairs generate");

    let weights = run_weight_benchmark(&router, Vehicle::Car, &pairs).expect("benchmark runs");
    let routes = run_route_benchmark(&router, Vehicle::Car, &pairs).expect("benchmark runs");
    assert_eq!(routes.kind, BenchmarkKind::Route);
    assert_eq!(routes.queries, pairs.len());
    assert_eq!(routes.successes, weights.successes);
}

#[test]
fn dijkstra_and_astar_routers_agree() {
    let graph = grid(9);
    let candidate = Router::with_algorithm(
        &graph,
        FastestProfile,
        SearchAlgorithm::AStar,
        RouterConfig::default(),
    )
    .expect("a-star is supported");
    let reference = Router::new(&graph, FastestProfile, RouterConfig::default());
    let pairs = generate_pairs(
        &reference,
        Vehicle::Car,
        30,
        1_000,
        &mut ChaCha8Rng::seed_from_u64(10),
    )
    .expect("pairs generate");

    let report =
        compare_routers(&candidate, &reference, Vehicle::Car, &pairs, 1e-6).expect("compare runs");
    assert_eq!(report.compared, pairs.len());
    assert!(report.is_consistent(), "{report:?}");
    assert_eq!(report.first_mismatch, None);
}

#[test]
fn comparison_flags_weight_drift() {
    let graph = grid(9);
    let candidate = Router::new(&graph, ShortestProfile, RouterConfig::default());
    let reference = Router::new(&graph, FastestProfile, RouterConfig::default());
    let pairs = generate_pairs(
        &reference,
        Vehicle::Car,
        10,
        1_000,
        &mut ChaCha8Rng::seed_from_u64(12),
    )
    .expect("pairs generate");

    let report =
        compare_routers(&candidate, &reference, Vehicle::Car, &pairs, 1e-6).expect("compare runs");
    assert!(report.weight_mismatches > 0);
    assert!(!report.is_consistent());
    assert!(report.first_mismatch.is_some());
}

#[test]
fn one_router_serves_many_threads() {
    let graph = grid(17);
    let router = Router::new(&graph, FastestProfile, RouterConfig::default());
    let pairs = generate_pairs(
        &router,
        Vehicle::Car,
        12,
        1_000,
        &mut ChaCha8Rng::seed_from_u64(18),
    )
    .expect("pairs generate");

    let sequential: Vec<f64> = pairs
        .iter()
        .map(|pair| router.calculate_weight(Vehicle::Car, &pair.from, &pair.to).unwrap())
        .collect();

    let parallel: Vec<f64> = std::thread::scope(|scope| {
        let handles: Vec<_> = pairs
            .iter()
            .map(|pair| {
                let router = &router;
                scope.spawn(move || {
                    router
                        .calculate_weight(Vehicle::Car, &pair.from, &pair.to)
                        .unwrap()
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("query thread"))
            .collect()
    });

    let bits = |weights: &[f64]| weights.iter().map(|weight| weight.to_bits()).collect::<Vec<_>>();
    assert_eq!(bits(&parallel), bits(&sequential));
}
