use criterion::{criterion_group, criterion_main, Criterion};
use once_cell::sync::Lazy;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::hint::black_box;
use waypoint_lib::synthetic::grid_network;
use waypoint_lib::{
    generate_pairs, FastestProfile, QueryPair, RoutableGraph, Router, RouterConfig,
    SearchAlgorithm, Vehicle, WayTags,
};

const SEED: u64 = 2012;

static GRID: Lazy<RoutableGraph<WayTags>> = Lazy::new(|| {
    let mut rng = ChaCha8Rng::seed_from_u64(SEED);
    grid_network(60, 60, 0.001, &mut rng).expect("grid builds")
});

static PAIRS: Lazy<Vec<QueryPair>> = Lazy::new(|| {
    let router = Router::new(&*GRID, FastestProfile, RouterConfig::default());
    let mut rng = ChaCha8Rng::seed_from_u64(SEED + 1);
    generate_pairs(&router, Vehicle::Car, 100, 10_000, &mut rng).expect("pairs generate")
});

fn router(algorithm: SearchAlgorithm) -> Router<'static, WayTags, FastestProfile> {
    Router::with_algorithm(&*GRID, FastestProfile, algorithm, RouterConfig::default())
        .expect("supported algorithm")
}

fn benchmark_pathfinding(c: &mut Criterion) {
    let pairs = &*PAIRS;

    c.bench_function("dijkstra_weight_grid", |b| {
        let router = router(SearchAlgorithm::Dijkstra);
        b.iter(|| {
            for pair in pairs {
                let weight = router
                    .calculate_weight(Vehicle::Car, &pair.from, &pair.to)
                    .expect("query succeeds");
                black_box(weight);
            }
        });
    });

    c.bench_function("astar_weight_grid", |b| {
        let router = router(SearchAlgorithm::AStar);
        b.iter(|| {
            for pair in pairs {
                let weight = router
                    .calculate_weight(Vehicle::Car, &pair.from, &pair.to)
                    .expect("query succeeds");
                black_box(weight);
            }
        });
    });

    c.bench_function("dijkstra_route_grid", |b| {
        let router = router(SearchAlgorithm::Dijkstra);
        b.iter(|| {
            for pair in pairs {
                let route = router
                    .calculate(Vehicle::Car, &pair.from, &pair.to)
                    .expect("query succeeds");
                black_box(route.map(|route| route.len()));
            }
        });
    });

    c.bench_function("resolve_grid", |b| {
        let router = router(SearchAlgorithm::Dijkstra);
        b.iter(|| {
            for pair in pairs {
                let endpoint = router
                    .resolve(Vehicle::Car, &pair.from.coordinate())
                    .expect("resolution succeeds");
                black_box(endpoint);
            }
        });
    });
}

criterion_group!(benches, benchmark_pathfinding);
criterion_main!(benches);
