//! Shared graph fixtures for integration tests.
//!
//! The ring fixtures use the planar metric so lengths and resolution radii
//! are plain numbers; the grid fixture is a seeded geodesic network.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use waypoint_lib::synthetic::grid_network;
use waypoint_lib::{
    Coordinate, GraphBuilder, Highway, Metric, Oneway, RoutableGraph, Router, RouterConfig,
    ShortestProfile, VertexId, WayTags,
};

/// Ring corners in travel order: (0,0), (0,1), (1,1), (1,0).
pub const RING_CORNERS: [(f64, f64); 4] = [(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)];

/// Forward edge id of ring way `index`; the backward twin is the next id.
#[allow(dead_code)]
pub fn ring_edge(index: usize) -> usize {
    index * 2
}

/// Four unit-length two-way streets joined in a cycle. `tags_for` picks
/// the payload of way `index`, which runs from corner `index` to the next.
pub fn ring_with(tags_for: impl Fn(usize) -> WayTags) -> RoutableGraph<WayTags> {
    let mut builder = GraphBuilder::new(Metric::Euclidean);
    let corners: Vec<VertexId> = RING_CORNERS
        .iter()
        .map(|&(lat, lon)| {
            builder
                .add_vertex(Coordinate::new(lat, lon))
                .expect("finite corner")
        })
        .collect();
    for index in 0..corners.len() {
        let from = corners[index];
        let to = corners[(index + 1) % corners.len()];
        builder
            .add_way_with_length(from, to, tags_for(index), 1.0)
            .expect("ring way");
    }
    builder.build()
}

#[allow(dead_code)]
pub fn ring() -> RoutableGraph<WayTags> {
    ring_with(|_| street())
}

/// Ring whose way `closed` is closed to all traffic.
#[allow(dead_code)]
pub fn ring_with_closed_way(closed: usize) -> RoutableGraph<WayTags> {
    ring_with(|index| {
        if index == closed {
            street().closed()
        } else {
            street()
        }
    })
}

/// Ring whose first way (corner 0 to corner 1) is one-way forward.
#[allow(dead_code)]
pub fn ring_with_oneway() -> RoutableGraph<WayTags> {
    ring_with(|index| {
        if index == 0 {
            street().oneway(Oneway::Forward)
        } else {
            street()
        }
    })
}

/// The ring plus an isolated vertex at (5,5); its id is 4.
#[allow(dead_code)]
pub fn ring_with_isolated_vertex() -> RoutableGraph<WayTags> {
    let mut builder = GraphBuilder::new(Metric::Euclidean);
    for &(lat, lon) in &RING_CORNERS {
        builder
            .add_vertex(Coordinate::new(lat, lon))
            .expect("finite corner");
    }
    builder
        .add_vertex(Coordinate::new(5.0, 5.0))
        .expect("finite vertex");
    for index in 0..4 {
        builder
            .add_way_with_length(index, (index + 1) % 4, street(), 1.0)
            .expect("ring way");
    }
    builder.build()
}

#[allow(dead_code)]
pub fn street() -> WayTags {
    WayTags::new(Highway::Residential)
}

/// Planar router with a resolution radius suited to the unit ring.
#[allow(dead_code)]
pub fn ring_router(graph: &RoutableGraph<WayTags>) -> Router<'_, WayTags, ShortestProfile> {
    Router::new(
        graph,
        ShortestProfile,
        RouterConfig::default().with_search_radius(0.6),
    )
}

/// Seeded 10 x 10 street grid with roughly 100 m spacing.
#[allow(dead_code)]
pub fn grid(seed: u64) -> RoutableGraph<WayTags> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    grid_network(10, 10, 0.001, &mut rng).expect("grid builds")
}

#[allow(dead_code)]
pub fn approx_eq(left: f64, right: f64) -> bool {
    (left - right).abs() <= 1e-9 * left.abs().max(right.abs()).max(1.0)
}
