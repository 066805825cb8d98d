//! Waypoint routing library entry points.
//!
//! This crate builds immutable road graphs, snaps coordinates onto them,
//! and answers point-to-point routing queries for a chosen vehicle class.
//! Higher-level consumers (the CLI, benchmark harnesses) should go through
//! [`Router`] rather than wiring the search pieces together themselves.
//!

#![deny(warnings)]

pub mod error;
pub mod geo;
pub mod graph;
pub mod payload;
pub mod probe;
pub mod profile;
pub mod resolve;
pub mod route;
pub mod router;
pub mod search;
pub mod spatial;
pub mod synthetic;
pub mod workload;

pub use error::{Error, Result};
pub use geo::{Coordinate, Metric};
pub use graph::{EdgeId, EdgeRef, GraphBuilder, RoutableGraph, VertexId};
pub use payload::{EdgeData, Highway, Oneway, WayTags};
pub use probe::{is_connected, ProbeSettings};
pub use profile::{
    Direction, FastestProfile, ProfileKind, ShortestProfile, Traversal, Vehicle, VehicleProfile,
};
pub use resolve::{resolve, Endpoint, SNAP_RATIO};
pub use route::{build_route, Route, RouteEntry};
pub use router::{Router, RouterConfig};
pub use search::{
    full_path, select_search, weight_only, AStar, Dijkstra, Leg, PathSearch, PredecessorChain,
    SearchAlgorithm, UNREACHABLE_WEIGHT,
};
pub use workload::{
    compare_routers, generate_pairs, run_route_benchmark, run_weight_benchmark, BenchmarkKind,
    BenchmarkReport, ComparisonReport, QueryPair,
};
