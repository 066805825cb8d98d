//! Bounded reachability check used to filter unusable endpoints.

use std::collections::{HashMap, VecDeque};

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::Result;
use crate::graph::{EdgeRef, RoutableGraph, VertexId};
use crate::payload::EdgeData;
use crate::profile::{Vehicle, VehicleProfile};
use crate::resolve::Endpoint;

/// Thresholds for [`is_connected`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeSettings {
    /// Maximum breadth-first depth, counted in edges from the endpoint.
    pub hop_limit: usize,
    /// Distinct vertices that must be found past the endpoint's own
    /// incident edges before the endpoint counts as connected.
    pub min_vertices_beyond: usize,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            hop_limit: 30,
            min_vertices_beyond: 1,
        }
    }
}

impl ProbeSettings {
    pub fn with_hop_limit(mut self, hop_limit: usize) -> Self {
        self.hop_limit = hop_limit;
        self
    }
}

/// Whether `endpoint` sits in a fragment large enough to route from.
///
/// Breadth-first expansion by hop count over edges `vehicle` may use. The
/// vertices one hop away (or the two ends of the edge for an on-edge
/// endpoint) are the endpoint's immediate neighbourhood; anything found at
/// depth two or more counts towards `min_vertices_beyond`. Isolated vertices
/// and stubs whose only edges are blocked report `false`.
pub fn is_connected<P, Pr>(
    graph: &RoutableGraph<P>,
    profile: &Pr,
    vehicle: Vehicle,
    endpoint: &Endpoint,
    settings: &ProbeSettings,
) -> Result<bool>
where
    P: EdgeData,
    Pr: VehicleProfile<P> + ?Sized,
{
    endpoint.validate(graph)?;
    let required = settings.min_vertices_beyond.max(1);

    let mut depth: HashMap<VertexId, usize> = HashMap::new();
    let mut queue = VecDeque::new();

    match *endpoint {
        Endpoint::Vertex { vertex, .. } => {
            depth.insert(vertex, 0);
            queue.push_back(vertex);
        }
        Endpoint::Edge { edge, .. } => {
            let view = graph.edge(edge)?;
            let mut ends = Vec::with_capacity(2);
            if passable(profile, vehicle, &view) {
                ends.push(view.target);
            }
            if let Some(twin) = view.twin {
                let reverse = graph.edge(twin)?;
                if passable(profile, vehicle, &reverse) {
                    ends.push(reverse.target);
                }
            }
            for vertex in ends {
                if depth.insert(vertex, 1).is_none() {
                    queue.push_back(vertex);
                }
            }
        }
    }

    let mut beyond = 0usize;
    while let Some(current) = queue.pop_front() {
        let current_depth = depth.get(&current).copied().unwrap_or_default();
        if current_depth >= settings.hop_limit {
            continue;
        }

        for edge in graph.outgoing_edges(current)? {
            if depth.contains_key(&edge.target) || !passable(profile, vehicle, &edge) {
                continue;
            }
            let next_depth = current_depth + 1;
            depth.insert(edge.target, next_depth);
            if next_depth >= 2 {
                beyond += 1;
                if beyond >= required {
                    trace!(explored = depth.len(), "endpoint is connected");
                    return Ok(true);
                }
            }
            queue.push_back(edge.target);
        }
    }

    trace!(
        explored = depth.len(),
        beyond,
        hop_limit = settings.hop_limit,
        "endpoint fragment too small"
    );
    Ok(false)
}

fn passable<P, Pr>(profile: &Pr, vehicle: Vehicle, edge: &EdgeRef<'_, P>) -> bool
where
    P: EdgeData,
    Pr: VehicleProfile<P> + ?Sized,
{
    profile
        .evaluate(vehicle, edge.payload, edge.length, edge.direction)
        .passable
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::{Coordinate, Metric};
    use crate::graph::GraphBuilder;
    use crate::payload::{Highway, Oneway, WayTags};
    use crate::profile::ShortestProfile;

    /// Path graph 0-1-2-3 plus an isolated vertex 4.
    fn chain() -> RoutableGraph<WayTags> {
        let mut builder = GraphBuilder::new(Metric::Euclidean);
        for index in 0..5u32 {
            builder
                .add_vertex(Coordinate::new(0.0, f64::from(index)))
                .unwrap();
        }
        let road = WayTags::new(Highway::Residential);
        builder.add_way(0, 1, road.clone()).unwrap();
        builder.add_way(1, 2, road.clone()).unwrap();
        builder.add_way(2, 3, road).unwrap();
        builder.build()
    }

    #[test]
    fn isolated_vertex_is_not_connected() {
        let graph = chain();
        let endpoint = Endpoint::at_vertex(&graph, 4).unwrap();
        let connected = is_connected(
            &graph,
            &ShortestProfile,
            Vehicle::Car,
            &endpoint,
            &ProbeSettings::default(),
        )
        .unwrap();
        assert!(!connected);
    }

    #[test]
    fn threshold_is_configurable() {
        let graph = chain();
        let endpoint = Endpoint::at_vertex(&graph, 0).unwrap();
        let strict = ProbeSettings {
            hop_limit: 30,
            min_vertices_beyond: 3,
        };
        let loose = ProbeSettings::default();

        assert!(is_connected(&graph, &ShortestProfile, Vehicle::Car, &endpoint, &loose).unwrap());
        assert!(!is_connected(&graph, &ShortestProfile, Vehicle::Car, &endpoint, &strict).unwrap());
    }

    #[test]
    fn hop_limit_bounds_the_expansion() {
        let graph = chain();
        let endpoint = Endpoint::at_vertex(&graph, 0).unwrap();
        let shallow = ProbeSettings::default().with_hop_limit(1);
        assert!(!is_connected(&graph, &ShortestProfile, Vehicle::Car, &endpoint, &shallow).unwrap());
    }

    #[test]
    fn on_edge_endpoint_counts_from_edge_ends() {
        let graph = chain();
        // Middle of 1-2: ends are 1 and 2, so 0 and 3 lie beyond.
        let endpoint = Endpoint::on_edge(&graph, 2, 0.5).unwrap();
        let settings = ProbeSettings {
            hop_limit: 2,
            min_vertices_beyond: 2,
        };
        assert!(is_connected(&graph, &ShortestProfile, Vehicle::Car, &endpoint, &settings).unwrap());
    }

    /// The chain with vertex 4 hanging off vertex 3 by a single way.
    fn chain_with_spur(spur: WayTags) -> RoutableGraph<WayTags> {
        let mut builder = GraphBuilder::new(Metric::Euclidean);
        for index in 0..5u32 {
            builder
                .add_vertex(Coordinate::new(0.0, f64::from(index)))
                .unwrap();
        }
        let road = WayTags::new(Highway::Residential);
        builder.add_way(0, 1, road.clone()).unwrap();
        builder.add_way(1, 2, road.clone()).unwrap();
        builder.add_way(2, 3, road).unwrap();
        builder.add_way(3, 4, spur).unwrap();
        builder.build()
    }

    #[test]
    fn vertex_behind_closed_way_is_not_connected() {
        let graph = chain_with_spur(WayTags::new(Highway::Residential).closed());
        let endpoint = Endpoint::at_vertex(&graph, 4).unwrap();
        let settings = ProbeSettings::default();

        for vehicle in Vehicle::ALL {
            assert!(
                !is_connected(&graph, &ShortestProfile, vehicle, &endpoint, &settings).unwrap(),
                "{vehicle} should be stuck at the spur"
            );
        }
    }

    #[test]
    fn oneway_into_a_dead_end_strands_cars_only() {
        // The spur may only be driven from 3 towards 4.
        let graph = chain_with_spur(WayTags::new(Highway::Residential).oneway(Oneway::Forward));
        let endpoint = Endpoint::at_vertex(&graph, 4).unwrap();
        let settings = ProbeSettings::default();

        assert!(!is_connected(&graph, &ShortestProfile, Vehicle::Car, &endpoint, &settings).unwrap());
        assert!(
            is_connected(&graph, &ShortestProfile, Vehicle::Pedestrian, &endpoint, &settings).unwrap()
        );
    }
}
