use tracing::trace;

use crate::error::Result;
use crate::graph::{RoutableGraph, VertexId};
use crate::payload::EdgeData;
use crate::profile::{Vehicle, VehicleProfile};
use crate::resolve::Endpoint;

use super::engine::{self, CoreOptions, Outcome};
use super::splice::QueryContext;
use super::{PathSearch, PredecessorChain, SearchAlgorithm};

/// Plain Dijkstra: each vertex is finalised at most once.
#[derive(Debug, Clone, Copy, Default)]
pub struct Dijkstra;

impl Dijkstra {
    fn run<P: EdgeData>(
        graph: &RoutableGraph<P>,
        profile: &dyn VehicleProfile<P>,
        vehicle: Vehicle,
        from: &Endpoint,
        to: &Endpoint,
        record_path: bool,
    ) -> Result<Option<Outcome>> {
        let ctx = QueryContext::new(graph, profile, vehicle);
        let options = CoreOptions {
            heuristic: None,
            record_path,
        };
        engine::run(&ctx, from, to, &options)
    }
}

impl<P: EdgeData> PathSearch<P> for Dijkstra {
    fn algorithm(&self) -> SearchAlgorithm {
        SearchAlgorithm::Dijkstra
    }

    fn weight(
        &self,
        graph: &RoutableGraph<P>,
        profile: &dyn VehicleProfile<P>,
        vehicle: Vehicle,
        from: &Endpoint,
        to: &Endpoint,
    ) -> Result<Option<f64>> {
        let outcome = Self::run(graph, profile, vehicle, from, to, false)?;
        Ok(outcome.map(|outcome| outcome.weight))
    }

    fn path(
        &self,
        graph: &RoutableGraph<P>,
        profile: &dyn VehicleProfile<P>,
        vehicle: Vehicle,
        from: &Endpoint,
        to: &Endpoint,
    ) -> Result<Option<PredecessorChain>> {
        let outcome = Self::run(graph, profile, vehicle, from, to, true)?;
        Ok(outcome.and_then(|outcome| outcome.chain))
    }
}

/// A* guided by straight-line distance to the target.
///
/// The estimate is the metric distance times the profile's lower bound on
/// weight per unit length, shrunk by the heuristic scale. It stays
/// admissible as long as no edge is shorter than the straight line between
/// its ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AStar {
    heuristic_scale: f64,
}

impl Default for AStar {
    fn default() -> Self {
        Self {
            heuristic_scale: 0.99,
        }
    }
}

impl AStar {
    /// A* with the estimate multiplied by `scale`, clamped to `[0, 1]`.
    ///
    /// A non-finite scale disables the estimate, which leaves plain
    /// Dijkstra ordering.
    pub fn with_scale(scale: f64) -> Self {
        let heuristic_scale = if scale.is_finite() {
            scale.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self { heuristic_scale }
    }

    pub fn heuristic_scale(&self) -> f64 {
        self.heuristic_scale
    }

    fn run<P: EdgeData>(
        &self,
        graph: &RoutableGraph<P>,
        profile: &dyn VehicleProfile<P>,
        vehicle: Vehicle,
        from: &Endpoint,
        to: &Endpoint,
        record_path: bool,
    ) -> Result<Option<Outcome>> {
        let metric = graph.metric();
        let goal = to.coordinate();
        let factor = profile.min_weight_per_length(vehicle) * self.heuristic_scale;
        // Estimates must stay finite lower bounds.
        let factor = if factor.is_finite() && factor > 0.0 {
            factor
        } else {
            0.0
        };
        let heuristic = |vertex: VertexId| -> Result<f64> {
            let here = graph.coordinate(vertex)?;
            Ok(metric.distance(&here, &goal) * factor)
        };

        let ctx = QueryContext::new(graph, profile, vehicle);
        let options = CoreOptions {
            heuristic: Some(&heuristic),
            record_path,
        };
        let outcome = engine::run(&ctx, from, to, &options)?;
        if let Some(outcome) = &outcome {
            trace!(settled = outcome.settled, "a-star settled nodes");
        }
        Ok(outcome)
    }
}

impl<P: EdgeData> PathSearch<P> for AStar {
    fn algorithm(&self) -> SearchAlgorithm {
        SearchAlgorithm::AStar
    }

    fn weight(
        &self,
        graph: &RoutableGraph<P>,
        profile: &dyn VehicleProfile<P>,
        vehicle: Vehicle,
        from: &Endpoint,
        to: &Endpoint,
    ) -> Result<Option<f64>> {
        let outcome = self.run(graph, profile, vehicle, from, to, false)?;
        Ok(outcome.map(|outcome| outcome.weight))
    }

    fn path(
        &self,
        graph: &RoutableGraph<P>,
        profile: &dyn VehicleProfile<P>,
        vehicle: Vehicle,
        from: &Endpoint,
        to: &Endpoint,
    ) -> Result<Option<PredecessorChain>> {
        let outcome = self.run(graph, profile, vehicle, from, to, true)?;
        Ok(outcome.and_then(|outcome| outcome.chain))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::{Coordinate, Metric};
    use crate::graph::GraphBuilder;
    use crate::payload::{Highway, WayTags};
    use crate::profile::ShortestProfile;

    /// Square with a cheap detour: 0-1-2 along the top, 0-3-2 along the
    /// bottom with a oneway segment 3->2.
    fn square() -> RoutableGraph<WayTags> {
        let mut builder = GraphBuilder::new(Metric::Euclidean);
        let v0 = builder.add_vertex(Coordinate::new(0.0, 0.0)).unwrap();
        let v1 = builder.add_vertex(Coordinate::new(1.0, 0.0)).unwrap();
        let v2 = builder.add_vertex(Coordinate::new(1.0, 1.0)).unwrap();
        let v3 = builder.add_vertex(Coordinate::new(0.0, 1.0)).unwrap();
        let road = WayTags::new(Highway::Residential);
        builder.add_way_with_length(v0, v1, road.clone(), 1.0).unwrap();
        builder.add_way_with_length(v1, v2, road.clone(), 3.0).unwrap();
        builder.add_way_with_length(v0, v3, road.clone(), 1.0).unwrap();
        builder
            .add_way_with_length(v3, v2, road.oneway(crate::payload::Oneway::Forward), 1.0)
            .unwrap();
        builder.build()
    }

    #[test]
    fn dijkstra_and_astar_agree() {
        let graph = square();
        let from = Endpoint::at_vertex(&graph, 0).unwrap();
        let to = Endpoint::at_vertex(&graph, 2).unwrap();

        let dijkstra = Dijkstra
            .weight(&graph, &ShortestProfile, Vehicle::Car, &from, &to)
            .unwrap();
        let astar = AStar::default()
            .weight(&graph, &ShortestProfile, Vehicle::Car, &from, &to)
            .unwrap();
        assert_eq!(dijkstra, Some(2.0));
        assert_eq!(astar, Some(2.0));
    }

    #[test]
    fn non_finite_scale_disables_the_estimate() {
        assert_eq!(AStar::with_scale(f64::NAN).heuristic_scale(), 0.0);
        assert_eq!(AStar::with_scale(f64::INFINITY).heuristic_scale(), 0.0);
        assert_eq!(AStar::with_scale(2.0).heuristic_scale(), 1.0);
        assert_eq!(AStar::with_scale(-0.5).heuristic_scale(), 0.0);
        assert_eq!(AStar::default().heuristic_scale(), 0.99);
    }

    #[test]
    fn oneway_changes_return_trip() {
        let graph = square();
        let from = Endpoint::at_vertex(&graph, 2).unwrap();
        let to = Endpoint::at_vertex(&graph, 0).unwrap();

        let car = Dijkstra
            .weight(&graph, &ShortestProfile, Vehicle::Car, &from, &to)
            .unwrap();
        let walk = Dijkstra
            .weight(&graph, &ShortestProfile, Vehicle::Pedestrian, &from, &to)
            .unwrap();
        assert_eq!(car, Some(4.0));
        assert_eq!(walk, Some(2.0));
    }

    #[test]
    fn path_follows_cheapest_edges() {
        let graph = square();
        let from = Endpoint::at_vertex(&graph, 0).unwrap();
        let to = Endpoint::at_vertex(&graph, 2).unwrap();
        let chain = Dijkstra
            .path(&graph, &ShortestProfile, Vehicle::Car, &from, &to)
            .unwrap()
            .expect("route exists");
        assert_eq!(chain.vertices(&graph).unwrap(), vec![0, 3, 2]);
        assert_eq!(chain.weight(), 2.0);
    }
}
