//! Weighted shortest-path search over virtually spliced endpoints.
//!
//! Two query modes share one label-setting core: [`weight_only`] stops at
//! the target and reports [`UNREACHABLE_WEIGHT`] on failure, while
//! [`full_path`] also keeps predecessor links and returns a
//! [`PredecessorChain`]. Strategies are selected through [`PathSearch`] so
//! callers can swap the algorithm without touching the router.

mod engine;
mod splice;
mod strategy;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::graph::{EdgeId, RoutableGraph, VertexId};
use crate::payload::EdgeData;
use crate::profile::{Vehicle, VehicleProfile};
use crate::resolve::Endpoint;

pub use strategy::{AStar, Dijkstra};

/// Weight reported when no route exists; larger than any real weight.
pub const UNREACHABLE_WEIGHT: f64 = f64::INFINITY;

/// Traversal of the part of a directed edge between two ratios.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Leg {
    pub edge: EdgeId,
    pub from_ratio: f64,
    pub to_ratio: f64,
}

impl Leg {
    pub fn new(edge: EdgeId, from_ratio: f64, to_ratio: f64) -> Self {
        Self {
            edge,
            from_ratio,
            to_ratio,
        }
    }

    /// The whole edge, source to target.
    pub fn full(edge: EdgeId) -> Self {
        Self::new(edge, 0.0, 1.0)
    }

    /// Share of the edge covered by this leg.
    pub fn fraction(&self) -> f64 {
        self.to_ratio - self.from_ratio
    }

    /// Cost of this leg given the weight of the full edge.
    pub fn cost(&self, weight: f64) -> f64 {
        self.fraction() * weight
    }
}

/// Ordered legs from a source endpoint to a target endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredecessorChain {
    source: Endpoint,
    target: Endpoint,
    legs: Vec<Leg>,
    weight: f64,
}

impl PredecessorChain {
    pub(crate) fn new(source: Endpoint, target: Endpoint, legs: Vec<Leg>, weight: f64) -> Self {
        Self {
            source,
            target,
            legs,
            weight,
        }
    }

    pub fn source(&self) -> &Endpoint {
        &self.source
    }

    pub fn target(&self) -> &Endpoint {
        &self.target
    }

    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    /// Total weight the search reported for this chain.
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Real vertices crossed by the chain, in travel order.
    ///
    /// A vertex endpoint counts as crossed; an on-edge endpoint does not.
    pub fn vertices<P>(&self, graph: &RoutableGraph<P>) -> Result<Vec<VertexId>> {
        let mut vertices = Vec::with_capacity(self.legs.len() + 1);
        if let Some(vertex) = self.source.vertex() {
            vertices.push(vertex);
        }
        for leg in &self.legs {
            if leg.to_ratio >= 1.0 {
                let edge = graph.edge(leg.edge)?;
                if vertices.last() != Some(&edge.target) {
                    vertices.push(edge.target);
                }
            }
        }
        Ok(vertices)
    }
}

/// A pluggable shortest-path strategy.
pub trait PathSearch<P: EdgeData>: Send + Sync {
    fn algorithm(&self) -> SearchAlgorithm;

    /// Minimal weight from `from` to `to`, `None` when unreachable.
    fn weight(
        &self,
        graph: &RoutableGraph<P>,
        profile: &dyn VehicleProfile<P>,
        vehicle: Vehicle,
        from: &Endpoint,
        to: &Endpoint,
    ) -> Result<Option<f64>>;

    /// Minimal-weight chain from `from` to `to`, `None` when unreachable.
    fn path(
        &self,
        graph: &RoutableGraph<P>,
        profile: &dyn VehicleProfile<P>,
        vehicle: Vehicle,
        from: &Endpoint,
        to: &Endpoint,
    ) -> Result<Option<PredecessorChain>>;
}

/// Search strategies known to the router.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SearchAlgorithm {
    #[default]
    Dijkstra,
    #[serde(rename = "a-star")]
    AStar,
    /// Precomputed shortcut hierarchy. Declared but not implemented.
    ContractionHierarchy,
}

impl SearchAlgorithm {
    pub const ALL: [SearchAlgorithm; 3] = [
        SearchAlgorithm::Dijkstra,
        SearchAlgorithm::AStar,
        SearchAlgorithm::ContractionHierarchy,
    ];

    pub fn is_supported(self) -> bool {
        !matches!(self, SearchAlgorithm::ContractionHierarchy)
    }
}

impl fmt::Display for SearchAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            SearchAlgorithm::Dijkstra => "dijkstra",
            SearchAlgorithm::AStar => "a-star",
            SearchAlgorithm::ContractionHierarchy => "contraction-hierarchy",
        };
        f.write_str(value)
    }
}

impl FromStr for SearchAlgorithm {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "dijkstra" => Ok(SearchAlgorithm::Dijkstra),
            "a-star" | "astar" | "a*" => Ok(SearchAlgorithm::AStar),
            "contraction-hierarchy" | "ch" => Ok(SearchAlgorithm::ContractionHierarchy),
            other => Err(format!("unknown search algorithm '{other}'")),
        }
    }
}

/// Construct the strategy for `algorithm`.
pub fn select_search<P: EdgeData + 'static>(
    algorithm: SearchAlgorithm,
) -> Result<Box<dyn PathSearch<P>>> {
    match algorithm {
        SearchAlgorithm::Dijkstra => Ok(Box::new(Dijkstra)),
        SearchAlgorithm::AStar => Ok(Box::new(AStar::default())),
        SearchAlgorithm::ContractionHierarchy => Err(Error::UnsupportedAlgorithm {
            algorithm: algorithm.to_string(),
        }),
    }
}

/// Weight-only Dijkstra query; unreachable targets yield [`UNREACHABLE_WEIGHT`].
pub fn weight_only<P: EdgeData>(
    graph: &RoutableGraph<P>,
    profile: &dyn VehicleProfile<P>,
    vehicle: Vehicle,
    from: &Endpoint,
    to: &Endpoint,
) -> Result<f64> {
    let weight = Dijkstra.weight(graph, profile, vehicle, from, to)?;
    Ok(weight.unwrap_or(UNREACHABLE_WEIGHT))
}

/// Full-path Dijkstra query.
pub fn full_path<P: EdgeData>(
    graph: &RoutableGraph<P>,
    profile: &dyn VehicleProfile<P>,
    vehicle: Vehicle,
    from: &Endpoint,
    to: &Endpoint,
) -> Result<Option<PredecessorChain>> {
    Dijkstra.path(graph, profile, vehicle, from, to)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn algorithm_names_round_trip() {
        for algorithm in SearchAlgorithm::ALL {
            let parsed: SearchAlgorithm = algorithm.to_string().parse().unwrap();
            assert_eq!(parsed, algorithm);
        }
        assert!("bellman-ford".parse::<SearchAlgorithm>().is_err());
    }

    #[test]
    fn contraction_hierarchy_is_not_selectable() {
        let selected = select_search::<crate::payload::WayTags>(SearchAlgorithm::ContractionHierarchy);
        assert!(matches!(
            selected,
            Err(Error::UnsupportedAlgorithm { .. })
        ));
        assert!(!SearchAlgorithm::ContractionHierarchy.is_supported());
    }

    #[test]
    fn leg_cost_scales_with_fraction() {
        let leg = Leg::new(3, 0.25, 0.75);
        assert_eq!(leg.cost(8.0), 4.0);
        assert_eq!(Leg::full(3).cost(8.0), 8.0);
    }
}
