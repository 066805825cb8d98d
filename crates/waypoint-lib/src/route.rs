//! Turning a predecessor chain into a metric-annotated route.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::geo::Coordinate;
use crate::graph::{RoutableGraph, VertexId};
use crate::payload::EdgeData;
use crate::profile::{Vehicle, VehicleProfile};
use crate::search::PredecessorChain;

/// One point along a route with totals accumulated from the start.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RouteEntry {
    pub coordinate: Coordinate,
    /// Real vertex at this point, `None` for interpolated endpoints.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vertex: Option<VertexId>,
    pub distance: f64,
    pub weight: f64,
}

/// A successful route, ordered from source to target.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    pub vehicle: Vehicle,
    pub entries: Vec<RouteEntry>,
    pub total_distance: f64,
    pub total_weight: f64,
}

impl Route {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn first(&self) -> Option<&RouteEntry> {
        self.entries.first()
    }

    pub fn last(&self) -> Option<&RouteEntry> {
        self.entries.last()
    }

    /// Real vertices visited, in order.
    pub fn vertices(&self) -> Vec<VertexId> {
        self.entries.iter().filter_map(|entry| entry.vertex).collect()
    }
}

/// Walk `chain` from source to target, emitting one entry per leg end.
///
/// Distances are geometric lengths scaled by the share of each edge the leg
/// covers; weights come from `profile` with the same scaling the search
/// applies, so `total_weight` matches the weight reported for the chain.
/// The first and last entries carry the endpoint coordinates themselves.
pub fn build_route<P, Pr>(
    graph: &RoutableGraph<P>,
    chain: &PredecessorChain,
    profile: &Pr,
    vehicle: Vehicle,
) -> Result<Route>
where
    P: EdgeData,
    Pr: VehicleProfile<P> + ?Sized,
{
    let source = chain.source();
    let mut entries = Vec::with_capacity(chain.legs().len() + 1);
    entries.push(RouteEntry {
        coordinate: source.coordinate(),
        vertex: source.vertex(),
        distance: 0.0,
        weight: 0.0,
    });

    let mut distance = 0.0;
    let mut weight = 0.0;
    for leg in chain.legs() {
        let edge = graph.edge(leg.edge)?;
        let verdict = profile.evaluate(vehicle, edge.payload, edge.length, edge.direction);
        let Some(edge_weight) = verdict.weight() else {
            return Err(Error::ImpassableLeg { edge: leg.edge });
        };
        if !edge_weight.is_finite() || edge_weight < 0.0 {
            return Err(Error::InvalidWeight {
                edge: leg.edge,
                weight: edge_weight,
            });
        }

        distance += leg.fraction() * edge.length;
        weight += leg.cost(edge_weight);

        let (start, end) = graph.edge_geometry(leg.edge)?;
        let reaches_target = leg.to_ratio >= 1.0;
        entries.push(RouteEntry {
            coordinate: if reaches_target {
                end
            } else {
                start.interpolate(&end, leg.to_ratio)
            },
            vertex: reaches_target.then_some(edge.target),
            distance,
            weight,
        });
    }

    if let Some(last) = entries.last_mut() {
        let target = chain.target();
        last.coordinate = target.coordinate();
        last.vertex = target.vertex();
    }

    Ok(Route {
        vehicle,
        entries,
        total_distance: distance,
        total_weight: weight,
    })
}
