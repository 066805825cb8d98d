//! Per-query virtual splicing of edge-based endpoints.
//!
//! An endpoint on an edge behaves like a temporary node joined to both ends
//! of its way. The joins are computed here for one query and never touch
//! the graph.

use crate::error::{Error, Result};
use crate::graph::{EdgeRef, RoutableGraph, VertexId};
use crate::payload::EdgeData;
use crate::profile::{Vehicle, VehicleProfile};
use crate::resolve::Endpoint;

use super::Leg;

/// Borrowed inputs shared by every step of one search.
pub(crate) struct QueryContext<'q, P> {
    pub graph: &'q RoutableGraph<P>,
    pub profile: &'q dyn VehicleProfile<P>,
    pub vehicle: Vehicle,
}

impl<'q, P: EdgeData> QueryContext<'q, P> {
    pub fn new(
        graph: &'q RoutableGraph<P>,
        profile: &'q dyn VehicleProfile<P>,
        vehicle: Vehicle,
    ) -> Self {
        Self {
            graph,
            profile,
            vehicle,
        }
    }

    /// Profile weight of a full traversal of `edge`, `None` when blocked.
    pub fn edge_weight(&self, edge: &EdgeRef<'_, P>) -> Result<Option<f64>> {
        let verdict = self
            .profile
            .evaluate(self.vehicle, edge.payload, edge.length, edge.direction);
        if !verdict.passable {
            return Ok(None);
        }
        if !verdict.weight.is_finite() || verdict.weight < 0.0 {
            return Err(Error::InvalidWeight {
                edge: edge.id,
                weight: verdict.weight,
            });
        }
        Ok(Some(verdict.weight))
    }

    /// Ways out of a source endpoint onto real vertices.
    pub fn departures(&self, source: &Endpoint) -> Result<Vec<Join>> {
        let Endpoint::Edge { edge, ratio, .. } = *source else {
            return Ok(Vec::new());
        };

        let mut joins = Vec::with_capacity(2);
        let view = self.graph.edge(edge)?;
        if let Some(weight) = self.edge_weight(&view)? {
            let leg = Leg::new(edge, ratio, 1.0);
            joins.push(Join {
                vertex: view.target,
                cost: leg.cost(weight),
                leg,
            });
        }
        if let Some(twin) = view.twin {
            let reverse = self.graph.edge(twin)?;
            if let Some(weight) = self.edge_weight(&reverse)? {
                let leg = Leg::new(twin, 1.0 - ratio, 1.0);
                joins.push(Join {
                    vertex: reverse.target,
                    cost: leg.cost(weight),
                    leg,
                });
            }
        }
        Ok(joins)
    }

    /// Ways from real vertices into a target endpoint.
    pub fn arrivals(&self, target: &Endpoint) -> Result<Vec<Join>> {
        let Endpoint::Edge { edge, ratio, .. } = *target else {
            return Ok(Vec::new());
        };

        let mut joins = Vec::with_capacity(2);
        let view = self.graph.edge(edge)?;
        if let Some(weight) = self.edge_weight(&view)? {
            let leg = Leg::new(edge, 0.0, ratio);
            joins.push(Join {
                vertex: view.source,
                cost: leg.cost(weight),
                leg,
            });
        }
        if let Some(twin) = view.twin {
            let reverse = self.graph.edge(twin)?;
            if let Some(weight) = self.edge_weight(&reverse)? {
                let leg = Leg::new(twin, 0.0, 1.0 - ratio);
                joins.push(Join {
                    vertex: reverse.source,
                    cost: leg.cost(weight),
                    leg,
                });
            }
        }
        Ok(joins)
    }

    /// Direct on-edge sub-segment when both endpoints lie on the same way.
    pub fn direct(&self, source: &Endpoint, target: &Endpoint) -> Result<Option<(Leg, f64)>> {
        let (
            Endpoint::Edge {
                edge: from_edge,
                ratio: from_ratio,
                ..
            },
            Endpoint::Edge {
                edge: to_edge,
                ratio: to_ratio,
                ..
            },
        ) = (*source, *target)
        else {
            return Ok(None);
        };

        let view = self.graph.edge(from_edge)?;
        let target_ratio = if to_edge == from_edge {
            to_ratio
        } else if Some(to_edge) == view.twin {
            1.0 - to_ratio
        } else {
            return Ok(None);
        };

        let mut best: Option<(Leg, f64)> = None;
        if target_ratio >= from_ratio {
            if let Some(weight) = self.edge_weight(&view)? {
                let leg = Leg::new(from_edge, from_ratio, target_ratio);
                best = Some((leg, leg.cost(weight)));
            }
        }
        if target_ratio <= from_ratio {
            if let Some(twin) = view.twin {
                let reverse = self.graph.edge(twin)?;
                if let Some(weight) = self.edge_weight(&reverse)? {
                    let leg = Leg::new(twin, 1.0 - from_ratio, 1.0 - target_ratio);
                    let cost = leg.cost(weight);
                    if best.map_or(true, |(_, current)| cost < current) {
                        best = Some((leg, cost));
                    }
                }
            }
        }
        Ok(best)
    }
}

/// A virtual link between an endpoint and a real vertex.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Join {
    pub vertex: VertexId,
    pub leg: Leg,
    pub cost: f64,
}
