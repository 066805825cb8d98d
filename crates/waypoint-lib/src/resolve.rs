//! Snapping free-form coordinates onto the graph.
//!
//! Resolution never splits edges. The returned [`Endpoint`] carries the
//! edge id and ratio the search needs to splice the location in for the
//! duration of a single query.

use serde::Serialize;
use tracing::trace;

use crate::error::{Error, Result};
use crate::geo::{project_onto_segment, Coordinate};
use crate::graph::{EdgeId, RoutableGraph, VertexId};
use crate::payload::EdgeData;
use crate::profile::{Vehicle, VehicleProfile};

/// Projections within this fraction of an edge from either end snap onto
/// that end's vertex.
pub const SNAP_RATIO: f64 = 0.01;

/// Ephemeral query location: a real vertex or a point along a directed edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Endpoint {
    Vertex {
        vertex: VertexId,
        coordinate: Coordinate,
    },
    Edge {
        edge: EdgeId,
        /// Position along `edge` from its source (0) to its target (1).
        ratio: f64,
        coordinate: Coordinate,
    },
}

impl Endpoint {
    /// Endpoint sitting exactly on `vertex`.
    pub fn at_vertex<P>(graph: &RoutableGraph<P>, vertex: VertexId) -> Result<Self> {
        Ok(Endpoint::Vertex {
            vertex,
            coordinate: graph.coordinate(vertex)?,
        })
    }

    /// Endpoint at `ratio` along `edge`; the coordinate is interpolated.
    pub fn on_edge<P>(graph: &RoutableGraph<P>, edge: EdgeId, ratio: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&ratio) {
            return Err(Error::InvalidRatio { ratio });
        }
        let (start, end) = graph.edge_geometry(edge)?;
        Ok(Endpoint::Edge {
            edge,
            ratio,
            coordinate: start.interpolate(&end, ratio),
        })
    }

    pub fn coordinate(&self) -> Coordinate {
        match self {
            Endpoint::Vertex { coordinate, .. } | Endpoint::Edge { coordinate, .. } => *coordinate,
        }
    }

    pub fn vertex(&self) -> Option<VertexId> {
        match self {
            Endpoint::Vertex { vertex, .. } => Some(*vertex),
            Endpoint::Edge { .. } => None,
        }
    }

    /// Check that the endpoint refers to something the graph contains.
    pub fn validate<P>(&self, graph: &RoutableGraph<P>) -> Result<()> {
        match *self {
            Endpoint::Vertex { vertex, .. } => graph.coordinate(vertex).map(|_| ()),
            Endpoint::Edge { edge, ratio, .. } => {
                if !(0.0..=1.0).contains(&ratio) {
                    return Err(Error::InvalidRatio { ratio });
                }
                graph.edge(edge).map(|_| ())
            }
        }
    }
}

/// Snap `coordinate` onto the nearest edge `vehicle` may use.
///
/// Candidate edges come from the graph's segment index; each is projected
/// onto perpendicularly with the ratio clamped to `[0, 1]`. Ways closed to
/// `vehicle` in both directions are skipped. The closest projection wins and
/// ties go to the lowest edge id. A projection within [`SNAP_RATIO`] of a
/// segment end resolves to that vertex.
///
/// Returns `Ok(None)` when nothing usable lies within `radius`, including
/// when the graph is empty.
pub fn resolve<P, Pr>(
    graph: &RoutableGraph<P>,
    profile: &Pr,
    vehicle: Vehicle,
    coordinate: &Coordinate,
    radius: f64,
) -> Result<Option<Endpoint>>
where
    P: EdgeData,
    Pr: VehicleProfile<P> + ?Sized,
{
    if graph.is_empty() || !coordinate.is_finite() {
        return Ok(None);
    }

    let metric = graph.metric();
    let candidates = graph.segment_index().candidates(metric, coordinate, radius);
    let mut best: Option<(f64, EdgeId, f64)> = None;

    for edge in candidates {
        let view = graph.edge(edge)?;
        let (start, end) = graph.edge_geometry(edge)?;
        let projection = project_onto_segment(metric, coordinate, &start, &end);
        if projection.distance > radius {
            continue;
        }
        if let Some((distance, _, _)) = best {
            if projection.distance >= distance {
                continue;
            }
        }

        let forward = profile
            .evaluate(vehicle, view.payload, view.length, view.direction)
            .passable;
        let chosen = if forward {
            Some((edge, projection.ratio))
        } else {
            match view.twin {
                Some(twin) => {
                    let reverse = graph.edge(twin)?;
                    profile
                        .evaluate(vehicle, reverse.payload, reverse.length, reverse.direction)
                        .passable
                        .then_some((twin, 1.0 - projection.ratio))
                }
                None => None,
            }
        };

        if let Some((chosen_edge, ratio)) = chosen {
            best = Some((projection.distance, chosen_edge, ratio));
        }
    }

    let Some((distance, edge, ratio)) = best else {
        trace!(?coordinate, radius, %vehicle, "no passable edge within radius");
        return Ok(None);
    };

    let view = graph.edge(edge)?;
    let endpoint = if ratio <= SNAP_RATIO {
        Endpoint::at_vertex(graph, view.source)?
    } else if ratio >= 1.0 - SNAP_RATIO {
        Endpoint::at_vertex(graph, view.target)?
    } else {
        Endpoint::on_edge(graph, edge, ratio)?
    };
    trace!(?endpoint, distance, "resolved coordinate");
    Ok(Some(endpoint))
}
