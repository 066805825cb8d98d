//! Seeded synthetic road networks for benchmarks and property tests.

use rand::Rng;
use tracing::info;

use crate::error::{Error, Result};
use crate::geo::{Coordinate, Metric};
use crate::graph::{GraphBuilder, RoutableGraph, VertexId};
use crate::payload::{Highway, Oneway, WayTags};
use crate::profile::Vehicle;

/// South-west corner of every generated grid.
pub const GRID_ORIGIN: Coordinate = Coordinate::new(52.0, 13.0);

/// Share of grid links left out entirely, creating dead ends and the odd
/// isolated vertex.
const MISSING_LINK_RATE: f64 = 0.04;
const ONEWAY_RATE: f64 = 0.12;
const CLOSED_RATE: f64 = 0.03;
const FOOTWAY_RATE: f64 = 0.06;

/// Build a `rows` x `cols` street grid with haversine lengths.
///
/// Every fifth row is a primary road and every fifth column a secondary
/// one; the rest are residential streets with random one-ways, closures,
/// footways and missing links drawn from `rng`. Vertex `r * cols + c` sits
/// at row `r`, column `c`, jittered by up to a fifth of `spacing_deg`.
pub fn grid_network<R: Rng + ?Sized>(
    rows: usize,
    cols: usize,
    spacing_deg: f64,
    rng: &mut R,
) -> Result<RoutableGraph<WayTags>> {
    if !spacing_deg.is_finite() || spacing_deg <= 0.0 {
        return Err(Error::InvalidSpacing {
            spacing: spacing_deg,
        });
    }
    let mut builder = GraphBuilder::new(Metric::Haversine);
    let jitter = spacing_deg * 0.2;

    for row in 0..rows {
        for col in 0..cols {
            let latitude = GRID_ORIGIN.latitude
                + row as f64 * spacing_deg
                + rng.gen_range(-jitter..=jitter);
            let longitude = GRID_ORIGIN.longitude
                + col as f64 * spacing_deg
                + rng.gen_range(-jitter..=jitter);
            builder.add_vertex(Coordinate::new(latitude, longitude))?;
        }
    }

    let id = |row: usize, col: usize| -> VertexId { row * cols + col };
    for row in 0..rows {
        for col in 0..cols {
            if col + 1 < cols {
                let class = if row % 5 == 0 {
                    Highway::Primary
                } else {
                    Highway::Residential
                };
                add_street(&mut builder, id(row, col), id(row, col + 1), class, rng)?;
            }
            if row + 1 < rows {
                let class = if col % 5 == 0 {
                    Highway::Secondary
                } else {
                    Highway::Residential
                };
                add_street(&mut builder, id(row, col), id(row + 1, col), class, rng)?;
            }
        }
    }

    let graph = builder.build();
    info!(
        rows,
        cols,
        spacing_deg,
        edge_count = graph.edge_count(),
        "generated synthetic grid"
    );
    Ok(graph)
}

fn add_street<R: Rng + ?Sized>(
    builder: &mut GraphBuilder<WayTags>,
    from: VertexId,
    to: VertexId,
    class: Highway,
    rng: &mut R,
) -> Result<()> {
    if class == Highway::Residential && rng.gen_bool(MISSING_LINK_RATE) {
        return Ok(());
    }

    let mut tags = if class == Highway::Residential && rng.gen_bool(FOOTWAY_RATE) {
        WayTags::new(Highway::Footway).allow(Vehicle::Bicycle, true)
    } else {
        WayTags::new(class)
    };
    if rng.gen_bool(ONEWAY_RATE) {
        let direction = if rng.gen_bool(0.5) {
            Oneway::Forward
        } else {
            Oneway::Backward
        };
        tags = tags.oneway(direction);
    }
    if rng.gen_bool(CLOSED_RATE) {
        tags = tags.closed();
    }

    builder.add_way(from, to, tags)?;
    Ok(())
}
