//! Coordinates, distance metrics, and point-to-segment projection.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in metres (IUGG).
pub const EARTH_RADIUS_METERS: f64 = 6_371_008.8;

/// Geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }

    /// Linear interpolation towards `other`; `ratio` 0 yields `self`.
    pub fn interpolate(&self, other: &Coordinate, ratio: f64) -> Coordinate {
        Coordinate {
            latitude: self.latitude + (other.latitude - self.latitude) * ratio,
            longitude: self.longitude + (other.longitude - self.longitude) * ratio,
        }
    }

    /// `[longitude, latitude]` pair used as the R*-tree point type.
    pub(crate) fn to_xy(self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }
}

/// How lengths and resolution distances are measured on a graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Great-circle distance in metres.
    #[default]
    Haversine,
    /// Planar distance in raw coordinate units.
    Euclidean,
}

impl Metric {
    /// Distance between two coordinates under this metric.
    pub fn distance(self, a: &Coordinate, b: &Coordinate) -> f64 {
        match self {
            Metric::Haversine => haversine(a, b),
            Metric::Euclidean => {
                let dlat = b.latitude - a.latitude;
                let dlon = b.longitude - a.longitude;
                (dlat * dlat + dlon * dlon).sqrt()
            }
        }
    }

    /// Half-extent in `(longitude, latitude)` degrees of a box that contains
    /// every point within `radius` of `origin`.
    pub(crate) fn degree_span(self, origin: &Coordinate, radius: f64) -> (f64, f64) {
        match self {
            Metric::Euclidean => (radius, radius),
            Metric::Haversine => {
                let lat_span = (radius / EARTH_RADIUS_METERS).to_degrees();
                let cos_lat = origin.latitude.to_radians().cos().abs();
                let lon_span = if cos_lat < 1e-9 {
                    180.0
                } else {
                    (lat_span / cos_lat).min(180.0)
                };
                (lon_span, lat_span)
            }
        }
    }

    /// Longitude scale applied before planar projection so that one unit of
    /// x and one unit of y cover roughly the same ground distance.
    fn longitude_scale(self, origin: &Coordinate) -> f64 {
        match self {
            Metric::Euclidean => 1.0,
            Metric::Haversine => origin.latitude.to_radians().cos(),
        }
    }
}

fn haversine(a: &Coordinate, b: &Coordinate) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlat = lat2 - lat1;
    let dlon = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_METERS * h.sqrt().min(1.0).asin()
}

/// Foot of the perpendicular from a query point onto a segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Position along the segment, clamped to `[0, 1]`.
    pub ratio: f64,
    /// Interpolated coordinate at `ratio`.
    pub point: Coordinate,
    /// Distance from the query point to `point` under the metric.
    pub distance: f64,
}

/// Project `point` onto the segment `start -> end`.
///
/// The projection is computed in a local planar frame centred on `point`;
/// the ratio is clamped when the perpendicular foot falls outside the
/// segment. Degenerate segments project onto `start`.
pub fn project_onto_segment(
    metric: Metric,
    point: &Coordinate,
    start: &Coordinate,
    end: &Coordinate,
) -> Projection {
    let scale = metric.longitude_scale(point);
    let dx = (end.longitude - start.longitude) * scale;
    let dy = end.latitude - start.latitude;
    let px = (point.longitude - start.longitude) * scale;
    let py = point.latitude - start.latitude;

    let length_sq = dx * dx + dy * dy;
    let ratio = if length_sq > 0.0 {
        ((px * dx + py * dy) / length_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let foot = start.interpolate(end, ratio);
    Projection {
        ratio,
        point: foot,
        distance: metric.distance(point, &foot),
    }
}
