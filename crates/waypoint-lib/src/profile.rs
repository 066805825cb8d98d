//! Vehicle profiles: the pure mapping from edge payload and travel
//! direction to passability and weight.
//!
//! Profiles are stateless and shared freely between threads and queries. The
//! search algorithms treat them as a black box, which is what keeps routing
//! vehicle-agnostic.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::payload::{EdgeData, Highway, Oneway};

/// Vehicle classes supported by the stock profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Vehicle {
    Car,
    Bicycle,
    Pedestrian,
}

impl Vehicle {
    pub const ALL: [Vehicle; 3] = [Vehicle::Car, Vehicle::Bicycle, Vehicle::Pedestrian];

    /// Whether one-way restrictions bind this vehicle.
    pub fn honours_oneway(self) -> bool {
        !matches!(self, Vehicle::Pedestrian)
    }
}

impl fmt::Display for Vehicle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            Vehicle::Car => "car",
            Vehicle::Bicycle => "bicycle",
            Vehicle::Pedestrian => "pedestrian",
        };
        f.write_str(value)
    }
}

impl FromStr for Vehicle {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "car" => Ok(Vehicle::Car),
            "bicycle" | "bike" => Ok(Vehicle::Bicycle),
            "pedestrian" | "foot" => Ok(Vehicle::Pedestrian),
            other => Err(format!("unknown vehicle class '{other}'")),
        }
    }
}

/// Travel direction along a way relative to its digitised orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    pub fn reverse(self) -> Self {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }
}

/// A profile's verdict for one directed traversal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Traversal {
    pub passable: bool,
    pub weight: f64,
}

impl Traversal {
    pub const fn passable(weight: f64) -> Self {
        Self {
            passable: true,
            weight,
        }
    }

    pub const fn blocked() -> Self {
        Self {
            passable: false,
            weight: f64::INFINITY,
        }
    }

    /// Weight when passable.
    pub fn weight(&self) -> Option<f64> {
        self.passable.then_some(self.weight)
    }
}

/// Turns raw way attributes into traversal permission and cost.
///
/// Implementations must be pure and total: the same inputs always yield the
/// same verdict, and payloads a profile does not understand are reported as
/// blocked. Weights must be non-negative and must grow with `length`.
pub trait VehicleProfile<P: EdgeData>: Send + Sync {
    fn evaluate(&self, vehicle: Vehicle, payload: &P, length: f64, direction: Direction)
        -> Traversal;

    /// Lower bound on weight per unit of length for `vehicle`. Heuristic
    /// searches multiply straight-line distance by this value.
    fn min_weight_per_length(&self, vehicle: Vehicle) -> f64;
}

/// Cruising speed in km/h for a vehicle on a road class, or `None` when the
/// class is closed to that vehicle by default.
pub fn default_speed_kmh(vehicle: Vehicle, highway: Highway) -> Option<f64> {
    use Highway::*;

    match vehicle {
        Vehicle::Car => match highway {
            Motorway => Some(120.0),
            Trunk => Some(90.0),
            Primary => Some(70.0),
            Secondary => Some(60.0),
            Tertiary => Some(50.0),
            Unclassified => Some(40.0),
            Residential => Some(30.0),
            Service => Some(20.0),
            LivingStreet => Some(10.0),
            Track | Cycleway | Path | Footway | Pedestrian | Steps => None,
        },
        Vehicle::Bicycle => match highway {
            Motorway | Trunk | Steps => None,
            Cycleway => Some(18.0),
            Track | Path => Some(12.0),
            Footway | Pedestrian => Some(8.0),
            _ => Some(15.0),
        },
        Vehicle::Pedestrian => match highway {
            Motorway | Trunk => None,
            Steps => Some(3.0),
            _ => Some(5.0),
        },
    }
}

fn fastest_default_speed(vehicle: Vehicle) -> f64 {
    Highway::ALL
        .iter()
        .filter_map(|highway| default_speed_kmh(vehicle, *highway))
        .fold(0.0, f64::max)
}

/// Effective speed in km/h when `vehicle` may travel `payload` in
/// `direction`, `None` otherwise.
fn permitted_speed<P: EdgeData>(vehicle: Vehicle, payload: &P, direction: Direction) -> Option<f64> {
    let highway = payload.highway()?;

    if vehicle.honours_oneway() {
        let blocked = match payload.oneway() {
            Oneway::No => false,
            Oneway::Forward => direction == Direction::Backward,
            Oneway::Backward => direction == Direction::Forward,
        };
        if blocked {
            return None;
        }
    }

    let class_speed = match payload.access(vehicle) {
        Some(false) => return None,
        Some(true) => default_speed_kmh(vehicle, highway).or(Some(fallback_speed_kmh(vehicle))),
        None => default_speed_kmh(vehicle, highway),
    }?;

    let speed = match payload.max_speed_kmh() {
        Some(limit) if limit.is_finite() && limit > 0.0 => class_speed.min(limit),
        _ => class_speed,
    };
    Some(speed)
}

fn fallback_speed_kmh(vehicle: Vehicle) -> f64 {
    match vehicle {
        Vehicle::Car => 20.0,
        Vehicle::Bicycle => 12.0,
        Vehicle::Pedestrian => 5.0,
    }
}

/// Weight equals geometric length; access and one-way rules still apply.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShortestProfile;

impl<P: EdgeData> VehicleProfile<P> for ShortestProfile {
    fn evaluate(
        &self,
        vehicle: Vehicle,
        payload: &P,
        length: f64,
        direction: Direction,
    ) -> Traversal {
        match permitted_speed(vehicle, payload, direction) {
            Some(_) => Traversal::passable(length),
            None => Traversal::blocked(),
        }
    }

    fn min_weight_per_length(&self, _vehicle: Vehicle) -> f64 {
        1.0
    }
}

/// Weight is travel time in seconds, assuming lengths in metres.
#[derive(Debug, Clone, Copy, Default)]
pub struct FastestProfile;

impl FastestProfile {
    const KMH_TO_MPS: f64 = 1_000.0 / 3_600.0;
}

impl<P: EdgeData> VehicleProfile<P> for FastestProfile {
    fn evaluate(
        &self,
        vehicle: Vehicle,
        payload: &P,
        length: f64,
        direction: Direction,
    ) -> Traversal {
        match permitted_speed(vehicle, payload, direction) {
            Some(speed) => Traversal::passable(length / (speed * Self::KMH_TO_MPS)),
            None => Traversal::blocked(),
        }
    }

    fn min_weight_per_length(&self, vehicle: Vehicle) -> f64 {
        let top = fastest_default_speed(vehicle).max(fallback_speed_kmh(vehicle));
        1.0 / (top * Self::KMH_TO_MPS)
    }
}

/// Vehicle-class-independent selector used by configuration surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileKind {
    Shortest,
    #[default]
    Fastest,
}

impl fmt::Display for ProfileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ProfileKind::Shortest => "shortest",
            ProfileKind::Fastest => "fastest",
        })
    }
}

impl ProfileKind {
    pub fn build<P: EdgeData + 'static>(self) -> Box<dyn VehicleProfile<P>> {
        match self {
            ProfileKind::Shortest => Box::new(ShortestProfile),
            ProfileKind::Fastest => Box::new(FastestProfile),
        }
    }
}

impl<P: EdgeData, T: VehicleProfile<P> + ?Sized> VehicleProfile<P> for Box<T> {
    fn evaluate(
        &self,
        vehicle: Vehicle,
        payload: &P,
        length: f64,
        direction: Direction,
    ) -> Traversal {
        (**self).evaluate(vehicle, payload, length, direction)
    }

    fn min_weight_per_length(&self, vehicle: Vehicle) -> f64 {
        (**self).min_weight_per_length(vehicle)
    }
}
