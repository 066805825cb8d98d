//! Edge payloads: the road attributes a vehicle profile inspects.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::profile::Vehicle;

/// Road classification, mirroring the common OpenStreetMap `highway` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Highway {
    Motorway,
    Trunk,
    Primary,
    Secondary,
    Tertiary,
    Unclassified,
    Residential,
    LivingStreet,
    Service,
    Track,
    Cycleway,
    Path,
    Footway,
    Pedestrian,
    Steps,
}

impl Highway {
    pub const ALL: [Highway; 15] = [
        Highway::Motorway,
        Highway::Trunk,
        Highway::Primary,
        Highway::Secondary,
        Highway::Tertiary,
        Highway::Unclassified,
        Highway::Residential,
        Highway::LivingStreet,
        Highway::Service,
        Highway::Track,
        Highway::Cycleway,
        Highway::Path,
        Highway::Footway,
        Highway::Pedestrian,
        Highway::Steps,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Highway::Motorway => "motorway",
            Highway::Trunk => "trunk",
            Highway::Primary => "primary",
            Highway::Secondary => "secondary",
            Highway::Tertiary => "tertiary",
            Highway::Unclassified => "unclassified",
            Highway::Residential => "residential",
            Highway::LivingStreet => "living_street",
            Highway::Service => "service",
            Highway::Track => "track",
            Highway::Cycleway => "cycleway",
            Highway::Path => "path",
            Highway::Footway => "footway",
            Highway::Pedestrian => "pedestrian",
            Highway::Steps => "steps",
        }
    }
}

impl fmt::Display for Highway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Highway {
    type Err = UnknownHighway;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        // `*_link` ramps route like their parent class.
        let base = normalized.strip_suffix("_link").unwrap_or(&normalized);
        Highway::ALL
            .iter()
            .copied()
            .find(|highway| highway.as_str() == base)
            .ok_or_else(|| UnknownHighway(value.to_string()))
    }
}

/// Returned when a `highway` value has no routable classification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown highway class '{0}'")]
pub struct UnknownHighway(pub String);

/// One-way restriction relative to the way's digitised direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Oneway {
    #[default]
    No,
    /// Travel only in the digitised direction.
    Forward,
    /// Travel only against the digitised direction.
    Backward,
}

/// Capability a graph payload must offer so profiles can judge it.
///
/// The search never looks at payloads directly; it only consumes the
/// verdict of a [`crate::profile::VehicleProfile`] built on this trait.
pub trait EdgeData {
    /// Road class, or `None` when the way is unclassified for routing.
    fn highway(&self) -> Option<Highway>;

    fn oneway(&self) -> Oneway;

    /// Explicit access override for `vehicle`, if any.
    fn access(&self, vehicle: Vehicle) -> Option<bool>;

    /// Posted speed limit in km/h.
    fn max_speed_kmh(&self) -> Option<f64>;
}

/// Stock payload: the handful of way tags routing depends on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WayTags {
    pub highway: Option<Highway>,
    pub oneway: Oneway,
    pub max_speed_kmh: Option<f64>,
    /// General `access` tag.
    pub access: Option<bool>,
    /// Vehicle-specific overrides (`motor_vehicle`, `bicycle`, `foot`).
    pub vehicle_access: Vec<(Vehicle, bool)>,
}

impl WayTags {
    pub fn new(highway: Highway) -> Self {
        Self {
            highway: Some(highway),
            ..Self::default()
        }
    }

    /// A way with no routable classification.
    pub fn unclassified() -> Self {
        Self::default()
    }

    pub fn oneway(mut self, oneway: Oneway) -> Self {
        self.oneway = oneway;
        self
    }

    pub fn max_speed(mut self, kmh: f64) -> Self {
        self.max_speed_kmh = Some(kmh);
        self
    }

    /// Deny access to every vehicle.
    pub fn closed(mut self) -> Self {
        self.access = Some(false);
        self
    }

    pub fn allow(mut self, vehicle: Vehicle, allowed: bool) -> Self {
        self.vehicle_access.retain(|(existing, _)| *existing != vehicle);
        self.vehicle_access.push((vehicle, allowed));
        self
    }
}

impl EdgeData for WayTags {
    fn highway(&self) -> Option<Highway> {
        self.highway
    }

    fn oneway(&self) -> Oneway {
        self.oneway
    }

    fn access(&self, vehicle: Vehicle) -> Option<bool> {
        self.vehicle_access
            .iter()
            .find(|(candidate, _)| *candidate == vehicle)
            .map(|(_, allowed)| *allowed)
            .or(self.access)
    }

    fn max_speed_kmh(&self) -> Option<f64> {
        self.max_speed_kmh
    }
}
