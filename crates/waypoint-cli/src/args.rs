//! Clap-facing mirrors of the library's selector enums plus shared flags.

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use waypoint_lib::synthetic::grid_network;
use waypoint_lib::{
    Coordinate, ProfileKind, ProbeSettings, RoutableGraph, RouterConfig, SearchAlgorithm, Vehicle,
    WayTags,
};

/// Vehicle class accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum VehicleArg {
    #[default]
    Car,
    Bicycle,
    Pedestrian,
}

impl From<VehicleArg> for Vehicle {
    fn from(value: VehicleArg) -> Self {
        match value {
            VehicleArg::Car => Vehicle::Car,
            VehicleArg::Bicycle => Vehicle::Bicycle,
            VehicleArg::Pedestrian => Vehicle::Pedestrian,
        }
    }
}

/// Weighting profile accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ProfileArg {
    Shortest,
    #[default]
    Fastest,
}

impl From<ProfileArg> for ProfileKind {
    fn from(value: ProfileArg) -> Self {
        match value {
            ProfileArg::Shortest => ProfileKind::Shortest,
            ProfileArg::Fastest => ProfileKind::Fastest,
        }
    }
}

/// Search strategy accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum AlgorithmArg {
    #[default]
    Dijkstra,
    AStar,
    ContractionHierarchy,
}

impl From<AlgorithmArg> for SearchAlgorithm {
    fn from(value: AlgorithmArg) -> Self {
        match value {
            AlgorithmArg::Dijkstra => SearchAlgorithm::Dijkstra,
            AlgorithmArg::AStar => SearchAlgorithm::AStar,
            AlgorithmArg::ContractionHierarchy => SearchAlgorithm::ContractionHierarchy,
        }
    }
}

/// Synthetic network and query settings shared by every subcommand.
#[derive(Debug, Clone, Args)]
pub struct NetworkArgs {
    /// Grid rows.
    #[arg(long, default_value_t = 30)]
    pub rows: usize,
    /// Grid columns.
    #[arg(long, default_value_t = 30)]
    pub cols: usize,
    /// Distance between neighbouring grid vertices in degrees.
    #[arg(long, default_value_t = 0.001)]
    pub spacing: f64,
    /// Seed for the network generator and query sampling.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
    /// Vehicle class to route for.
    #[arg(long, value_enum, default_value_t = VehicleArg::Car)]
    pub vehicle: VehicleArg,
    /// Edge weighting profile.
    #[arg(long, value_enum, default_value_t = ProfileArg::Fastest)]
    pub profile: ProfileArg,
    /// Resolution radius in metres.
    #[arg(long, default_value_t = 100.0)]
    pub radius: f64,
    /// Hop limit for the connectivity probe.
    #[arg(long, default_value_t = 30)]
    pub hop_limit: usize,
}

impl NetworkArgs {
    pub fn vehicle(&self) -> Vehicle {
        self.vehicle.into()
    }

    pub fn router_config(&self) -> RouterConfig {
        RouterConfig::default()
            .with_search_radius(self.radius)
            .with_probe(ProbeSettings::default().with_hop_limit(self.hop_limit))
    }

    /// Generate the grid for these settings.
    pub fn build_network(&self) -> Result<RoutableGraph<WayTags>> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        grid_network(self.rows, self.cols, self.spacing, &mut rng).with_context(|| {
            format!(
                "failed to generate a {}x{} grid with spacing {}",
                self.rows, self.cols, self.spacing
            )
        })
    }

    /// Generator for query sampling, independent of the network stream.
    pub fn query_rng(&self) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.seed.wrapping_add(1))
    }
}

/// Parse a `latitude,longitude` pair.
pub fn parse_coordinate(value: &str) -> std::result::Result<Coordinate, String> {
    let (latitude, longitude) = value
        .split_once(',')
        .ok_or_else(|| format!("expected 'latitude,longitude', got '{value}'"))?;
    let latitude: f64 = latitude
        .trim()
        .parse()
        .map_err(|_| format!("invalid latitude '{}'", latitude.trim()))?;
    let longitude: f64 = longitude
        .trim()
        .parse()
        .map_err(|_| format!("invalid longitude '{}'", longitude.trim()))?;

    let coordinate = Coordinate::new(latitude, longitude);
    if !coordinate.is_finite() {
        return Err(format!("coordinate '{value}' is not finite"));
    }
    Ok(coordinate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_coordinates_with_spaces() {
        let coordinate = parse_coordinate("52.001, 13.002").unwrap();
        assert_eq!(coordinate, Coordinate::new(52.001, 13.002));
    }

    #[test]
    fn rejects_malformed_coordinates() {
        assert!(parse_coordinate("52.0").is_err());
        assert!(parse_coordinate("north,13").is_err());
        assert!(parse_coordinate("NaN,13").is_err());
    }

    #[test]
    fn algorithm_names_match_the_library() {
        for arg in AlgorithmArg::value_variants() {
            let name = arg.to_possible_value().unwrap().get_name().to_string();
            let algorithm: SearchAlgorithm = (*arg).into();
            assert_eq!(name, algorithm.to_string());
        }
    }

    #[test]
    fn vehicle_names_match_the_library() {
        for arg in VehicleArg::value_variants() {
            let name = arg.to_possible_value().unwrap().get_name().to_string();
            let vehicle: Vehicle = (*arg).into();
            assert_eq!(name, vehicle.to_string());
        }
    }
}
