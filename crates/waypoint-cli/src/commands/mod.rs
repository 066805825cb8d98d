// Handlers for the CLI subcommands.
//
// main.rs parses arguments and dispatches here; each module owns one subcommand.

pub mod bench;
pub mod compare;
pub mod route;

use anyhow::{Context, Result};

use waypoint_lib::{ProfileKind, RoutableGraph, Router, SearchAlgorithm, VehicleProfile, WayTags};

use crate::args::NetworkArgs;

/// Router over a synthetic grid with a profile chosen at runtime.
pub type CliRouter<'g> = Router<'g, WayTags, Box<dyn VehicleProfile<WayTags>>>;

/// Build a router for `algorithm` using the profile and radius in `network`.
pub fn build_router<'g>(
    graph: &'g RoutableGraph<WayTags>,
    network: &NetworkArgs,
    algorithm: SearchAlgorithm,
) -> Result<CliRouter<'g>> {
    let profile = ProfileKind::from(network.profile).build::<WayTags>();
    Router::with_algorithm(graph, profile, algorithm, network.router_config())
        .with_context(|| format!("failed to build a {algorithm} router"))
}
