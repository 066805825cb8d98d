//! Route command handler: resolve two coordinates and route between them.

use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use tracing::warn;

use waypoint_lib::{Coordinate, Endpoint, Route, SearchAlgorithm, Vehicle};

use crate::args::NetworkArgs;
use crate::commands::{build_router, CliRouter};
use crate::output::{format_weight, print_json, OutputFormat};

/// Arguments for the route command.
#[derive(Debug, Clone)]
pub struct RouteCommandArgs {
    pub from: Coordinate,
    pub to: Coordinate,
    pub algorithm: SearchAlgorithm,
}

#[derive(Debug, Clone, Serialize)]
pub struct RouteSummary {
    pub algorithm: SearchAlgorithm,
    pub vehicle: Vehicle,
    pub from: Endpoint,
    pub to: Endpoint,
    /// Connectivity probe result for each endpoint.
    pub from_connected: bool,
    pub to_connected: bool,
    pub route: Option<Route>,
}

/// Handle the route subcommand.
///
/// Coordinates with no passable road in range are an error here; a missing
/// route between two resolved endpoints is reported, not raised.
pub fn handle_route_command(
    network: &NetworkArgs,
    args: &RouteCommandArgs,
    format: OutputFormat,
) -> Result<()> {
    let graph = network.build_network()?;
    let router = build_router(&graph, network, args.algorithm)?;
    let vehicle = network.vehicle();

    let from = resolve_endpoint(&router, vehicle, &args.from, network.radius)?;
    let to = resolve_endpoint(&router, vehicle, &args.to, network.radius)?;

    let from_connected = router.check_connectivity(vehicle, &from, network.hop_limit)?;
    let to_connected = router.check_connectivity(vehicle, &to, network.hop_limit)?;
    if !from_connected || !to_connected {
        warn!(
            from_connected,
            to_connected, "endpoint sits on a small island of the network"
        );
    }

    let route = router
        .calculate(vehicle, &from, &to)
        .context("route calculation failed")?;

    let summary = RouteSummary {
        algorithm: router.algorithm(),
        vehicle,
        from,
        to,
        from_connected,
        to_connected,
        route,
    };

    match format {
        OutputFormat::Json => print_json(&summary)?,
        OutputFormat::Text => render_text(&summary),
    }
    Ok(())
}

fn resolve_endpoint(
    router: &CliRouter<'_>,
    vehicle: Vehicle,
    coordinate: &Coordinate,
    radius: f64,
) -> Result<Endpoint> {
    router
        .resolve(vehicle, coordinate)
        .with_context(|| format!("failed to resolve {coordinate:?}"))?
        .ok_or_else(|| {
            anyhow!(
                "no road passable by {vehicle} within {radius} m of {},{}",
                coordinate.latitude,
                coordinate.longitude
            )
        })
}

fn render_text(summary: &RouteSummary) {
    let Some(route) = &summary.route else {
        println!(
            "No route found (algorithm: {}; vehicle: {}).",
            summary.algorithm, summary.vehicle
        );
        return;
    };

    println!(
        "Route with {} points (algorithm: {}; vehicle: {}):",
        route.len(),
        summary.algorithm,
        summary.vehicle
    );
    for entry in &route.entries {
        let label = entry
            .vertex
            .map_or_else(|| "-".to_string(), |vertex| vertex.to_string());
        println!(
            "- {:.6},{:.6} (vertex {}) {:.1} m, weight {}",
            entry.coordinate.latitude,
            entry.coordinate.longitude,
            label,
            entry.distance,
            format_weight(entry.weight)
        );
    }
    println!("\nTotal distance: {:.1} m", route.total_distance);
    println!("Total weight: {}", format_weight(route.total_weight));
}
