//! Benchmark over random grid queries.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use waypoint_lib::{
    generate_pairs, run_route_benchmark, run_weight_benchmark, BenchmarkKind, SearchAlgorithm,
    Vehicle,
};

use crate::args::NetworkArgs;
use crate::commands::build_router;
use crate::output::{print_json, OutputFormat};

/// Arguments for the bench command.
#[derive(Debug, Clone)]
pub struct BenchCommandArgs {
    pub algorithm: SearchAlgorithm,
    /// Query pairs to draw.
    pub pairs: usize,
    /// Vertex pair draws allowed before giving up.
    pub max_attempts: usize,
    /// Time full route construction instead of weight-only queries.
    pub full_route: bool,
}

/// Printable result of one benchmark run.
#[derive(Debug, Clone, Serialize)]
pub struct BenchSummary {
    pub algorithm: SearchAlgorithm,
    pub kind: BenchmarkKind,
    pub vehicle: Vehicle,
    pub vertices: usize,
    pub edges: usize,
    pub queries: usize,
    pub successes: usize,
    pub elapsed_ms: f64,
    pub average_us: f64,
}

/// Handle the bench subcommand.
pub fn handle_bench_command(
    network: &NetworkArgs,
    args: &BenchCommandArgs,
    format: OutputFormat,
) -> Result<()> {
    let graph = network.build_network()?;
    let router = build_router(&graph, network, args.algorithm)?;
    let vehicle = network.vehicle();

    let mut rng = network.query_rng();
    let pairs = generate_pairs(&router, vehicle, args.pairs, args.max_attempts, &mut rng)
        .context("failed to draw query pairs")?;
    if pairs.len() < args.pairs {
        info!(
            requested = args.pairs,
            generated = pairs.len(),
            "fewer query pairs than requested"
        );
    }

    let report = if args.full_route {
        run_route_benchmark(&router, vehicle, &pairs)
    } else {
        run_weight_benchmark(&router, vehicle, &pairs)
    }
    .context("benchmark query failed")?;
    let summary = BenchSummary {
        algorithm: report.algorithm,
        kind: report.kind,
        vehicle,
        vertices: graph.vertex_count(),
        edges: graph.edge_count(),
        queries: report.queries,
        successes: report.successes,
        elapsed_ms: report.elapsed.as_secs_f64() * 1_000.0,
        average_us: report.average().as_secs_f64() * 1_000_000.0,
    };

    match format {
        OutputFormat::Json => print_json(&summary)?,
        OutputFormat::Text => {
            let label = match summary.kind {
                BenchmarkKind::Weight => "weight",
                BenchmarkKind::Route => "route",
            };
            println!(
                "Benchmark ({} vertices, {} edges; algorithm: {}; vehicle: {}; {label} queries):",
                summary.vertices, summary.edges, summary.algorithm, summary.vehicle
            );
            println!("  queries:   {}", summary.queries);
            println!("  successes: {}", summary.successes);
            println!("  elapsed:   {:.3} ms", summary.elapsed_ms);
            println!("  average:   {:.1} us/query", summary.average_us);
        }
    }
    Ok(())
}
