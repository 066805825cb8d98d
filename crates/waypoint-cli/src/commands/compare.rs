//! Route the same random queries with two strategies and report the drift.

use anyhow::{bail, Context, Result};
use serde::Serialize;

use waypoint_lib::{compare_routers, generate_pairs, ComparisonReport, SearchAlgorithm, Vehicle};

use crate::args::NetworkArgs;
use crate::commands::build_router;
use crate::output::{format_weight, print_json, OutputFormat};

/// Arguments for the compare command.
#[derive(Debug, Clone)]
pub struct CompareCommandArgs {
    pub candidate: SearchAlgorithm,
    pub reference: SearchAlgorithm,
    pub pairs: usize,
    pub max_attempts: usize,
    /// Largest absolute weight difference still counted as agreement.
    pub tolerance: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompareSummary {
    pub candidate: SearchAlgorithm,
    pub reference: SearchAlgorithm,
    pub vehicle: Vehicle,
    pub consistent: bool,
    #[serde(flatten)]
    pub report: ComparisonReport,
}

/// Handle the compare subcommand.
///
/// Fails when the routers disagree so scripted runs can gate on the exit
/// status.
pub fn handle_compare_command(
    network: &NetworkArgs,
    args: &CompareCommandArgs,
    format: OutputFormat,
) -> Result<()> {
    let graph = network.build_network()?;
    let candidate = build_router(&graph, network, args.candidate)?;
    let reference = build_router(&graph, network, args.reference)?;
    let vehicle = network.vehicle();

    let mut rng = network.query_rng();
    let pairs = generate_pairs(&reference, vehicle, args.pairs, args.max_attempts, &mut rng)
        .context("failed to draw query pairs")?;
    let report = compare_routers(&candidate, &reference, vehicle, &pairs, args.tolerance)
        .context("comparison query failed")?;

    let summary = CompareSummary {
        candidate: args.candidate,
        reference: args.reference,
        vehicle,
        consistent: report.is_consistent(),
        report,
    };

    match format {
        OutputFormat::Json => print_json(&summary)?,
        OutputFormat::Text => render_text(&summary),
    }

    if !summary.consistent {
        bail!(
            "{} disagrees with {} on {} of {} pairs",
            summary.candidate,
            summary.reference,
            summary.report.compared - summary.report.matches,
            summary.report.compared
        );
    }
    Ok(())
}

fn render_text(summary: &CompareSummary) {
    let report = &summary.report;
    println!(
        "Compared {} pairs (candidate: {}; reference: {}; vehicle: {}):",
        report.compared, summary.candidate, summary.reference, summary.vehicle
    );
    println!("  matches:              {}", report.matches);
    println!("  weight mismatches:    {}", report.weight_mismatches);
    println!("  missing in candidate: {}", report.missing_in_candidate);
    println!("  missing in reference: {}", report.missing_in_reference);
    println!(
        "  max weight difference: {}",
        format_weight(report.max_weight_difference)
    );
    if let Some(index) = report.first_mismatch {
        println!("  first mismatch at pair {index}");
    }
    if summary.consistent {
        println!("Routers are consistent.");
    }
}
