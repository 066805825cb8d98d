//! Random query workloads: pair generation, timing, and router comparison.
//!
//! Everything here is a consumer of the four [`Router`] operations. The
//! random source is always passed in so runs are reproducible.

use std::time::{Duration, Instant};

use rand::Rng;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::graph::VertexId;
use crate::payload::EdgeData;
use crate::profile::{Vehicle, VehicleProfile};
use crate::resolve::Endpoint;
use crate::router::Router;
use crate::search::SearchAlgorithm;

/// Two resolved, connectivity-checked endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QueryPair {
    /// Vertex whose coordinate was resolved into `from`.
    pub origin: VertexId,
    /// Vertex whose coordinate was resolved into `to`.
    pub destination: VertexId,
    pub from: Endpoint,
    pub to: Endpoint,
}

/// Draw up to `count` query pairs from random vertices.
///
/// Each attempt picks two vertices uniformly, resolves their coordinates
/// through `router` and keeps the pair only when both endpoints pass the
/// connectivity probe with the router's configured hop limit. Gives up
/// after `max_attempts` draws and returns whatever was collected.
pub fn generate_pairs<P, Pr, R>(
    router: &Router<'_, P, Pr>,
    vehicle: Vehicle,
    count: usize,
    max_attempts: usize,
    rng: &mut R,
) -> Result<Vec<QueryPair>>
where
    P: EdgeData + 'static,
    Pr: VehicleProfile<P>,
    R: Rng + ?Sized,
{
    let graph = router.graph();
    let mut pairs = Vec::with_capacity(count);
    if graph.is_empty() {
        warn!("cannot draw query pairs from an empty graph");
        return Ok(pairs);
    }

    let hop_limit = router.config().probe.hop_limit;
    let mut attempts = 0usize;
    while pairs.len() < count && attempts < max_attempts {
        attempts += 1;
        let origin = rng.gen_range(0..graph.vertex_count());
        let destination = rng.gen_range(0..graph.vertex_count());

        let Some(from) = router.resolve(vehicle, &graph.coordinate(origin)?)? else {
            continue;
        };
        let Some(to) = router.resolve(vehicle, &graph.coordinate(destination)?)? else {
            continue;
        };
        if !router.check_connectivity(vehicle, &from, hop_limit)?
            || !router.check_connectivity(vehicle, &to, hop_limit)?
        {
            continue;
        }

        pairs.push(QueryPair {
            origin,
            destination,
            from,
            to,
        });
    }

    debug!(
        requested = count,
        generated = pairs.len(),
        attempts,
        "drew query pairs"
    );
    Ok(pairs)
}

/// Which router operation a benchmark timed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BenchmarkKind {
    /// `calculate_weight` only.
    Weight,
    /// `calculate`, including route construction.
    Route,
}

/// Timing summary of a benchmark run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkReport {
    pub algorithm: SearchAlgorithm,
    pub kind: BenchmarkKind,
    pub queries: usize,
    /// Queries that found a route.
    pub successes: usize,
    pub elapsed: Duration,
}

impl BenchmarkReport {
    pub fn average(&self) -> Duration {
        match u32::try_from(self.queries) {
            Ok(queries) if queries > 0 => self.elapsed / queries,
            _ => Duration::ZERO,
        }
    }
}

/// Run `calculate_weight` over every pair and count the finite results.
pub fn run_weight_benchmark<P, Pr>(
    router: &Router<'_, P, Pr>,
    vehicle: Vehicle,
    pairs: &[QueryPair],
) -> Result<BenchmarkReport>
where
    P: EdgeData + 'static,
    Pr: VehicleProfile<P>,
{
    time_queries(router, BenchmarkKind::Weight, pairs, |pair| {
        Ok(router
            .calculate_weight(vehicle, &pair.from, &pair.to)?
            .is_finite())
    })
}

/// Run `calculate` over every pair and count the routes found.
pub fn run_route_benchmark<P, Pr>(
    router: &Router<'_, P, Pr>,
    vehicle: Vehicle,
    pairs: &[QueryPair],
) -> Result<BenchmarkReport>
where
    P: EdgeData + 'static,
    Pr: VehicleProfile<P>,
{
    time_queries(router, BenchmarkKind::Route, pairs, |pair| {
        Ok(router.calculate(vehicle, &pair.from, &pair.to)?.is_some())
    })
}

fn time_queries<P, Pr, F>(
    router: &Router<'_, P, Pr>,
    kind: BenchmarkKind,
    pairs: &[QueryPair],
    mut query: F,
) -> Result<BenchmarkReport>
where
    P: EdgeData + 'static,
    Pr: VehicleProfile<P>,
    F: FnMut(&QueryPair) -> Result<bool>,
{
    let started = Instant::now();
    let mut successes = 0usize;
    for pair in pairs {
        if query(pair)? {
            successes += 1;
        }
    }

    let report = BenchmarkReport {
        algorithm: router.algorithm(),
        kind,
        queries: pairs.len(),
        successes,
        elapsed: started.elapsed(),
    };
    info!(
        algorithm = %report.algorithm,
        kind = ?report.kind,
        queries = report.queries,
        successes = report.successes,
        average_us = report.average().as_micros() as u64,
        "benchmark finished"
    );
    Ok(report)
}

/// Outcome of routing the same pairs with two routers.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ComparisonReport {
    pub compared: usize,
    /// Both routers agree on reachability and, within tolerance, on weight.
    pub matches: usize,
    pub weight_mismatches: usize,
    /// Reference found a route the candidate did not.
    pub missing_in_candidate: usize,
    /// Candidate found a route the reference did not.
    pub missing_in_reference: usize,
    /// Largest absolute weight difference among routes both found.
    pub max_weight_difference: f64,
    /// Index into the pairs of the first disagreement.
    pub first_mismatch: Option<usize>,
}

impl ComparisonReport {
    pub fn is_consistent(&self) -> bool {
        self.compared == self.matches
    }
}

/// Route every pair with `candidate` and `reference` and tally the drift.
///
/// Routes are compared by total weight: different equal-weight paths are
/// not a disagreement.
pub fn compare_routers<P, Pc, Pr>(
    candidate: &Router<'_, P, Pc>,
    reference: &Router<'_, P, Pr>,
    vehicle: Vehicle,
    pairs: &[QueryPair],
    tolerance: f64,
) -> Result<ComparisonReport>
where
    P: EdgeData + 'static,
    Pc: VehicleProfile<P>,
    Pr: VehicleProfile<P>,
{
    let mut report = ComparisonReport::default();
    for (index, pair) in pairs.iter().enumerate() {
        report.compared += 1;
        let found = candidate.calculate(vehicle, &pair.from, &pair.to)?;
        let expected = reference.calculate(vehicle, &pair.from, &pair.to)?;

        let agrees = match (&found, &expected) {
            (Some(route), Some(reference_route)) => {
                let difference = (route.total_weight - reference_route.total_weight).abs();
                report.max_weight_difference = report.max_weight_difference.max(difference);
                if difference <= tolerance {
                    true
                } else {
                    report.weight_mismatches += 1;
                    false
                }
            }
            (None, Some(_)) => {
                report.missing_in_candidate += 1;
                false
            }
            (Some(_), None) => {
                report.missing_in_reference += 1;
                false
            }
            (None, None) => true,
        };

        if agrees {
            report.matches += 1;
        } else {
            if report.first_mismatch.is_none() {
                report.first_mismatch = Some(index);
            }
            debug!(
                index,
                origin = pair.origin,
                destination = pair.destination,
                "routers disagree"
            );
        }
    }

    info!(
        candidate = %candidate.algorithm(),
        reference = %reference.algorithm(),
        compared = report.compared,
        matches = report.matches,
        "router comparison finished"
    );
    Ok(report)
}
