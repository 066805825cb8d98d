//! The four query operations bundled over one graph and profile.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::geo::Coordinate;
use crate::graph::RoutableGraph;
use crate::payload::EdgeData;
use crate::probe::{is_connected, ProbeSettings};
use crate::profile::{Vehicle, VehicleProfile};
use crate::resolve::{resolve, Endpoint};
use crate::route::{build_route, Route};
use crate::search::{select_search, Dijkstra, PathSearch, SearchAlgorithm, UNREACHABLE_WEIGHT};

/// Query-time settings supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Resolution radius in the graph metric's unit (metres for
    /// haversine graphs).
    pub search_radius: f64,
    pub probe: ProbeSettings,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            search_radius: 100.0,
            probe: ProbeSettings::default(),
        }
    }
}

impl RouterConfig {
    pub fn with_search_radius(mut self, radius: f64) -> Self {
        self.search_radius = radius;
        self
    }

    pub fn with_probe(mut self, probe: ProbeSettings) -> Self {
        self.probe = probe;
        self
    }
}

/// Read-only routing facade.
///
/// Holds a borrowed graph, a profile and a search strategy; every query
/// allocates its own state, so one router may serve many threads.
pub struct Router<'g, P, Pr> {
    graph: &'g RoutableGraph<P>,
    profile: Pr,
    search: Box<dyn PathSearch<P>>,
    config: RouterConfig,
}

impl<'g, P, Pr> Router<'g, P, Pr>
where
    P: EdgeData + 'static,
    Pr: VehicleProfile<P>,
{
    /// Router using Dijkstra.
    pub fn new(graph: &'g RoutableGraph<P>, profile: Pr, config: RouterConfig) -> Self {
        Self {
            graph,
            profile,
            search: Box::new(Dijkstra),
            config,
        }
    }

    /// Router using the strategy registered for `algorithm`.
    pub fn with_algorithm(
        graph: &'g RoutableGraph<P>,
        profile: Pr,
        algorithm: SearchAlgorithm,
        config: RouterConfig,
    ) -> Result<Self> {
        let search = select_search(algorithm)?;
        Ok(Self::new(graph, profile, config).with_search(search))
    }

    /// Replace the search strategy.
    pub fn with_search(mut self, search: Box<dyn PathSearch<P>>) -> Self {
        self.search = search;
        self
    }

    pub fn graph(&self) -> &'g RoutableGraph<P> {
        self.graph
    }

    pub fn profile(&self) -> &Pr {
        &self.profile
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    pub fn algorithm(&self) -> SearchAlgorithm {
        self.search.algorithm()
    }

    /// Snap `coordinate` onto the graph; `None` when nothing usable is in
    /// range.
    pub fn resolve(&self, vehicle: Vehicle, coordinate: &Coordinate) -> Result<Option<Endpoint>> {
        resolve(
            self.graph,
            &self.profile,
            vehicle,
            coordinate,
            self.config.search_radius,
        )
    }

    /// Bounded connectivity probe with the configured vertex threshold.
    pub fn check_connectivity(
        &self,
        vehicle: Vehicle,
        endpoint: &Endpoint,
        hop_limit: usize,
    ) -> Result<bool> {
        let settings = self.config.probe.with_hop_limit(hop_limit);
        is_connected(self.graph, &self.profile, vehicle, endpoint, &settings)
    }

    /// Minimal route weight, [`UNREACHABLE_WEIGHT`] when no route exists.
    pub fn calculate_weight(&self, vehicle: Vehicle, from: &Endpoint, to: &Endpoint) -> Result<f64> {
        let weight = self
            .search
            .weight(self.graph, &self.profile, vehicle, from, to)?;
        Ok(weight.unwrap_or(UNREACHABLE_WEIGHT))
    }

    /// Full route, `None` when no route exists.
    pub fn calculate(&self, vehicle: Vehicle, from: &Endpoint, to: &Endpoint) -> Result<Option<Route>> {
        let Some(chain) = self
            .search
            .path(self.graph, &self.profile, vehicle, from, to)?
        else {
            debug!(%vehicle, algorithm = %self.algorithm(), "no route between endpoints");
            return Ok(None);
        };
        build_route(self.graph, &chain, &self.profile, vehicle).map(Some)
    }
}
