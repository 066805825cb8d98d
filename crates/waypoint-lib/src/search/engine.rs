use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use tracing::{debug, trace};

use crate::error::Result;
use crate::graph::VertexId;
use crate::payload::EdgeData;
use crate::resolve::Endpoint;

use super::splice::{Join, QueryContext};
use super::{Leg, PredecessorChain};

/// Node of the per-query search space: real vertices plus the virtual
/// target splice. `Target` orders after every vertex.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) enum Node {
    Vertex(VertexId),
    Target,
}

#[derive(Debug, Clone, Copy)]
struct Predecessor {
    previous: Option<VertexId>,
    leg: Option<Leg>,
}

/// Tuning that distinguishes the strategies sharing this core.
pub(crate) struct CoreOptions<'h> {
    /// Lower-bound estimate of the remaining cost from a vertex.
    pub heuristic: Option<&'h dyn Fn(VertexId) -> Result<f64>>,
    /// Keep predecessor links so a path can be reconstructed.
    pub record_path: bool,
}

pub(crate) struct Outcome {
    pub weight: f64,
    pub chain: Option<PredecessorChain>,
    pub settled: usize,
}

/// Label-setting search from `source` to `target`.
///
/// Without a heuristic this is Dijkstra: a node is finalised the first time
/// it leaves the frontier and never again. With a heuristic nodes may be
/// reopened when a cheaper label turns up after expansion.
pub(crate) fn run<P: EdgeData>(
    ctx: &QueryContext<'_, P>,
    source: &Endpoint,
    target: &Endpoint,
    options: &CoreOptions<'_>,
) -> Result<Option<Outcome>> {
    source.validate(ctx.graph)?;
    target.validate(ctx.graph)?;

    if source == target {
        return Ok(Some(Outcome {
            weight: 0.0,
            chain: options
                .record_path
                .then(|| PredecessorChain::new(*source, *target, Vec::new(), 0.0)),
            settled: 0,
        }));
    }

    let goal = match target {
        Endpoint::Vertex { vertex, .. } => Node::Vertex(*vertex),
        Endpoint::Edge { .. } => Node::Target,
    };
    let arrivals = ctx.arrivals(target)?;
    let mut state = SearchState::new(options.record_path);
    let estimate = |node: Node| -> Result<f64> {
        match (node, options.heuristic) {
            (Node::Vertex(vertex), Some(heuristic)) => heuristic(vertex),
            _ => Ok(0.0),
        }
    };

    match source {
        Endpoint::Vertex { vertex, .. } => {
            let node = Node::Vertex(*vertex);
            state.offer(node, 0.0, estimate(node)?, None, None);
        }
        Endpoint::Edge { .. } => {
            for Join { vertex, leg, cost } in ctx.departures(source)? {
                let node = Node::Vertex(vertex);
                state.offer(node, cost, estimate(node)?, None, Some(leg));
            }
        }
    }
    if let Some((leg, cost)) = ctx.direct(source, target)? {
        state.offer(Node::Target, cost, 0.0, None, Some(leg));
    }

    let reopen = options.heuristic.is_some();
    while let Some(entry) = state.frontier.pop() {
        let node = entry.node;
        let cost = entry.cost.0;
        if state.is_stale(node, cost) || (!reopen && state.settled.contains(&node)) {
            continue;
        }
        state.settled.insert(node);

        if node == goal {
            debug!(
                weight = cost,
                settled = state.settled.len(),
                "search reached target"
            );
            let chain = if options.record_path {
                Some(state.chain(*source, *target, goal, cost))
            } else {
                None
            };
            return Ok(Some(Outcome {
                weight: cost,
                chain,
                settled: state.settled.len(),
            }));
        }

        let Node::Vertex(current) = node else {
            continue;
        };

        for edge in ctx.graph.outgoing_edges(current)? {
            let Some(weight) = ctx.edge_weight(&edge)? else {
                continue;
            };
            let next = Node::Vertex(edge.target);
            if !reopen && state.settled.contains(&next) {
                continue;
            }
            let next_cost = cost + weight;
            if state.improves(next, next_cost) {
                let heuristic = estimate(next)?;
                state.offer(
                    next,
                    next_cost,
                    heuristic,
                    Some(current),
                    Some(Leg::full(edge.id)),
                );
            }
        }

        for join in arrivals.iter().filter(|join| join.vertex == current) {
            state.offer(
                Node::Target,
                cost + join.cost,
                0.0,
                Some(current),
                Some(join.leg),
            );
        }
    }

    trace!(
        settled = state.settled.len(),
        "frontier exhausted before target"
    );
    Ok(None)
}

struct SearchState {
    costs: HashMap<Node, f64>,
    settled: HashSet<Node>,
    frontier: BinaryHeap<QueueEntry>,
    predecessors: Option<HashMap<Node, Predecessor>>,
}

impl SearchState {
    fn new(record_path: bool) -> Self {
        Self {
            costs: HashMap::new(),
            settled: HashSet::new(),
            frontier: BinaryHeap::new(),
            predecessors: record_path.then(HashMap::new),
        }
    }

    fn improves(&self, node: Node, cost: f64) -> bool {
        cost < *self.costs.get(&node).unwrap_or(&f64::INFINITY)
    }

    fn is_stale(&self, node: Node, cost: f64) -> bool {
        self.costs.get(&node).is_some_and(|best| cost > *best)
    }

    /// Record `cost` for `node` when it is a strict improvement.
    fn offer(
        &mut self,
        node: Node,
        cost: f64,
        heuristic: f64,
        previous: Option<VertexId>,
        leg: Option<Leg>,
    ) {
        if !self.improves(node, cost) {
            return;
        }
        self.costs.insert(node, cost);
        if let Some(predecessors) = self.predecessors.as_mut() {
            predecessors.insert(node, Predecessor { previous, leg });
        }
        self.frontier.push(QueueEntry::new(node, cost, heuristic));
    }

    fn chain(&self, source: Endpoint, target: Endpoint, goal: Node, weight: f64) -> PredecessorChain {
        let mut legs = Vec::new();
        if let Some(predecessors) = &self.predecessors {
            let mut node = goal;
            while let Some(step) = predecessors.get(&node) {
                if let Some(leg) = step.leg {
                    legs.push(leg);
                }
                match step.previous {
                    Some(previous) => node = Node::Vertex(previous),
                    None => break,
                }
            }
        }
        legs.reverse();
        PredecessorChain::new(source, target, legs, weight)
    }
}

#[derive(Copy, Clone, Debug, Default)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct QueueEntry {
    node: Node,
    cost: FloatOrd,
    estimate: FloatOrd,
}

impl QueueEntry {
    fn new(node: Node, cost: f64, heuristic: f64) -> Self {
        Self {
            node,
            cost: FloatOrd(cost),
            estimate: FloatOrd(cost + heuristic),
        }
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering so BinaryHeap becomes a min-heap by estimate.
        other
            .estimate
            .cmp(&self.estimate)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heap_pops_cheapest_then_lowest_node() {
        let mut heap = BinaryHeap::new();
        heap.push(QueueEntry::new(Node::Vertex(5), 2.0, 0.0));
        heap.push(QueueEntry::new(Node::Target, 1.0, 0.0));
        heap.push(QueueEntry::new(Node::Vertex(3), 1.0, 0.0));
        heap.push(QueueEntry::new(Node::Vertex(9), 1.0, 0.0));

        let order: Vec<Node> = std::iter::from_fn(|| heap.pop().map(|entry| entry.node)).collect();
        assert_eq!(
            order,
            vec![
                Node::Vertex(3),
                Node::Vertex(9),
                Node::Target,
                Node::Vertex(5)
            ]
        );
    }

    #[test]
    fn heuristic_shifts_priority() {
        let mut heap = BinaryHeap::new();
        heap.push(QueueEntry::new(Node::Vertex(1), 1.0, 5.0));
        heap.push(QueueEntry::new(Node::Vertex(2), 3.0, 0.0));
        assert_eq!(heap.pop().map(|entry| entry.node), Some(Node::Vertex(2)));
    }
}
