//! Scenario enumeration
//!
//! A scenario is a maximal chain of mutually eligible events: it starts at
//! an event nothing may precede, steps to immediate successors only, and
//! stops at an event nothing may follow. Overlapping events are therefore
//! alternatives, and each choice between them is a separate scenario.
//!
//! Scenarios are enumerated best-first by `-ln(probability)`.

use std::cmp::{Ordering, Reverse};
use std::collections::{BTreeSet, BinaryHeap, HashSet};

use tracing::{debug, instrument, trace};

use chronos_algebra::{ChangeSet, EventId};

use crate::graph::EventGraph;
use crate::metric::Metric;
use crate::path::Path;

use super::Navigator;

/// Cost contributed by an event of probability `prob`.
fn surprise(prob: f64) -> f64 {
    if prob >= 1.0 { 0.0 } else { -prob.ln() }
}

/// Partial scenario on the search frontier.
#[derive(Debug, Clone)]
struct Partial {
    cost: f64,
    probability: f64,
    /// Latest completion time so far
    completion: f64,
    eids: Vec<EventId>,
    nodes: Vec<usize>,
}

impl Partial {
    fn key_cmp(&self, other: &Self) -> Ordering {
        self.cost
            .total_cmp(&other.cost)
            .then_with(|| self.completion.total_cmp(&other.completion))
            .then_with(|| self.eids.cmp(&other.eids))
    }
}

impl PartialEq for Partial {
    fn eq(&self, other: &Self) -> bool {
        self.key_cmp(other) == Ordering::Equal
    }
}

impl Eq for Partial {}

impl PartialOrd for Partial {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Ordering: (cost ASC, completion ASC, eid tuple ASC).
/// Wrapped in `Reverse` so the cheapest partial pops first.
impl Ord for Partial {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key_cmp(other)
    }
}

impl<M: Metric> Navigator<M> {
    /// The `n` most probable scenarios of `future`, most probable first.
    ///
    /// Returns fewer than `n` when fewer distinct scenarios exist, and
    /// nothing when `n == 0`.
    #[instrument(skip(self, future), fields(events = future.len()))]
    pub fn most_probable_scenarios(&self, future: &ChangeSet, n: usize) -> Vec<Path> {
        if n == 0 || future.is_empty() {
            return Vec::new();
        }
        if future.is_closed() {
            debug!("enumerating scenarios over a closed change set");
        }

        let graph = EventGraph::build(future, &self.metric, self.config.time_tolerance);
        let next = graph.immediate_successors();

        let mut frontier = BinaryHeap::new();
        for root in graph.roots() {
            let ev = graph.event(root);
            frontier.push(Reverse(Partial {
                cost: surprise(ev.prob()),
                probability: ev.prob(),
                completion: ev.end(),
                eids: vec![ev.eid().clone()],
                nodes: vec![root],
            }));
        }

        let mut seen: HashSet<BTreeSet<EventId>> = HashSet::new();
        let mut scenarios = Vec::new();
        let mut expanded = 0_usize;

        while let Some(Reverse(partial)) = frontier.pop() {
            let Some(&last) = partial.nodes.last() else {
                continue;
            };

            if next[last].is_empty() {
                let members: BTreeSet<EventId> = partial.eids.iter().cloned().collect();
                if !seen.insert(members) {
                    trace!(eids = ?partial.eids, "duplicate scenario skipped");
                    continue;
                }
                trace!(eids = ?partial.eids, cost = partial.cost, "scenario found");
                let events = partial
                    .nodes
                    .iter()
                    .map(|&node| graph.event(node).clone())
                    .collect();
                let path = Path::new(events, partial.cost, partial.probability);
                scenarios.push((partial.clone(), path));
                if scenarios.len() == n {
                    break;
                }
                continue;
            }

            expanded += 1;
            for &succ in &next[last] {
                let ev = graph.event(succ);
                let mut grown = partial.clone();
                grown.cost += surprise(ev.prob());
                grown.probability *= ev.prob();
                grown.completion = grown.completion.max(ev.end());
                grown.eids.push(ev.eid().clone());
                grown.nodes.push(succ);
                frontier.push(Reverse(grown));
            }
        }

        scenarios.sort_by(|(a, _), (b, _)| a.cmp(b));
        debug!(found = scenarios.len(), expanded, "scenario enumeration complete");
        scenarios.into_iter().map(|(_, path)| path).collect()
    }
}
