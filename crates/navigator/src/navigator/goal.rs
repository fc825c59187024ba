//! Goal-directed search
//!
//! Dijkstra over the eligibility graph. A virtual start node stands for the
//! entity's current state. It precedes every event, so any event may come
//! first, entered at the metric's entry cost.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use tracing::{debug, error, instrument, trace};

use crate::error::{Error, Result};
use crate::graph::EventGraph;
use crate::metric::Metric;
use crate::ontology::Entity;
use crate::path::Path;

use super::Navigator;

#[derive(Debug, Clone, Copy)]
struct Reached {
    cost: f64,
    node: usize,
}

impl PartialEq for Reached {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Reached {}

impl PartialOrd for Reached {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Reached {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cost
            .total_cmp(&other.cost)
            .then_with(|| self.node.cmp(&other.node))
    }
}

impl<M: Metric> Navigator<M> {
    /// Minimum-cost path from the entity's current state to its goal event.
    ///
    /// The returned path ends at the goal and its cost is the total cost.
    /// Fails with [`Error::UnreachableGoal`] when the generated set has no
    /// possible event with the goal id, or no passable path reaches it.
    #[instrument(skip(self, entity), fields(entity = %entity.name(), goal = %entity.goal()))]
    pub fn entity_goal_path(&self, entity: &Entity) -> Result<Path> {
        let candidates = entity.generate()?;
        let graph = EventGraph::build(&candidates, &self.metric, self.config.time_tolerance);
        let unreachable = || Error::UnreachableGoal {
            entity: entity.name().clone(),
            goal: entity.goal().clone(),
        };

        let Some(target) = graph.find(entity.goal()) else {
            error!(events = candidates.len(), "goal event not generated");
            return Err(unreachable());
        };

        let mut best = vec![f64::INFINITY; graph.len()];
        let mut parent: Vec<Option<usize>> = vec![None; graph.len()];
        let mut heap = BinaryHeap::new();

        for node in 0..graph.len() {
            let ev = graph.event(node);
            let Some(cost) = self.sanitize_cost(self.metric.entry_cost(ev), ev.eid()) else {
                continue;
            };
            best[node] = cost;
            heap.push(Reverse(Reached { cost, node }));
        }

        while let Some(Reverse(Reached { cost, node })) = heap.pop() {
            if cost > best[node] {
                continue;
            }
            if node == target {
                break;
            }
            let from = graph.event(node);
            for succ in graph.successors(node) {
                let to = graph.event(succ);
                let Some(step) = self.sanitize_cost(self.metric.distance(from, to), to.eid()) else {
                    continue;
                };
                let next = cost + step;
                if next < best[succ] {
                    trace!(from = %from.eid(), to = %to.eid(), cost = next, "relaxed");
                    best[succ] = next;
                    parent[succ] = Some(node);
                    heap.push(Reverse(Reached { cost: next, node: succ }));
                }
            }
        }

        if !best[target].is_finite() {
            error!("no passable path reaches the goal");
            return Err(unreachable());
        }

        let mut nodes = vec![target];
        let mut cursor = target;
        while let Some(prev) = parent[cursor] {
            nodes.push(prev);
            cursor = prev;
        }
        nodes.reverse();

        let events: Vec<_> = nodes.iter().map(|&n| graph.event(n).clone()).collect();
        let probability = events.iter().map(|ev| ev.prob()).product();
        debug!(steps = events.len(), cost = best[target], "goal path found");
        Ok(Path::new(events, best[target], probability))
    }
}
