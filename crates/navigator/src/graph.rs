//! Event eligibility graph
//!
//! Nodes are the possible events of a change set in (`t0`, insertion)
//! order. An edge `u -> v` exists when the metric says `v` may follow `u`
//! and `u` comes before `v` in that order, so the graph is always a DAG.

use chronos_algebra::{ChangeEvent, ChangeSet, EventId};

use crate::metric::Metric;

#[derive(Debug)]
pub(crate) struct EventGraph<'a> {
    nodes: Vec<&'a ChangeEvent>,
    /// `adjacent[u][v]`: `v` may follow `u`.
    adjacent: Vec<Vec<bool>>,
}

impl<'a> EventGraph<'a> {
    /// Build the graph over every event with non-zero probability.
    pub(crate) fn build<M: Metric>(set: &'a ChangeSet, metric: &M, tolerance: f64) -> Self {
        let nodes: Vec<&ChangeEvent> = set
            .ordered()
            .into_iter()
            .filter(|ev| ev.prob() > 0.0)
            .collect();
        let adjacent = (0..nodes.len())
            .map(|u| {
                (0..nodes.len())
                    .map(|v| u < v && metric.eligible(nodes[u], nodes[v], tolerance))
                    .collect()
            })
            .collect();
        Self { nodes, adjacent }
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn event(&self, node: usize) -> &'a ChangeEvent {
        self.nodes[node]
    }

    pub(crate) fn find(&self, eid: &EventId) -> Option<usize> {
        self.nodes.iter().position(|ev| ev.eid() == eid)
    }

    /// Every event that may follow `node`.
    pub(crate) fn successors(&self, node: usize) -> impl Iterator<Item = usize> + '_ {
        self.adjacent[node]
            .iter()
            .enumerate()
            .filter(|(_, edge)| **edge)
            .map(|(v, _)| v)
    }

    /// Events nothing may precede: the frontier of the current state.
    pub(crate) fn roots(&self) -> Vec<usize> {
        (0..self.len())
            .filter(|&v| (0..self.len()).all(|u| !self.adjacent[u][v]))
            .collect()
    }

    /// Immediate successors of every node.
    ///
    /// `v` immediately follows `u` when it may follow `u` and no other event
    /// fits in between. Walking these edges from a root to a sink yields a
    /// maximal chain of events.
    pub(crate) fn immediate_successors(&self) -> Vec<Vec<usize>> {
        (0..self.len())
            .map(|u| {
                self.successors(u)
                    .filter(|&v| !self.successors(u).any(|w| self.adjacent[w][v]))
                    .collect()
            })
            .collect()
    }
}
