//! Paths and scenarios produced by the navigator

use std::fmt::{self, Write as _};

use serde::{Deserialize, Serialize};

use chronos_algebra::{ChangeEvent, EventId};

use crate::config::DEFAULT_SLACK_PREFIX;

/// One concrete realization of a change set: an ordered sequence of events
/// with its accumulated cost and probability
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Path {
    events: Vec<ChangeEvent>,
    cost: f64,
    probability: f64,
}

impl Path {
    pub fn new(events: Vec<ChangeEvent>, cost: f64, probability: f64) -> Self {
        Self {
            events,
            cost,
            probability,
        }
    }

    /// Events in path order.
    pub fn ordered(&self) -> &[ChangeEvent] {
        &self.events
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Product of the probabilities of the events on the path.
    pub fn probability(&self) -> f64 {
        self.probability
    }

    pub fn eids(&self) -> Vec<&EventId> {
        self.events.iter().map(ChangeEvent::eid).collect()
    }

    pub fn last(&self) -> Option<&ChangeEvent> {
        self.events.last()
    }

    /// Latest completion time on the path.
    pub fn end_time(&self) -> Option<f64> {
        self.events.iter().map(ChangeEvent::end).reduce(f64::max)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Human-readable rendering of a path, one event per line.
pub fn pretty_report(path: &Path, slack_prefix: &str) -> String {
    let mut out = String::new();
    for ev in path.ordered() {
        let _ = write!(out, "  • {} (t0: {}, dt: {})", ev.eid(), ev.t0(), ev.dt());
        if ev.has_prefix(slack_prefix) {
            out.push_str(" [slack]");
        }
        out.push('\n');
    }
    let _ = writeln!(
        out,
        "  total cost: {:.4} (probability {:.4})",
        path.cost(),
        path.probability()
    );
    out
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&pretty_report(self, DEFAULT_SLACK_PREFIX))
    }
}
