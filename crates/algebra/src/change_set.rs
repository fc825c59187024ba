//! Change sets and their algebra
//!
//! A [`ChangeSet`] is an insertion-ordered collection of [`ChangeEvent`]s,
//! deduplicated by event id. Every operation returns a new set and leaves
//! its operands untouched. The result of a binary operation is closed only
//! when both operands are closed.

use std::cmp::Ordering;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::event::ChangeEvent;
use crate::ids::EventId;
use crate::value::State;

/// Immutable, algebraic collection of change events
///
/// Serializes as `{ "events": [...], "closed": bool }`. Deserialization
/// rebuilds the set through [`ChangeSet::new`], so ids are re-keyed and
/// conflicting duplicates are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawChangeSet", into = "RawChangeSet")]
pub struct ChangeSet {
    events: IndexMap<EventId, ChangeEvent>,
    /// `true` for a fixed, bounded timeline; `false` for an open-ended
    /// exploratory one.
    closed: bool,
}

/// Wire form of a [`ChangeSet`]
#[derive(Serialize, Deserialize)]
struct RawChangeSet {
    events: Vec<ChangeEvent>,
    #[serde(default = "closed_by_default")]
    closed: bool,
}

fn closed_by_default() -> bool {
    true
}

impl From<ChangeSet> for RawChangeSet {
    fn from(set: ChangeSet) -> Self {
        Self {
            events: set.events.into_values().collect(),
            closed: set.closed,
        }
    }
}

impl TryFrom<RawChangeSet> for ChangeSet {
    type Error = Error;

    fn try_from(raw: RawChangeSet) -> Result<Self> {
        ChangeSet::new(raw.events, raw.closed)
    }
}

impl Default for ChangeSet {
    fn default() -> Self {
        Self {
            events: IndexMap::new(),
            closed: true,
        }
    }
}

/// Stable ordering key for timelines.
fn by_start(a: &ChangeEvent, b: &ChangeEvent) -> Ordering {
    a.t0().total_cmp(&b.t0())
}

/// Insert `event`, collapsing identical duplicates and rejecting conflicts.
fn insert_checked(
    events: &mut IndexMap<EventId, ChangeEvent>,
    event: ChangeEvent,
    operation: &'static str,
) -> Result<()> {
    match events.get(event.eid()) {
        Some(existing) if *existing == event => Ok(()),
        Some(_) => {
            debug!(eid = %event.eid(), operation, "conflicting event payloads");
            Err(Error::Conflict {
                eid: event.eid().clone(),
                operation,
            })
        }
        None => {
            events.insert(event.eid().clone(), event);
            Ok(())
        }
    }
}

impl ChangeSet {
    /// Build a set from events in insertion order.
    ///
    /// Repeated ids with identical payloads are collapsed; repeated ids with
    /// different payloads are a [`Error::Conflict`].
    pub fn new(events: impl IntoIterator<Item = ChangeEvent>, closed: bool) -> Result<Self> {
        let mut map = IndexMap::new();
        for event in events {
            insert_checked(&mut map, event, "construction")?;
        }
        Ok(Self {
            events: map,
            closed,
        })
    }

    /// Build a closed (bounded) timeline.
    pub fn closed(events: impl IntoIterator<Item = ChangeEvent>) -> Result<Self> {
        Self::new(events, true)
    }

    /// Build an open (exploratory) timeline.
    pub fn open(events: impl IntoIterator<Item = ChangeEvent>) -> Result<Self> {
        Self::new(events, false)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn get(&self, eid: &EventId) -> Option<&ChangeEvent> {
        self.events.get(eid)
    }

    pub fn contains(&self, eid: &EventId) -> bool {
        self.events.contains_key(eid)
    }

    /// Position of `eid` in insertion order.
    pub fn index_of(&self, eid: &EventId) -> Option<usize> {
        self.events.get_index_of(eid)
    }

    /// Events in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &ChangeEvent> {
        self.events.values()
    }

    /// Event ids in insertion order.
    pub fn eids(&self) -> impl Iterator<Item = &EventId> {
        self.events.keys()
    }

    /// Events in timestamp order; ties keep insertion order.
    pub fn ordered(&self) -> Vec<&ChangeEvent> {
        let mut events: Vec<&ChangeEvent> = self.events.values().collect();
        events.sort_by(|a, b| by_start(a, b));
        events
    }

    /// Earliest start and latest completion, `None` when empty.
    pub fn span(&self) -> Option<(f64, f64)> {
        self.events.values().fold(None, |acc, ev| match acc {
            None => Some((ev.t0(), ev.end())),
            Some((lo, hi)) => Some((lo.min(ev.t0()), hi.max(ev.end()))),
        })
    }

    /// New set with `event` appended.
    pub fn with_event(&self, event: ChangeEvent) -> Result<Self> {
        let mut events = self.events.clone();
        insert_checked(&mut events, event, "insertion")?;
        Ok(Self {
            events,
            closed: self.closed,
        })
    }

    pub fn into_closed(mut self) -> Self {
        self.closed = true;
        self
    }

    pub fn into_open(mut self) -> Self {
        self.closed = false;
        self
    }

    /// Union keyed by event id: `self`'s events first, then `other`'s new ones.
    pub fn union(&self, other: &ChangeSet) -> Result<Self> {
        let mut events = self.events.clone();
        for event in other.iter() {
            insert_checked(&mut events, event.clone(), "union")?;
        }
        Ok(Self {
            events,
            closed: self.closed && other.closed,
        })
    }

    /// Events whose id appears in both sets, payload taken from `self`.
    pub fn intersection(&self, other: &ChangeSet) -> Result<Self> {
        let mut events = IndexMap::new();
        for (eid, event) in &self.events {
            if let Some(theirs) = other.get(eid) {
                if theirs != event {
                    return Err(Error::Conflict {
                        eid: eid.clone(),
                        operation: "intersection",
                    });
                }
                events.insert(eid.clone(), event.clone());
            }
        }
        Ok(Self {
            events,
            closed: self.closed && other.closed,
        })
    }

    /// Events of `self` whose id does not appear in `other`.
    pub fn difference(&self, other: &ChangeSet) -> Self {
        let events = self
            .events
            .iter()
            .filter(|(eid, _)| !other.contains(eid))
            .map(|(eid, ev)| (eid.clone(), ev.clone()))
            .collect();
        Self {
            events,
            closed: self.closed && other.closed,
        }
    }

    /// Play `other` after `self`.
    ///
    /// The merged events are stably ordered by start time, `self`'s events
    /// winning ties. An event present in both operands must carry the same
    /// transition in both.
    pub fn compose(&self, other: &ChangeSet) -> Result<Self> {
        let mut merged = self.events.clone();
        for event in other.iter() {
            insert_checked(&mut merged, event.clone(), "composition")?;
        }
        let mut sequence: Vec<ChangeEvent> = merged.into_values().collect();
        sequence.sort_by(by_start);
        trace!(left = self.len(), right = other.len(), merged = sequence.len(), "composed");
        Ok(Self {
            events: sequence
                .into_iter()
                .map(|ev| (ev.eid().clone(), ev))
                .collect(),
            closed: self.closed && other.closed,
        })
    }

    /// The set that undoes `self`.
    ///
    /// Each event has its states swapped, its polarity flipped and its id
    /// renamed. The sequence is replayed backwards: the latest-starting
    /// event's inverse starts when `self` ends and earlier events follow in
    /// mirrored start order, so `compose(A, inverse(A))` evolves any valid
    /// state back to itself.
    pub fn inverse(&self) -> Self {
        let Some((_, end)) = self.span() else {
            return self.clone();
        };
        let forward = self.ordered();
        let last_start = forward.last().map_or(end, |ev| ev.t0());
        let events = forward
            .into_iter()
            .rev()
            .map(|ev| {
                let inv = ev.inverted_at(end + (last_start - ev.t0()));
                (inv.eid().clone(), inv)
            })
            .collect();
        Self {
            events,
            closed: self.closed,
        }
    }

    /// Fold the events in timestamp order starting from `initial`.
    ///
    /// An event's `state_before`, when present, must equal the running
    /// state; its `state_after`, when present, becomes the running state.
    pub fn evolve(&self, initial: &State) -> Result<State> {
        let mut state = initial.clone();
        for event in self.ordered() {
            if let Some(before) = event.state_before()
                && *before != state
            {
                return Err(Error::Evolution {
                    eid: event.eid().clone(),
                    expected: before.clone(),
                    found: state,
                });
            }
            if let Some(after) = event.state_after() {
                state = after.clone();
            }
        }
        Ok(state)
    }
}

impl<'a> IntoIterator for &'a ChangeSet {
    type Item = &'a ChangeEvent;
    type IntoIter = indexmap::map::Values<'a, EventId, ChangeEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.values()
    }
}
