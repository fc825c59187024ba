//! Dependency-aware scheduling
//!
//! Merges every entity's candidate timeline into one closed change set.
//! Entities are placed in topological order over `supports` edges. An
//! entity whose goal would start before its predecessors' goals complete is
//! pushed back, and a slack event fills the gap:
//!
//! ```text
//!   before:  [goal]
//!            ^ t0 < ready
//!   after:   [slack-<entity>......][goal]
//!            ^ t0                  ^ ready
//! ```
//!
//! Events of the entity starting at or after the goal's original start move
//! with it, earlier events stay put. Every event other than the goal is
//! renamed `<entity>::<eid>`, so goal ids alone must be unique across the
//! ontology.

use indexmap::IndexMap;
use rayon::prelude::*;
use tracing::{debug, error, info, instrument};

use chronos_algebra::{ChangeEvent, ChangeSet, EntityName};

use crate::config::ENTITY_SEPARATOR;
use crate::dag::topological_order;
use crate::error::{Error, Result};
use crate::metric::Metric;
use crate::ontology::{Entity, Ontology};

use super::Navigator;

impl<M: Metric> Navigator<M> {
    /// One merged, closed timeline covering every entity of `ontology`.
    ///
    /// Fails with [`Error::CyclicDependency`] before any generator runs when
    /// the `supports` edges form a cycle, and with
    /// [`Error::UnreachableGoal`] when an entity's generator does not
    /// produce its goal event.
    #[instrument(skip_all, fields(entities = ontology.entities().len()))]
    pub fn multi_entity_schedule(&self, ontology: &Ontology) -> Result<ChangeSet> {
        let order = topological_order(ontology, self.config.priority)
            .inspect_err(|e| error!(%e, "dependency ordering failed"))?;
        debug!(order = ?order.iter().map(|e| e.name()).collect::<Vec<_>>(), "entity order");

        let candidates = self.generate_all(ontology)?;

        let mut completion: IndexMap<&EntityName, f64> = IndexMap::with_capacity(order.len());
        let mut timeline = ChangeSet::default();
        let mut slack_count = 0_usize;

        for entity in order {
            let name = entity.name();
            let Some(own) = ontology.position(name).and_then(|idx| candidates.get(idx)) else {
                return Err(Error::UnknownEntity(name.clone()));
            };

            let ready = ontology
                .dependencies_of(name)
                .filter(|dep| dep.is_supports())
                .filter_map(|dep| completion.get(&dep.from).copied())
                .reduce(f64::max);

            let (scheduled, goal_end) = self.place(entity, own, ready)?;
            if scheduled.len() > own.len() {
                slack_count += 1;
            }
            completion.insert(name, goal_end);
            timeline = timeline.compose(&scheduled)?;
        }

        info!(
            events = timeline.len(),
            slack = slack_count,
            "multi-entity schedule complete"
        );
        Ok(timeline.into_closed())
    }

    /// Every entity's candidate set, in insertion order.
    fn generate_all(&self, ontology: &Ontology) -> Result<Vec<ChangeSet>> {
        let entities: Vec<&Entity> = ontology.entities().collect();
        if self.config.parallel_generation {
            entities.par_iter().map(|entity| entity.generate()).collect()
        } else {
            entities.iter().map(|entity| entity.generate()).collect()
        }
    }

    /// Place one entity's events so its goal starts no earlier than `ready`.
    ///
    /// Non-goal events are renamed `<entity>::<eid>` so entities may reuse
    /// local ids. Returns the placed events and the goal's completion time.
    fn place(
        &self,
        entity: &Entity,
        own: &ChangeSet,
        ready: Option<f64>,
    ) -> Result<(ChangeSet, f64)> {
        let Some(goal) = own.get(entity.goal()) else {
            error!(entity = %entity.name(), goal = %entity.goal(), "goal event not generated");
            return Err(Error::UnreachableGoal {
                entity: entity.name().clone(),
                goal: entity.goal().clone(),
            });
        };

        let start = goal.t0();
        let delay = ready.filter(|&ready| start + self.config.time_tolerance < ready);

        let mut events = Vec::with_capacity(own.len() + 1);
        if let Some(ready) = delay {
            let slack = ChangeEvent::new(
                format!("{}{}", self.config.slack_prefix, entity.name()),
                start,
                ready - start,
            )?;
            debug!(
                entity = %entity.name(),
                slack = %slack.eid(),
                from = start,
                to = ready,
                "goal delayed behind predecessors"
            );
            events.push(slack);
        }

        for ev in own {
            if ev.eid() == goal.eid() {
                events.push(match delay {
                    Some(ready) => ev.clone().with_t0(ready)?,
                    None => ev.clone(),
                });
                continue;
            }
            let local = ev
                .clone()
                .with_eid(format!("{}{}{}", entity.name(), ENTITY_SEPARATOR, ev.eid()));
            events.push(match delay {
                Some(ready) if ev.t0() >= start => {
                    let shifted = ev.t0() + (ready - start);
                    local.with_t0(shifted)?
                }
                _ => local,
            });
        }

        let placed = ChangeSet::new(events, own.is_closed())?;
        let goal_end = delay.map_or(goal.end(), |ready| ready + goal.dt());
        Ok((placed, goal_end))
    }
}
