//! Entity dependency ordering
//!
//! Orders entities along their `supports` edges with Kahn's algorithm.
//! Among entities that are ready at the same time the highest priority goes
//! first, then the earliest inserted, then the smallest name.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use chronos_algebra::EntityName;

use crate::config::PriorityPolicy;
use crate::error::{Error, Result};
use crate::ontology::{Entity, Ontology};

/// Heap key for a ready entity. Smallest key is scheduled first.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct ReadyKey<'a> {
    priority: Reverse<i64>,
    position: usize,
    name: &'a EntityName,
}

fn ready_key<'a>(
    ontology: &Ontology,
    entity: &'a Entity,
    position: usize,
    policy: PriorityPolicy,
) -> Result<ReadyKey<'a>> {
    let priority = match policy {
        PriorityPolicy::Declared => i64::from(entity.priority()),
        PriorityPolicy::Effective => ontology.effective_priority(entity.name())?,
    };
    Ok(ReadyKey {
        priority: Reverse(priority),
        position,
        name: entity.name(),
    })
}

/// Topological order of the ontology's entities over `supports` edges.
///
/// Fails with [`Error::CyclicDependency`] when the `supports` subgraph is
/// not acyclic; no entity is ordered in that case.
pub fn topological_order(ontology: &Ontology, policy: PriorityPolicy) -> Result<Vec<&Entity>> {
    let entities: Vec<&Entity> = ontology.entities().collect();
    if entities.is_empty() {
        return Ok(Vec::new());
    }

    let index_of = |name: &EntityName| {
        ontology
            .position(name)
            .ok_or_else(|| Error::UnknownEntity(name.clone()))
    };

    // Build adjacency and in-degree maps
    let mut in_degree = vec![0_usize; entities.len()];
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); entities.len()];
    for dep in ontology.dependencies().iter().filter(|d| d.is_supports()) {
        let (from, to) = (index_of(&dep.from)?, index_of(&dep.to)?);
        in_degree[to] += 1;
        dependents[from].push(to);
    }

    let mut ready = BinaryHeap::new();
    for idx in (0..entities.len()).filter(|&i| in_degree[i] == 0) {
        ready.push(Reverse(ready_key(ontology, entities[idx], idx, policy)?));
    }

    let mut order = Vec::with_capacity(entities.len());
    while let Some(Reverse(next)) = ready.pop() {
        let idx = next.position;
        order.push(entities[idx]);
        for &dep in &dependents[idx] {
            in_degree[dep] -= 1;
            if in_degree[dep] == 0 {
                ready.push(Reverse(ready_key(ontology, entities[dep], dep, policy)?));
            }
        }
    }

    // Check for cycles
    if order.len() != entities.len() {
        let stuck: Vec<EntityName> = entities
            .iter()
            .enumerate()
            .filter(|(i, _)| in_degree[*i] > 0)
            .map(|(_, e)| e.name().clone())
            .collect();
        return Err(Error::CyclicDependency { entities: stuck });
    }

    Ok(order)
}
