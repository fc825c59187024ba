//! Integration test harness for Chronos.
//!
//! Fixtures shared by the end-to-end tests: the improbability chain of
//! future events and a small ontology of whimsical entities whose goals
//! depend on each other.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use chronos_algebra::{ChangeEvent, ChangeSet, EventId};
use chronos_navigator::{Entity, Navigator, NavigatorConfig, Ontology, Path, Result, Schema};

/// Four future events in sequence, each less likely than the last.
///
/// # Panics
///
/// Panics if the fixture events are invalid.
pub fn improbability_chain() -> ChangeSet {
    let events = [
        ("idea", 0.0, 1.0, 1.0),
        ("tea", 1.0, 1.0, 0.7),
        ("whale", 2.0, 1.0, 0.3),
        ("petunia", 3.0, 1.0, 0.15),
    ]
    .into_iter()
    .map(|(eid, t0, dt, prob)| ChangeEvent::future(eid, t0, dt, prob).expect("valid event"));
    ChangeSet::open(events).expect("distinct event ids")
}

// Goal event ids of the whimsical entities
pub const TEA_GOAL: &str = "tea-party-with-Vogon";
pub const WHALE_GOAL: &str = "spontaneous-whale-appearance";
pub const PETUNIA_GOAL: &str = "petunia-uprising";

/// Ontology plus navigator, counting every generator call.
pub struct TestHarness {
    ontology: Ontology,
    navigator: Navigator,
    generated: Arc<AtomicUsize>,
}

impl TestHarness {
    /// Empty ontology with the tea-party, whale and petunia schemas.
    pub fn new() -> Self {
        let mut ontology = Ontology::new();
        for schema in [
            Schema::new("tea-party", 5.0)
                .with_default_dt(0.5)
                .with_description("A tea party with Vogons"),
            Schema::new("whale", 10.0)
                .with_default_dt(0.2)
                .with_description("A spontaneous whale appearance"),
            Schema::new("petunia", 15.0)
                .with_default_dt(0.1)
                .with_description("A petunia uprising"),
        ] {
            ontology.add_schema(schema).expect("distinct schemas");
        }
        Self {
            ontology,
            navigator: Navigator::new(),
            generated: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// tea supports whale supports petunia, every goal declared at `t0 = 0`.
    ///
    /// # Panics
    ///
    /// Panics if the fixture ontology cannot be built.
    pub fn whimsical() -> Self {
        let mut harness = Self::new();
        harness.spawn_single("tea_entity", "tea-party", TEA_GOAL, 0.0, 0.5);
        harness.spawn_single("whale_entity", "whale", WHALE_GOAL, 0.0, 0.2);
        harness.spawn_single("petunia_entity", "petunia", PETUNIA_GOAL, 0.0, 0.1);
        harness.link("tea_entity", "whale_entity", "supports");
        harness.link("whale_entity", "petunia_entity", "supports");
        harness
    }

    /// Spawn an entity whose generator yields its goal event only.
    pub fn spawn_single(&mut self, name: &str, schema: &str, goal: &'static str, t0: f64, dt: f64) {
        self.spawn_with(name, schema, goal, move |_| {
            Ok(ChangeSet::closed([ChangeEvent::new(goal, t0, dt)?])?)
        });
    }

    /// Spawn an entity with an arbitrary generator.
    pub fn spawn_with<F>(&mut self, name: &str, schema: &str, goal: &str, generator: F)
    where
        F: Fn(&Entity) -> Result<ChangeSet> + Send + Sync + 'static,
    {
        let generated = Arc::clone(&self.generated);
        self.ontology
            .spawn(name, schema, goal, move |entity: &Entity| {
                generated.fetch_add(1, Ordering::SeqCst);
                generator(entity)
            })
            .expect("entity spawned");
    }

    pub fn link(&mut self, from: &str, to: &str, kind: &str) {
        self.ontology
            .add_dependency(from, to, kind)
            .expect("dependency between known entities");
    }

    pub fn configure(&mut self, config: NavigatorConfig) {
        self.navigator = Navigator::new().with_config(config);
    }

    pub fn ontology(&self) -> &Ontology {
        &self.ontology
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn schedule(&self) -> Result<ChangeSet> {
        self.navigator.multi_entity_schedule(&self.ontology)
    }

    /// # Panics
    ///
    /// Panics if no entity has this name.
    pub fn goal_path(&self, entity: &str) -> Result<Path> {
        let entity = self
            .ontology
            .entity(&entity.into())
            .unwrap_or_else(|| panic!("unknown entity {entity}"));
        self.navigator.entity_goal_path(entity)
    }

    /// Number of generator calls so far.
    pub fn generator_calls(&self) -> usize {
        self.generated.load(Ordering::SeqCst)
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Event ids of a change set in stored order.
pub fn eids(set: &ChangeSet) -> Vec<&str> {
    set.iter().map(|ev| ev.eid().as_str()).collect()
}

/// Event ids of a path in path order.
pub fn path_eids(path: &Path) -> Vec<&str> {
    path.eids().into_iter().map(EventId::as_str).collect()
}
