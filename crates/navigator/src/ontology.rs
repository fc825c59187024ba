//! Schemas, entities and their dependency graph
//!
//! An [`Ontology`] is an explicitly constructed registry. Nothing here is
//! process-wide, so independent ontologies can coexist. The navigator only
//! borrows it.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use chronos_algebra::{ChangeSet, EntityName, EventId, SchemaId};

use crate::error::{Error, Result};

/// Function producing an entity's candidate change set
pub type Generator = Arc<dyn Fn(&Entity) -> Result<ChangeSet> + Send + Sync>;

/// Descriptive event template. Not consumed by any search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    pub type_id: SchemaId,
    /// Mean time between occurrences
    pub mean_period: f64,
    pub default_dt: f64,
    pub description: String,
    #[serde(default)]
    pub meta: IndexMap<String, String>,
}

impl Schema {
    pub fn new(type_id: impl Into<SchemaId>, mean_period: f64) -> Self {
        Self {
            type_id: type_id.into(),
            mean_period,
            default_dt: 0.0,
            description: String::new(),
            meta: IndexMap::new(),
        }
    }

    pub fn with_default_dt(mut self, default_dt: f64) -> Self {
        self.default_dt = default_dt;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Named actor with a goal event and a generator
#[derive(Clone)]
pub struct Entity {
    name: EntityName,
    schema: Arc<Schema>,
    goal: EventId,
    generator: Generator,
    priority: i32,
}

impl Entity {
    pub fn name(&self) -> &EntityName {
        &self.name
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Id of the event this entity is trying to reach.
    pub fn goal(&self) -> &EventId {
        &self.goal
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Materialize the candidate change set.
    pub fn generate(&self) -> Result<ChangeSet> {
        (self.generator)(self)
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("name", &self.name)
            .field("schema", &self.schema.type_id)
            .field("goal", &self.goal)
            .field("priority", &self.priority)
            .finish_non_exhaustive()
    }
}

/// Kind of a dependency edge. Open vocabulary; only `supports` constrains
/// scheduling.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyKind {
    Supports,
    Blocks,
    Other(String),
}

impl From<&str> for DependencyKind {
    fn from(s: &str) -> Self {
        match s {
            "supports" => DependencyKind::Supports,
            "blocks" => DependencyKind::Blocks,
            other => DependencyKind::Other(other.to_string()),
        }
    }
}

impl fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DependencyKind::Supports => write!(f, "supports"),
            DependencyKind::Blocks => write!(f, "blocks"),
            DependencyKind::Other(kind) => write!(f, "{kind}"),
        }
    }
}

/// Directed edge `from -> to`
///
/// For `supports`, `to`'s goal may not start before `from`'s goal completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    pub from: EntityName,
    pub to: EntityName,
    pub kind: DependencyKind,
}

impl Dependency {
    pub fn is_supports(&self) -> bool {
        self.kind == DependencyKind::Supports
    }
}

/// Registry of schemas, entities and dependency edges
#[derive(Debug, Default)]
pub struct Ontology {
    schemas: IndexMap<SchemaId, Arc<Schema>>,
    entities: IndexMap<EntityName, Entity>,
    dependencies: Vec<Dependency>,
}

impl Ontology {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_schema(&mut self, schema: Schema) -> Result<()> {
        if self.schemas.contains_key(&schema.type_id) {
            return Err(Error::DuplicateSchema(schema.type_id));
        }
        debug!(schema = %schema.type_id, "schema registered");
        self.schemas.insert(schema.type_id.clone(), Arc::new(schema));
        Ok(())
    }

    pub fn schema(&self, type_id: &SchemaId) -> Option<&Schema> {
        self.schemas.get(type_id).map(Arc::as_ref)
    }

    /// Create an entity with the default priority.
    pub fn spawn<F>(
        &mut self,
        name: impl Into<EntityName>,
        schema_id: impl Into<SchemaId>,
        goal: impl Into<EventId>,
        generator: F,
    ) -> Result<&Entity>
    where
        F: Fn(&Entity) -> Result<ChangeSet> + Send + Sync + 'static,
    {
        self.spawn_with_priority(name, schema_id, goal, generator, 0)
    }

    /// Create an entity. Higher priorities are scheduled first among
    /// entities that are ready at the same time.
    pub fn spawn_with_priority<F>(
        &mut self,
        name: impl Into<EntityName>,
        schema_id: impl Into<SchemaId>,
        goal: impl Into<EventId>,
        generator: F,
        priority: i32,
    ) -> Result<&Entity>
    where
        F: Fn(&Entity) -> Result<ChangeSet> + Send + Sync + 'static,
    {
        let name = name.into();
        let schema_id = schema_id.into();
        if self.entities.contains_key(&name) {
            return Err(Error::DuplicateEntity(name));
        }
        let schema = self
            .schemas
            .get(&schema_id)
            .cloned()
            .ok_or(Error::UnknownSchema(schema_id))?;

        let entity = Entity {
            name: name.clone(),
            schema,
            goal: goal.into(),
            generator: Arc::new(generator),
            priority,
        };
        debug!(entity = %name, goal = %entity.goal, priority, "entity spawned");
        Ok(self.entities.entry(name).or_insert(entity))
    }

    pub fn entity(&self, name: &EntityName) -> Option<&Entity> {
        self.entities.get(name)
    }

    /// Entities in insertion order.
    pub fn entities(&self) -> impl ExactSizeIterator<Item = &Entity> {
        self.entities.values()
    }

    /// Insertion index of an entity.
    pub fn position(&self, name: &EntityName) -> Option<usize> {
        self.entities.get_index_of(name)
    }

    /// Link `from -> to`. Re-linking the same pair replaces the kind.
    pub fn add_dependency(
        &mut self,
        from: impl Into<EntityName>,
        to: impl Into<EntityName>,
        kind: impl Into<DependencyKind>,
    ) -> Result<()> {
        let (from, to, kind) = (from.into(), to.into(), kind.into());
        for name in [&from, &to] {
            if !self.entities.contains_key(name) {
                return Err(Error::UnknownEntity(name.clone()));
            }
        }
        debug!(%from, %to, %kind, "dependency added");
        match self
            .dependencies
            .iter_mut()
            .find(|d| d.from == from && d.to == to)
        {
            Some(existing) => existing.kind = kind,
            None => self.dependencies.push(Dependency { from, to, kind }),
        }
        Ok(())
    }

    /// All dependency edges in insertion order.
    pub fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }

    /// Edges pointing at `name`: what `name` waits on.
    pub fn dependencies_of<'a>(
        &'a self,
        name: &'a EntityName,
    ) -> impl Iterator<Item = &'a Dependency> {
        self.dependencies.iter().filter(move |d| d.to == *name)
    }

    /// Edges leaving `name`: who waits on `name`.
    pub fn dependents_of<'a>(
        &'a self,
        name: &'a EntityName,
    ) -> impl Iterator<Item = &'a Dependency> {
        self.dependencies.iter().filter(move |d| d.from == *name)
    }

    /// Declared priority plus the number of dependents.
    pub fn effective_priority(&self, name: &EntityName) -> Result<i64> {
        let entity = self
            .entity(name)
            .ok_or_else(|| Error::UnknownEntity(name.clone()))?;
        let pull = self.dependents_of(name).count() as i64;
        Ok(i64::from(entity.priority) + pull)
    }
}
