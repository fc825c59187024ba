//! Navigator errors
//!
//! # Error Categories
//!
//! - **Algebra errors**: [`Error::Algebra`] wraps conflicts, failed folds and
//!   invalid events raised while building or merging change sets
//! - **Search errors**: [`Error::UnreachableGoal`], [`Error::DimensionMismatch`]
//! - **Configuration errors**: [`Error::CyclicDependency`] and the ontology
//!   lookup errors
//!
//! Every error is raised at the point of detection. The navigator computes
//! pure functions of its inputs, so nothing is ever retried.

use thiserror::Error;

use chronos_algebra::{EntityName, EventId, SchemaId};

/// Navigator result type
pub type Result<T> = std::result::Result<T, Error>;

/// Navigator errors
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Algebra(#[from] chronos_algebra::Error),

    /// No event matches the goal, or no passable path reaches it.
    #[error("goal {goal} is unreachable for entity {entity}")]
    UnreachableGoal { entity: EntityName, goal: EventId },

    /// The `supports` graph has a cycle. Fatal configuration error.
    ///
    /// `entities` lists every entity that could not be ordered, in
    /// insertion order.
    #[error("cyclic supports dependency among {entities:?}")]
    CyclicDependency { entities: Vec<EntityName> },

    /// A vector field returned a delta of the wrong dimension.
    #[error("vector field returned {found} components at step {step}, expected {expected}")]
    DimensionMismatch {
        step: usize,
        expected: usize,
        found: usize,
    },

    #[error("schema already registered: {0}")]
    DuplicateSchema(SchemaId),

    #[error("entity already exists: {0}")]
    DuplicateEntity(EntityName),

    #[error("schema not found: {0}")]
    UnknownSchema(SchemaId),

    #[error("entity not found: {0}")]
    UnknownEntity(EntityName),
}
