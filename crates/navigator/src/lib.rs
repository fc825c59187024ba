//! Chronos Navigator
//!
//! Searches over change sets: vector-field integration, most probable
//! scenarios, goal-directed paths and dependency-aware scheduling of many
//! entities into one timeline.

pub mod config;
pub mod dag;
pub mod error;
mod graph;
pub mod metric;
pub mod navigator;
pub mod ontology;
pub mod path;

pub use config::{NavigatorConfig, PriorityPolicy};
pub use error::{Error, Result};
pub use metric::{DurationMetric, FnMetric, Metric, TrustSource, TrustWeighted};
pub use navigator::{Navigator, VectorField};
pub use ontology::{Dependency, DependencyKind, Entity, Generator, Ontology, Schema};
pub use path::{Path, pretty_report};
