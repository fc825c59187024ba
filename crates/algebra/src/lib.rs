//! Chronos Change Algebra
//!
//! Immutable change events and the set algebra over them: union,
//! intersection, difference, composition, inversion and sequential state
//! evolution. The navigator consumes [`ChangeSet`] as its primary data
//! structure.

pub mod change_set;
pub mod error;
pub mod event;
pub mod ids;
pub mod value;

pub use change_set::ChangeSet;
pub use error::{Error, Result};
pub use event::{ChangeEvent, Polarity};
pub use ids::{EntityName, EventId, SchemaId};
pub use value::State;
