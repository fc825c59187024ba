//! Change algebra errors
//!
//! # Error Categories
//!
//! - **Operand errors**: [`Error::Conflict`]
//! - **Fold errors**: [`Error::Evolution`]
//! - **Construction errors**: [`Error::InvalidEvent`]
//!
//! All of these point at a programming or configuration mistake in the
//! caller. Nothing here is transient.

use thiserror::Error;

use crate::ids::EventId;
use crate::value::State;

/// Algebra result type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by change events and change sets
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Two operands define the same event id with different payloads.
    #[error("conflicting definitions for event {eid} in {operation}")]
    Conflict {
        /// The event id defined twice.
        eid: EventId,
        /// The operation that detected the conflict.
        operation: &'static str,
    },

    /// An event's `state_before` did not match the running state.
    #[error("evolution failed at {eid}: expected {expected}, running state is {found}")]
    Evolution {
        eid: EventId,
        expected: State,
        found: State,
    },

    /// An event violated its construction invariants.
    #[error("invalid event {eid}: {reason}")]
    InvalidEvent { eid: EventId, reason: String },
}
