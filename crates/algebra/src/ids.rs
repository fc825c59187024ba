//! Identifiers for events and entities
//!
//! All identifiers are typed string wrappers. They keep event ids and
//! entity names from being mixed up and serialize as plain strings.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Suffix marking the inverse of an event.
pub const INVERSE_SUFFIX: &str = "^-1";

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Creates a new identifier.
            pub fn new(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }
    };
}

define_id!(
    /// Identifier of a change event, unique within one change set
    EventId
);

define_id!(
    /// Name of an entity in an ontology
    EntityName
);

define_id!(
    /// Identifier of a schema (event template) in an ontology
    SchemaId
);

impl EventId {
    /// Id of the inverse event.
    ///
    /// Involutive: `id.inverted().inverted() == id`.
    pub fn inverted(&self) -> Self {
        match self.0.strip_suffix(INVERSE_SUFFIX) {
            Some(base) => Self(base.to_string()),
            None => Self(format!("{}{}", self.0, INVERSE_SUFFIX)),
        }
    }

    /// Check if the id carries the given prefix.
    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.0.starts_with(prefix)
    }
}
