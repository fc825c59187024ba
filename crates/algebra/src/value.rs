//! Opaque state snapshots
//!
//! The algebra only ever compares states for equality. The variants exist
//! so callers can record whatever snapshot their domain needs.

use std::fmt;

use serde::{Deserialize, Serialize};

/// State snapshot carried by deterministic change events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum State {
    Scalar(f64),
    Vector(Vec<f64>),
    Label(String),
}

impl State {
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            State::Scalar(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_vector(&self) -> Option<&[f64]> {
        match self {
            State::Vector(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_label(&self) -> Option<&str> {
        match self {
            State::Label(s) => Some(s),
            _ => None,
        }
    }
}

impl Default for State {
    fn default() -> Self {
        State::Scalar(0.0)
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            State::Scalar(v) => write!(f, "{v}"),
            State::Vector(v) => write!(f, "{v:?}"),
            State::Label(s) => write!(f, "{s}"),
        }
    }
}

impl From<f64> for State {
    fn from(v: f64) -> Self {
        State::Scalar(v)
    }
}

impl From<Vec<f64>> for State {
    fn from(v: Vec<f64>) -> Self {
        State::Vector(v)
    }
}

impl From<&str> for State {
    fn from(s: &str) -> Self {
        State::Label(s.to_string())
    }
}
