//! Navigator configuration

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Slop allowed when comparing start and completion times.
pub const DEFAULT_TIME_TOLERANCE: f64 = 1e-9;

/// Prefix of synthetic slack event ids.
pub const DEFAULT_SLACK_PREFIX: &str = "slack-";

/// Joins an entity name to the local id of a scheduled non-goal event.
pub const ENTITY_SEPARATOR: &str = "::";

/// Which priority breaks ties between entities that are ready at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityPolicy {
    /// The priority given at spawn time.
    #[default]
    Declared,
    /// Declared priority plus the number of entities depending on this one.
    Effective,
}

/// Tunables shared by every navigator mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigatorConfig {
    /// Slop allowed when comparing start and completion times. Must be
    /// finite and non-negative.
    pub time_tolerance: f64,
    /// Prefix given to synthetic slack events.
    pub slack_prefix: String,
    /// Tie-breaking priority for dependency scheduling.
    pub priority: PriorityPolicy,
    /// Run entity generators on the rayon pool.
    pub parallel_generation: bool,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            time_tolerance: DEFAULT_TIME_TOLERANCE,
            slack_prefix: DEFAULT_SLACK_PREFIX.to_string(),
            priority: PriorityPolicy::Declared,
            parallel_generation: true,
        }
    }
}

impl NavigatorConfig {
    /// This configuration with a usable time tolerance.
    ///
    /// A negative or non-finite tolerance is replaced by
    /// [`DEFAULT_TIME_TOLERANCE`].
    pub fn sanitized(mut self) -> Self {
        if !(self.time_tolerance.is_finite() && self.time_tolerance >= 0.0) {
            warn!(
                tolerance = self.time_tolerance,
                "invalid time tolerance replaced by default"
            );
            self.time_tolerance = DEFAULT_TIME_TOLERANCE;
        }
        self
    }
}
