//! The navigator engine
//!
//! One [`Navigator`] value drives every mode:
//!
//! - **integrate**: forward-Euler stepping over a vector field
//! - **scenarios**: the most probable maximal chains of a probabilistic set
//! - **goal**: minimum-cost path from an entity's current state to its goal
//! - **schedule**: dependency-aware merge of many entities' timelines
//!
//! All modes are pure functions of their inputs. The navigator holds only
//! its metric and configuration.

mod goal;
mod integrate;
mod scenarios;
mod schedule;

use tracing::{info, trace, warn};

use chronos_algebra::EventId;

use crate::config::NavigatorConfig;
use crate::metric::{DurationMetric, Metric};

pub use integrate::VectorField;

/// Path-search and schedule-merging engine
#[derive(Debug, Clone)]
pub struct Navigator<M = DurationMetric> {
    metric: M,
    config: NavigatorConfig,
}

impl Navigator<DurationMetric> {
    /// Navigator costing moves by event duration.
    pub fn new() -> Self {
        Self::with_metric(DurationMetric)
    }
}

impl Default for Navigator<DurationMetric> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Metric> Navigator<M> {
    pub fn with_metric(metric: M) -> Self {
        Self {
            metric,
            config: NavigatorConfig::default(),
        }
    }

    /// Replace the configuration. An unusable time tolerance falls back to
    /// the default.
    pub fn with_config(mut self, config: NavigatorConfig) -> Self {
        let config = config.sanitized();
        info!(
            priority = ?config.priority,
            parallel = config.parallel_generation,
            "navigator configured"
        );
        self.config = config;
        self
    }

    pub fn metric(&self) -> &M {
        &self.metric
    }

    pub fn config(&self) -> &NavigatorConfig {
        &self.config
    }

    /// Metric cost clamped to the search contract.
    ///
    /// Non-finite costs mark a move impassable; negative costs count as zero.
    fn sanitize_cost(&self, cost: f64, to: &EventId) -> Option<f64> {
        if !cost.is_finite() {
            trace!(to = %to, cost, "impassable move");
            return None;
        }
        if cost < 0.0 {
            warn!(to = %to, cost, "negative metric distance clamped to zero");
            return Some(0.0);
        }
        Some(cost)
    }
}
