//! Cost metrics
//!
//! The navigator never computes a cost itself. Every search asks a
//! [`Metric`] how expensive it is to move from one event to the next and
//! whether the move is allowed at all. Strategies shipped here:
//!
//! - [`DurationMetric`]: the destination's duration (the default)
//! - [`FnMetric`]: any closure, e.g. a geodesic distance on a manifold
//! - [`TrustWeighted`]: a base metric scaled up by distrust from a
//!   [`TrustSource`]

use chronos_algebra::{ChangeEvent, EventId};

/// Cost function used by the navigator's searches.
///
/// Distances must be non-negative for shortest-path search to be correct.
/// A non-finite distance marks the move as impassable.
pub trait Metric {
    /// Cost of moving from `from` to `to`.
    fn distance(&self, from: &ChangeEvent, to: &ChangeEvent) -> f64;

    /// Cost of entering `to` straight from the current state.
    fn entry_cost(&self, to: &ChangeEvent) -> f64 {
        to.dt()
    }

    /// Whether `to` may follow `from`.
    ///
    /// Default: no temporal overlap, `to` starts once `from` completes.
    fn eligible(&self, from: &ChangeEvent, to: &ChangeEvent, tolerance: f64) -> bool {
        to.t0() + tolerance >= from.end()
    }
}

impl<M: Metric + ?Sized> Metric for &M {
    fn distance(&self, from: &ChangeEvent, to: &ChangeEvent) -> f64 {
        (**self).distance(from, to)
    }

    fn entry_cost(&self, to: &ChangeEvent) -> f64 {
        (**self).entry_cost(to)
    }

    fn eligible(&self, from: &ChangeEvent, to: &ChangeEvent, tolerance: f64) -> bool {
        (**self).eligible(from, to, tolerance)
    }
}

impl<M: Metric + ?Sized> Metric for Box<M> {
    fn distance(&self, from: &ChangeEvent, to: &ChangeEvent) -> f64 {
        (**self).distance(from, to)
    }

    fn entry_cost(&self, to: &ChangeEvent) -> f64 {
        (**self).entry_cost(to)
    }

    fn eligible(&self, from: &ChangeEvent, to: &ChangeEvent, tolerance: f64) -> bool {
        (**self).eligible(from, to, tolerance)
    }
}

/// Cost is the duration of the destination event
#[derive(Debug, Clone, Copy, Default)]
pub struct DurationMetric;

impl Metric for DurationMetric {
    fn distance(&self, _from: &ChangeEvent, to: &ChangeEvent) -> f64 {
        to.dt()
    }
}

/// Closure-backed metric
pub struct FnMetric<F>(pub F);

impl<F> Metric for FnMetric<F>
where
    F: Fn(&ChangeEvent, &ChangeEvent) -> f64,
{
    fn distance(&self, from: &ChangeEvent, to: &ChangeEvent) -> f64 {
        (self.0)(from, to)
    }
}

/// Source of pairwise trust in `[0, 1]`
pub trait TrustSource {
    fn get_trust(&self, from: &EventId, to: &EventId) -> f64;
}

impl<F> TrustSource for F
where
    F: Fn(&EventId, &EventId) -> f64,
{
    fn get_trust(&self, from: &EventId, to: &EventId) -> f64 {
        self(from, to)
    }
}

/// Base metric inflated by distrust.
///
/// `distance = base * (1 + penalty * (1 - trust))`, with trust clamped to
/// `[0, 1]`. Fully trusted moves cost exactly the base distance.
pub struct TrustWeighted<M, T> {
    base: M,
    trust: T,
    penalty: f64,
}

impl<M: Metric, T: TrustSource> TrustWeighted<M, T> {
    pub fn new(base: M, trust: T, penalty: f64) -> Self {
        Self {
            base,
            trust,
            penalty: penalty.max(0.0),
        }
    }
}

impl<M: Metric, T: TrustSource> Metric for TrustWeighted<M, T> {
    fn distance(&self, from: &ChangeEvent, to: &ChangeEvent) -> f64 {
        let trust = self.trust.get_trust(from.eid(), to.eid()).clamp(0.0, 1.0);
        self.base.distance(from, to) * (1.0 + self.penalty * (1.0 - trust))
    }

    fn entry_cost(&self, to: &ChangeEvent) -> f64 {
        self.base.entry_cost(to)
    }

    fn eligible(&self, from: &ChangeEvent, to: &ChangeEvent, tolerance: f64) -> bool {
        self.base.eligible(from, to, tolerance)
    }
}
