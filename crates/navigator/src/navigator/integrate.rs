//! Vector-field integration
//!
//! Explicit forward-Euler stepping. Deterministic, no search.

use tracing::{instrument, trace};

use crate::error::{Error, Result};
use crate::metric::Metric;

use super::Navigator;

/// Vector field `f(x) -> Δx`
pub trait VectorField {
    fn delta(&self, x: &[f64]) -> Vec<f64>;
}

impl<F> VectorField for F
where
    F: Fn(&[f64]) -> Vec<f64>,
{
    fn delta(&self, x: &[f64]) -> Vec<f64> {
        self(x)
    }
}

impl<M: Metric> Navigator<M> {
    /// Step `x_{k+1} = x_k + h * f(x_k)` for `steps` steps.
    ///
    /// Returns `steps + 1` states, starting with `x0`.
    #[instrument(skip(self, field, x0), fields(dim = x0.len()))]
    pub fn integrate<F>(
        &self,
        field: &F,
        x0: &[f64],
        steps: usize,
        step_size: f64,
    ) -> Result<Vec<Vec<f64>>>
    where
        F: VectorField + ?Sized,
    {
        let mut trajectory = Vec::with_capacity(steps + 1);
        let mut x = x0.to_vec();
        trajectory.push(x.clone());

        for step in 0..steps {
            let delta = field.delta(&x);
            if delta.len() != x.len() {
                return Err(Error::DimensionMismatch {
                    step,
                    expected: x.len(),
                    found: delta.len(),
                });
            }
            for (xi, di) in x.iter_mut().zip(&delta) {
                *xi += step_size * di;
            }
            trace!(step, ?x, "integrated");
            trajectory.push(x.clone());
        }

        Ok(trajectory)
    }
}
