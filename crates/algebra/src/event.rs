//! Change events
//!
//! A [`ChangeEvent`] is an immutable record of either a deterministic state
//! transition (it carries `state_before`/`state_after`) or a speculative
//! future occurrence (it carries a probability below one and no resulting
//! state). Events are built through validating constructors and then only
//! ever copied into new values.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::ids::EventId;
use crate::value::State;

/// Direction of an event's effect.
///
/// Inversion flips the polarity. For purely probabilistic events this is the
/// only trace of the inversion besides the renamed id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Polarity {
    #[default]
    Forward,
    Inverse,
}

impl Polarity {
    pub fn flipped(self) -> Self {
        match self {
            Polarity::Forward => Polarity::Inverse,
            Polarity::Inverse => Polarity::Forward,
        }
    }
}

/// Atomic record of a state transition or a speculative future occurrence
///
/// Deserialization goes through the same validation as the constructors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawChangeEvent")]
pub struct ChangeEvent {
    eid: EventId,
    t0: f64,
    dt: f64,
    state_before: Option<State>,
    state_after: Option<State>,
    prob: f64,
    polarity: Polarity,
}

/// Unvalidated wire form of a [`ChangeEvent`]
#[derive(Deserialize)]
struct RawChangeEvent {
    eid: EventId,
    t0: f64,
    dt: f64,
    #[serde(default)]
    state_before: Option<State>,
    #[serde(default)]
    state_after: Option<State>,
    #[serde(default = "certain")]
    prob: f64,
    #[serde(default)]
    polarity: Polarity,
}

fn certain() -> f64 {
    1.0
}

impl TryFrom<RawChangeEvent> for ChangeEvent {
    type Error = Error;

    fn try_from(raw: RawChangeEvent) -> Result<Self> {
        let event = Self {
            eid: raw.eid,
            t0: raw.t0,
            dt: raw.dt,
            state_before: raw.state_before,
            state_after: raw.state_after,
            prob: raw.prob,
            polarity: raw.polarity,
        };
        event.validate()?;
        Ok(event)
    }
}

impl ChangeEvent {
    /// Create a certain event with no state snapshots.
    pub fn new(eid: impl Into<EventId>, t0: f64, dt: f64) -> Result<Self> {
        let event = Self {
            eid: eid.into(),
            t0,
            dt,
            state_before: None,
            state_after: None,
            prob: 1.0,
            polarity: Polarity::Forward,
        };
        event.validate()?;
        Ok(event)
    }

    /// Create a speculative event that occurs with probability `prob`.
    pub fn future(eid: impl Into<EventId>, t0: f64, dt: f64, prob: f64) -> Result<Self> {
        Self::new(eid, t0, dt)?.with_prob(prob)
    }

    /// Create a deterministic transition from `before` to `after`.
    pub fn transition(
        eid: impl Into<EventId>,
        t0: f64,
        dt: f64,
        before: impl Into<State>,
        after: impl Into<State>,
    ) -> Result<Self> {
        let event = Self::new(eid, t0, dt)?;
        Ok(event.with_states(Some(before.into()), Some(after.into())))
    }

    /// Copy of this event with a different probability.
    pub fn with_prob(mut self, prob: f64) -> Result<Self> {
        self.prob = prob;
        self.validate()?;
        Ok(self)
    }

    /// Copy of this event with different state snapshots.
    pub fn with_states(mut self, before: Option<State>, after: Option<State>) -> Self {
        self.state_before = before;
        self.state_after = after;
        self
    }

    /// Copy of this event under a different id.
    pub fn with_eid(mut self, eid: impl Into<EventId>) -> Self {
        self.eid = eid.into();
        self
    }

    /// Copy of this event starting at `t0`.
    pub fn with_t0(mut self, t0: f64) -> Result<Self> {
        self.t0 = t0;
        self.validate()?;
        Ok(self)
    }

    pub fn eid(&self) -> &EventId {
        &self.eid
    }

    pub fn t0(&self) -> f64 {
        self.t0
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Completion time (`t0 + dt`).
    pub fn end(&self) -> f64 {
        self.t0 + self.dt
    }

    pub fn prob(&self) -> f64 {
        self.prob
    }

    pub fn state_before(&self) -> Option<&State> {
        self.state_before.as_ref()
    }

    pub fn state_after(&self) -> Option<&State> {
        self.state_after.as_ref()
    }

    pub fn polarity(&self) -> Polarity {
        self.polarity
    }

    /// Speculative event: not certain and not yet realized.
    pub fn is_future(&self) -> bool {
        self.prob < 1.0 && self.state_after.is_none()
    }

    /// Check if the event id starts with `prefix` (slack events, for one).
    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.eid.has_prefix(prefix)
    }

    /// The inverse event, placed at `t0`.
    ///
    /// States are swapped, the polarity flips and the id is renamed. The
    /// probability is kept as is.
    pub(crate) fn inverted_at(&self, t0: f64) -> Self {
        Self {
            eid: self.eid.inverted(),
            t0,
            dt: self.dt,
            state_before: self.state_after.clone(),
            state_after: self.state_before.clone(),
            prob: self.prob,
            polarity: self.polarity.flipped(),
        }
    }

    fn validate(&self) -> Result<()> {
        let invalid = |reason: String| Error::InvalidEvent {
            eid: self.eid.clone(),
            reason,
        };
        if !self.t0.is_finite() {
            return Err(invalid(format!("t0 must be finite, got {}", self.t0)));
        }
        if !self.dt.is_finite() || self.dt < 0.0 {
            return Err(invalid(format!(
                "dt must be finite and non-negative, got {}",
                self.dt
            )));
        }
        if !(0.0..=1.0).contains(&self.prob) {
            return Err(invalid(format!("prob must be in [0, 1], got {}", self.prob)));
        }
        Ok(())
    }
}
