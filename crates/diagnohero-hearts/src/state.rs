//! Per-user heart state.

use crate::engine::{self, Consumption};
use crate::policy::HeartPolicy;

/// Stored heart count together with its regeneration anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LifeState {
    /// Current number of hearts.
    pub hearts: u32,
    /// Unix timestamp (seconds) from which regeneration is measured.
    pub last_refill_at: i64,
}

impl LifeState {
    #[inline]
    pub const fn new(hearts: u32, last_refill_at: i64) -> Self {
        Self {
            hearts,
            last_refill_at,
        }
    }

    /// Classify the state under the given policy.
    pub fn phase(&self, policy: &HeartPolicy) -> HeartPhase {
        if self.hearts >= policy.max_hearts {
            HeartPhase::Full
        } else if self.hearts == 0 {
            HeartPhase::Depleted
        } else {
            HeartPhase::Partial
        }
    }

    /// Spend one heart for an incorrect answer.
    ///
    /// The anchor is kept on spend so that time accrued before the miss still
    /// counts. The one exception is a spend out of [`HeartPhase::Full`]: a
    /// full counter's anchor is left stale by regeneration, so the window
    /// for the first missing heart opens now.
    ///
    /// Returns the new state and whether the spend was allowed. A depleted
    /// state is returned unchanged.
    pub fn spend(self, policy: &HeartPolicy, now: i64) -> (Self, bool) {
        let Consumption { hearts, allowed } = engine::consume_heart(self.hearts);
        if !allowed {
            return (self, false);
        }

        let last_refill_at = if self.hearts >= policy.max_hearts {
            self.last_refill_at.max(now)
        } else {
            self.last_refill_at
        };

        (Self::new(hearts, last_refill_at), true)
    }
}

/// Coarse state of the hearts machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeartPhase {
    /// `hearts == max_hearts`; nothing to regenerate.
    Full,
    /// `0 < hearts < max_hearts`.
    Partial,
    /// `hearts == 0`; consumption is blocked until a heart regenerates.
    Depleted,
}

/// Heart count as presented to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectiveHearts {
    /// Regular account with a bounded counter.
    Limited(u32),
    /// Premium account; the mechanic does not apply.
    Unlimited,
}

impl EffectiveHearts {
    /// Whether an attempt may be made right now.
    #[inline]
    pub fn can_attempt(&self) -> bool {
        match self {
            Self::Limited(n) => *n > 0,
            Self::Unlimited => true,
        }
    }

    /// The bounded count, if any.
    #[inline]
    pub fn count(&self) -> Option<u32> {
        match self {
            Self::Limited(n) => Some(*n),
            Self::Unlimited => None,
        }
    }
}
