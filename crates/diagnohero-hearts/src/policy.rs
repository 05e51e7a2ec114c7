//! Regeneration policy.

use diagnohero_core::defaults::{DEFAULT_MAX_HEARTS, DEFAULT_SECONDS_PER_HEART};
use tracing::warn;

use crate::state::LifeState;

/// Tunables of the hearts mechanic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeartPolicy {
    /// Maximum number of hearts a user can hold.
    pub max_hearts: u32,
    /// Seconds of elapsed time that regenerate one heart. Must be > 0.
    pub seconds_per_heart: u64,
}

impl Default for HeartPolicy {
    fn default() -> Self {
        Self {
            max_hearts: DEFAULT_MAX_HEARTS,
            seconds_per_heart: DEFAULT_SECONDS_PER_HEART,
        }
    }
}

impl HeartPolicy {
    /// Create a policy. A zero `seconds_per_heart` is raised to 1.
    pub fn new(max_hearts: u32, seconds_per_heart: u64) -> Self {
        Self {
            max_hearts,
            seconds_per_heart: seconds_per_heart.max(1),
        }
    }

    /// Fresh state for a newly created account.
    #[inline]
    pub fn full(&self, now: i64) -> LifeState {
        LifeState::new(self.max_hearts, now)
    }

    /// Bring a stored heart count back into `[0, max_hearts]`.
    ///
    /// Out-of-range values mean a corrupted caller or row. They are clamped
    /// and logged rather than treated as errors.
    pub fn clamp_stored(&self, hearts: i64, last_refill_at: i64) -> LifeState {
        let clamped = hearts.clamp(0, i64::from(self.max_hearts));
        if clamped != hearts {
            warn!(
                hearts,
                max_hearts = self.max_hearts,
                "stored heart count out of range, clamping"
            );
        }
        // `clamped` fits in u32 because it is bounded by `max_hearts`.
        LifeState::new(u32::try_from(clamped).unwrap_or(self.max_hearts), last_refill_at)
    }
}
