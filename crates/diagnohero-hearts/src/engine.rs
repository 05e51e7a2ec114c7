//! Pure regeneration and consumption functions.
//!
//! All functions take `now` from the caller and read no clock of their own,
//! so one request settles its state against a single instant.

use tracing::{debug, warn};

use crate::policy::HeartPolicy;
use crate::state::LifeState;

/// Result of [`regenerate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Regeneration {
    /// State visible at `now`.
    pub state: LifeState,
    /// Whether `state` differs from the input and must be persisted.
    pub changed: bool,
}

/// Result of [`consume_heart`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Consumption {
    /// Heart count after the attempt.
    pub hearts: u32,
    /// `false` when no heart was left to spend.
    pub allowed: bool,
}

/// Settle elapsed time against a stored heart state.
///
/// Only whole regeneration periods are converted into hearts and the anchor
/// advances by exactly those periods, so the remainder stays available for
/// the next call. A full counter is returned untouched (its anchor is left
/// stale), as is a state whose anchor lies in the future.
///
/// A heart count above `max_hearts` is clamped down; that is reported as a
/// change so the corrected value gets written back.
pub fn regenerate(policy: &HeartPolicy, state: LifeState, now: i64) -> Regeneration {
    if state.hearts > policy.max_hearts {
        warn!(
            hearts = state.hearts,
            max_hearts = policy.max_hearts,
            "heart count above maximum, clamping"
        );
        return Regeneration {
            state: LifeState::new(policy.max_hearts, state.last_refill_at),
            changed: true,
        };
    }

    let unchanged = Regeneration {
        state,
        changed: false,
    };

    if state.hearts == policy.max_hearts {
        return unchanged;
    }

    let Some(elapsed) = elapsed_secs(state.last_refill_at, now) else {
        debug!(
            last_refill_at = state.last_refill_at,
            now, "refill anchor is in the future, skipping regeneration"
        );
        return unchanged;
    };

    let seconds_per_heart = policy.seconds_per_heart.max(1);
    let gained = elapsed / seconds_per_heart;
    if gained == 0 {
        return unchanged;
    }

    let hearts = u64::from(state.hearts)
        .saturating_add(gained)
        .min(u64::from(policy.max_hearts));
    // gained * seconds_per_heart <= elapsed, which came from an i64 difference.
    let consumed = i64::try_from(gained * seconds_per_heart).unwrap_or(i64::MAX);

    let next = LifeState::new(
        u32::try_from(hearts).unwrap_or(policy.max_hearts),
        state.last_refill_at.saturating_add(consumed),
    );

    debug!(
        from = state.hearts,
        to = next.hearts,
        gained,
        "hearts regenerated"
    );

    Regeneration {
        state: next,
        changed: true,
    }
}

/// Try to spend one heart.
///
/// Returns `allowed = false` with the count unchanged when nothing is left.
#[inline]
pub fn consume_heart(hearts: u32) -> Consumption {
    match hearts.checked_sub(1) {
        Some(hearts) => Consumption {
            hearts,
            allowed: true,
        },
        None => Consumption {
            hearts,
            allowed: false,
        },
    }
}

/// Seconds until the next whole heart regenerates.
///
/// `None` when the counter is full.
pub fn time_until_next_heart(policy: &HeartPolicy, state: LifeState, now: i64) -> Option<u64> {
    if state.hearts >= policy.max_hearts {
        return None;
    }
    let seconds_per_heart = policy.seconds_per_heart.max(1);
    let elapsed = elapsed_secs(state.last_refill_at, now).unwrap_or(0);
    Some(seconds_per_heart - elapsed % seconds_per_heart)
}

/// Non-negative seconds between `from` and `now`, `None` on clock skew.
#[inline]
fn elapsed_secs(from: i64, now: i64) -> Option<u64> {
    u64::try_from(now.checked_sub(from)?).ok()
}
