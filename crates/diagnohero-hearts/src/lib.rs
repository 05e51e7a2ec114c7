//! Heart (lives) regeneration for DiagnoHero quizzes.
//!
//! Hearts are not ticked by a background timer. Instead the elapsed time
//! since the last refill anchor is settled lazily whenever a user's record
//! is read: whole regeneration periods become hearts, the anchor advances
//! by exactly those periods, and any remainder carries over.
//!
//! # Example
//!
//! ```
//! use diagnohero_hearts::{HeartPolicy, LifeState, regenerate};
//!
//! let policy = HeartPolicy::default();
//! let state = LifeState::new(3, 1_000);
//!
//! let result = regenerate(&policy, state, 1_000 + 3600);
//! assert!(result.changed);
//! assert_eq!(result.state, LifeState::new(4, 1_000 + 3600));
//! ```

mod engine;
mod policy;
mod state;

pub use engine::{
    Consumption, Regeneration, consume_heart, regenerate, time_until_next_heart,
};
pub use policy::HeartPolicy;
pub use state::{EffectiveHearts, HeartPhase, LifeState};
