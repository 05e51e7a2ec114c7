//! Storage and the hearts protocol for DiagnoHero.
//!
//! This crate owns everything that persists user state: heart counters,
//! the premium flag, answered questions, lection progress and study
//! sessions. Stores only move data; [`HeartService`] runs the
//! read-regenerate-write protocol on top of any [`UserStore`].
//!
//! # Example
//!
//! ```
//! use diagnohero_hearts::HeartPolicy;
//! use diagnohero_store::{HeartService, MemoryStore};
//!
//! # async fn example() -> Result<(), diagnohero_store::StoreError> {
//! let hearts = HeartService::new(MemoryStore::new(), HeartPolicy::default());
//!
//! let now = 1_700_000_000;
//! hearts.ensure_user("student-1", now).await?;
//! let outcome = hearts.spend_heart("student-1", now).await?;
//! assert_eq!(outcome.hearts(), Some(4));
//! # Ok(())
//! # }
//! ```

mod error;
mod memory;
mod record;
mod service;
mod traits;

#[cfg(feature = "sql")]
pub mod cli;
#[cfg(feature = "sql")]
pub mod sql;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use record::{
    AnswerCounts, LectionProgress, NewStudySession, QuizAnswer, StoredHearts, StudySession,
    UserRecord,
};
pub use service::{HeartService, HeartStatus, SpendOutcome};
pub use traits::{Store, StudyStore, UserStore};

#[cfg(feature = "sql")]
pub use cli::AdminArgs;
