//! Data-access traits.

use std::sync::Arc;

use async_trait::async_trait;
use diagnohero_hearts::LifeState;

use crate::error::StoreError;
use crate::record::{
    AnswerCounts, LectionProgress, NewStudySession, QuizAnswer, StoredHearts, StudySession,
    UserRecord,
};

/// Data-access layer for user accounts and their heart state.
///
/// Implementations provide data retrieval and persistence only. The
/// regeneration protocol lives in [`HeartService`](crate::HeartService),
/// which wraps a `UserStore`.
///
/// Implementations must be thread-safe (`Send + Sync`) as they are called
/// concurrently from request handlers.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Look up a user. Returns `None` if no such user exists.
    async fn find_user(&self, user_id: &str) -> Result<Option<UserRecord>, StoreError>;

    /// Create a user with the given heart state.
    ///
    /// Fails with [`StoreError::AlreadyExists`] if the id is taken.
    async fn create_user(
        &self,
        user_id: &str,
        state: LifeState,
        now: i64,
    ) -> Result<UserRecord, StoreError>;

    /// Atomically replace the heart columns if they still hold `expected`.
    ///
    /// Returns `false` when the row changed since it was read (or vanished).
    /// Callers only invoke this when `new` differs from `expected`.
    async fn compare_and_set_hearts(
        &self,
        user_id: &str,
        expected: StoredHearts,
        new: LifeState,
    ) -> Result<bool, StoreError>;

    /// Set the premium flag. Returns `false` if the user does not exist.
    async fn set_premium(&self, user_id: &str, premium: bool) -> Result<bool, StoreError>;

    /// All users ordered by id.
    async fn list_users(&self) -> Result<Vec<UserRecord>, StoreError>;
}

/// Data-access layer for quiz activity, lection progress and study sessions.
///
/// Every operation is scoped to a user id; rows of other users behave as
/// missing.
#[async_trait]
pub trait StudyStore: Send + Sync {
    /// Append an answered question to the activity log.
    async fn record_answer(&self, answer: QuizAnswer) -> Result<(), StoreError>;

    /// Count answers given at or after `since`.
    async fn answer_counts_since(
        &self,
        user_id: &str,
        since: i64,
    ) -> Result<AnswerCounts, StoreError>;

    /// Insert or replace the progress row for `(user_id, lection_id)`.
    async fn upsert_progress(&self, progress: &LectionProgress) -> Result<(), StoreError>;

    /// Progress row for one lection.
    async fn find_progress(
        &self,
        user_id: &str,
        lection_id: &str,
    ) -> Result<Option<LectionProgress>, StoreError>;

    /// Number of lections marked completed.
    async fn completed_lections(&self, user_id: &str) -> Result<u64, StoreError>;

    /// Study sessions, latest scheduled date first.
    async fn list_sessions(&self, user_id: &str) -> Result<Vec<StudySession>, StoreError>;

    /// Store a new (already validated) study session.
    async fn add_session(
        &self,
        user_id: &str,
        session: NewStudySession,
        now: i64,
    ) -> Result<StudySession, StoreError>;

    /// Delete a session. Returns `false` if not found for this user.
    async fn delete_session(&self, user_id: &str, id: i64) -> Result<bool, StoreError>;

    /// Toggle completion. Returns `false` if not found for this user.
    async fn set_session_completed(
        &self,
        user_id: &str,
        id: i64,
        completed: bool,
        now: i64,
    ) -> Result<bool, StoreError>;
}

/// Blanket implementation for `Arc<S>` where `S: UserStore`.
///
/// This allows sharing one store between the heart service and other handlers.
#[async_trait]
impl<S: UserStore + ?Sized> UserStore for Arc<S> {
    #[inline]
    async fn find_user(&self, user_id: &str) -> Result<Option<UserRecord>, StoreError> {
        (**self).find_user(user_id).await
    }

    #[inline]
    async fn create_user(
        &self,
        user_id: &str,
        state: LifeState,
        now: i64,
    ) -> Result<UserRecord, StoreError> {
        (**self).create_user(user_id, state, now).await
    }

    #[inline]
    async fn compare_and_set_hearts(
        &self,
        user_id: &str,
        expected: StoredHearts,
        new: LifeState,
    ) -> Result<bool, StoreError> {
        (**self).compare_and_set_hearts(user_id, expected, new).await
    }

    #[inline]
    async fn set_premium(&self, user_id: &str, premium: bool) -> Result<bool, StoreError> {
        (**self).set_premium(user_id, premium).await
    }

    #[inline]
    async fn list_users(&self) -> Result<Vec<UserRecord>, StoreError> {
        (**self).list_users().await
    }
}

#[async_trait]
impl<S: StudyStore + ?Sized> StudyStore for Arc<S> {
    #[inline]
    async fn record_answer(&self, answer: QuizAnswer) -> Result<(), StoreError> {
        (**self).record_answer(answer).await
    }

    #[inline]
    async fn answer_counts_since(
        &self,
        user_id: &str,
        since: i64,
    ) -> Result<AnswerCounts, StoreError> {
        (**self).answer_counts_since(user_id, since).await
    }

    #[inline]
    async fn upsert_progress(&self, progress: &LectionProgress) -> Result<(), StoreError> {
        (**self).upsert_progress(progress).await
    }

    #[inline]
    async fn find_progress(
        &self,
        user_id: &str,
        lection_id: &str,
    ) -> Result<Option<LectionProgress>, StoreError> {
        (**self).find_progress(user_id, lection_id).await
    }

    #[inline]
    async fn completed_lections(&self, user_id: &str) -> Result<u64, StoreError> {
        (**self).completed_lections(user_id).await
    }

    #[inline]
    async fn list_sessions(&self, user_id: &str) -> Result<Vec<StudySession>, StoreError> {
        (**self).list_sessions(user_id).await
    }

    #[inline]
    async fn add_session(
        &self,
        user_id: &str,
        session: NewStudySession,
        now: i64,
    ) -> Result<StudySession, StoreError> {
        (**self).add_session(user_id, session, now).await
    }

    #[inline]
    async fn delete_session(&self, user_id: &str, id: i64) -> Result<bool, StoreError> {
        (**self).delete_session(user_id, id).await
    }

    #[inline]
    async fn set_session_completed(
        &self,
        user_id: &str,
        id: i64,
        completed: bool,
        now: i64,
    ) -> Result<bool, StoreError> {
        (**self)
            .set_session_completed(user_id, id, completed, now)
            .await
    }
}

/// Everything the HTTP service needs from one backend.
///
/// Implemented automatically for any type that is both a [`UserStore`] and a
/// [`StudyStore`], so `Arc<dyn Store>` can back the whole application.
pub trait Store: UserStore + StudyStore {}

impl<T: UserStore + StudyStore + ?Sized> Store for T {}
