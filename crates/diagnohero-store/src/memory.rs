//! In-memory store.

use std::collections::HashMap;

use async_trait::async_trait;
use diagnohero_hearts::LifeState;
use parking_lot::RwLock;

use crate::error::StoreError;
use crate::record::{
    AnswerCounts, LectionProgress, NewStudySession, QuizAnswer, StoredHearts, StudySession,
    UserRecord,
};
use crate::traits::{StudyStore, UserStore};

/// Store keeping everything in process memory.
///
/// Suitable for development and tests. Conditional updates are checked and
/// applied under one write lock, so they are atomic with respect to each
/// other. Uses `parking_lot::RwLock`, which doesn't poison on panic.
///
/// The answer log is append-only and never pruned, so memory grows with
/// every recorded answer for the lifetime of the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<String, UserRecord>>,
    answers: RwLock<Vec<QuizAnswer>>,
    progress: RwLock<HashMap<(String, String), LectionProgress>>,
    sessions: RwLock<Sessions>,
}

#[derive(Debug, Default)]
struct Sessions {
    next_id: i64,
    rows: Vec<StudySession>,
}

impl MemoryStore {
    /// Create an empty store.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a raw user row.
    ///
    /// Bypasses all checks; intended for seeding and tests.
    pub fn put_user(&self, record: UserRecord) {
        self.users.write().insert(record.user_id.clone(), record);
    }

    /// Number of registered users.
    #[inline]
    pub fn len(&self) -> usize {
        self.users.read().len()
    }

    /// Check if no users are registered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.users.read().is_empty()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_user(&self, user_id: &str) -> Result<Option<UserRecord>, StoreError> {
        Ok(self.users.read().get(user_id).cloned())
    }

    async fn create_user(
        &self,
        user_id: &str,
        state: LifeState,
        now: i64,
    ) -> Result<UserRecord, StoreError> {
        let mut users = self.users.write();
        if users.contains_key(user_id) {
            return Err(StoreError::AlreadyExists);
        }
        let record = UserRecord {
            user_id: user_id.to_string(),
            hearts: i64::from(state.hearts),
            last_refill_at: state.last_refill_at,
            premium: false,
            created_at: now,
        };
        users.insert(user_id.to_string(), record.clone());
        Ok(record)
    }

    async fn compare_and_set_hearts(
        &self,
        user_id: &str,
        expected: StoredHearts,
        new: LifeState,
    ) -> Result<bool, StoreError> {
        let mut users = self.users.write();
        match users.get_mut(user_id) {
            Some(record) if record.stored_hearts() == expected => {
                record.hearts = i64::from(new.hearts);
                record.last_refill_at = new.last_refill_at;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn set_premium(&self, user_id: &str, premium: bool) -> Result<bool, StoreError> {
        let mut users = self.users.write();
        match users.get_mut(user_id) {
            Some(record) => {
                record.premium = premium;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_users(&self) -> Result<Vec<UserRecord>, StoreError> {
        let mut users: Vec<_> = self.users.read().values().cloned().collect();
        users.sort_by(|a, b| a.user_id.cmp(&b.user_id));
        Ok(users)
    }
}

#[async_trait]
impl StudyStore for MemoryStore {
    async fn record_answer(&self, answer: QuizAnswer) -> Result<(), StoreError> {
        self.answers.write().push(answer);
        Ok(())
    }

    async fn answer_counts_since(
        &self,
        user_id: &str,
        since: i64,
    ) -> Result<AnswerCounts, StoreError> {
        let answers = self.answers.read();
        let counts = answers
            .iter()
            .filter(|a| a.user_id == user_id && a.created_at >= since)
            .fold(AnswerCounts::default(), |mut acc, a| {
                acc.total += 1;
                if a.correct {
                    acc.correct += 1;
                }
                acc
            });
        Ok(counts)
    }

    async fn upsert_progress(&self, progress: &LectionProgress) -> Result<(), StoreError> {
        let key = (progress.user_id.clone(), progress.lection_id.clone());
        self.progress.write().insert(key, progress.clone());
        Ok(())
    }

    async fn find_progress(
        &self,
        user_id: &str,
        lection_id: &str,
    ) -> Result<Option<LectionProgress>, StoreError> {
        let key = (user_id.to_string(), lection_id.to_string());
        Ok(self.progress.read().get(&key).cloned())
    }

    async fn completed_lections(&self, user_id: &str) -> Result<u64, StoreError> {
        let count = self
            .progress
            .read()
            .values()
            .filter(|p| p.user_id == user_id && p.completed)
            .count();
        Ok(count as u64)
    }

    async fn list_sessions(&self, user_id: &str) -> Result<Vec<StudySession>, StoreError> {
        let mut rows: Vec<_> = self
            .sessions
            .read()
            .rows
            .iter()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
        Ok(rows)
    }

    async fn add_session(
        &self,
        user_id: &str,
        session: NewStudySession,
        now: i64,
    ) -> Result<StudySession, StoreError> {
        let mut sessions = self.sessions.write();
        sessions.next_id += 1;
        let row = StudySession {
            id: sessions.next_id,
            user_id: user_id.to_string(),
            title: session.title,
            description: session.description,
            date: session.date,
            duration: session.duration,
            completed: false,
            created_at: now,
            updated_at: now,
        };
        sessions.rows.push(row.clone());
        Ok(row)
    }

    async fn delete_session(&self, user_id: &str, id: i64) -> Result<bool, StoreError> {
        let mut sessions = self.sessions.write();
        let before = sessions.rows.len();
        sessions
            .rows
            .retain(|s| !(s.id == id && s.user_id == user_id));
        Ok(sessions.rows.len() != before)
    }

    async fn set_session_completed(
        &self,
        user_id: &str,
        id: i64,
        completed: bool,
        now: i64,
    ) -> Result<bool, StoreError> {
        let mut sessions = self.sessions.write();
        match sessions
            .rows
            .iter_mut()
            .find(|s| s.id == id && s.user_id == user_id)
        {
            Some(row) => {
                row.completed = completed;
                row.updated_at = now;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
