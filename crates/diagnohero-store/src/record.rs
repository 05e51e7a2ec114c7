//! Records exchanged with stores.

use diagnohero_core::defaults::MAX_SESSION_TITLE_LEN;
use diagnohero_hearts::{HeartPolicy, LifeState};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// User row as held by a [`UserStore`](crate::UserStore).
///
/// Heart fields are kept exactly as stored. Callers go through
/// [`life_state`](Self::life_state) to get a clamped value, and through
/// [`stored_hearts`](Self::stored_hearts) for the conditional-update guard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserRecord {
    /// Stable user identifier.
    pub user_id: String,
    /// Stored heart count. Signed to match DB column types.
    pub hearts: i64,
    /// Regeneration anchor (unix seconds).
    pub last_refill_at: i64,
    /// Premium accounts bypass the hearts mechanic.
    pub premium: bool,
    /// Account creation time (unix seconds).
    pub created_at: i64,
}

impl UserRecord {
    /// Heart state clamped into the policy's range.
    #[inline]
    pub fn life_state(&self, policy: &HeartPolicy) -> LifeState {
        policy.clamp_stored(self.hearts, self.last_refill_at)
    }

    /// Raw stored values, used as the expected side of a conditional update.
    #[inline]
    pub fn stored_hearts(&self) -> StoredHearts {
        StoredHearts {
            hearts: self.hearts,
            last_refill_at: self.last_refill_at,
        }
    }
}

/// Heart columns exactly as last read from the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoredHearts {
    pub hearts: i64,
    pub last_refill_at: i64,
}

impl StoredHearts {
    /// Whether writing `state` would change the stored row.
    #[inline]
    pub fn differs_from(&self, state: LifeState) -> bool {
        self.hearts != i64::from(state.hearts) || self.last_refill_at != state.last_refill_at
    }
}

/// One answered quiz question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizAnswer {
    pub user_id: String,
    pub lection_id: String,
    pub correct: bool,
    pub created_at: i64,
}

/// Answer totals over a time window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AnswerCounts {
    pub total: u64,
    pub correct: u64,
}

impl AnswerCounts {
    /// Share of correct answers in percent, rounded; 0 when nothing was answered.
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    pub fn accuracy_percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        ((self.correct as f64 / self.total as f64) * 100.0).round() as u8
    }
}

/// Per-lection progress of one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LectionProgress {
    pub user_id: String,
    pub lection_id: String,
    /// Percentage, 0..=100.
    pub progress: u8,
    pub completed: bool,
    pub last_interaction: i64,
}

impl LectionProgress {
    /// Reject out-of-range percentages and empty identifiers.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.lection_id.trim().is_empty() {
            return Err(StoreError::invalid("lection id is required"));
        }
        if self.progress > 100 {
            return Err(StoreError::invalid("progress must be between 0 and 100"));
        }
        Ok(())
    }
}

/// A scheduled study session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudySession {
    pub id: i64,
    pub user_id: String,
    pub title: String,
    pub description: Option<String>,
    /// Scheduled time (unix seconds).
    pub date: i64,
    /// Free-form duration, e.g. "30 minutes".
    pub duration: Option<String>,
    pub completed: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Input for a new study session.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewStudySession {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub date: i64,
    #[serde(default)]
    pub duration: Option<String>,
}

impl NewStudySession {
    /// Trim fields and check the title.
    ///
    /// Empty optional fields are normalised to `None`.
    pub fn normalized(self) -> Result<Self, StoreError> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(StoreError::invalid("title is required"));
        }
        if title.chars().count() > MAX_SESSION_TITLE_LEN {
            return Err(StoreError::invalid(format!(
                "title must be at most {MAX_SESSION_TITLE_LEN} characters"
            )));
        }

        let non_empty = |s: Option<String>| {
            s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
        };

        Ok(Self {
            title,
            description: non_empty(self.description),
            date: self.date,
            duration: non_empty(self.duration),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_session(title: &str) -> NewStudySession {
        NewStudySession {
            title: title.to_string(),
            description: Some("  ".to_string()),
            date: 1_700_000_000,
            duration: Some(" 30 minutes ".to_string()),
        }
    }

    #[test]
    fn test_session_normalized() {
        let s = new_session("  Cardiology  ").normalized().unwrap();
        assert_eq!(s.title, "Cardiology");
        assert_eq!(s.description, None);
        assert_eq!(s.duration.as_deref(), Some("30 minutes"));
    }

    #[test]
    fn test_session_title_required() {
        assert!(matches!(
            new_session("   ").normalized(),
            Err(StoreError::Invalid(_))
        ));
        let long = "x".repeat(MAX_SESSION_TITLE_LEN + 1);
        assert!(new_session(&long).normalized().is_err());
    }

    #[test]
    fn test_accuracy_percent() {
        assert_eq!(AnswerCounts::default().accuracy_percent(), 0);
        let counts = AnswerCounts {
            total: 3,
            correct: 2,
        };
        assert_eq!(counts.accuracy_percent(), 67);
    }

    #[test]
    fn test_progress_validate() {
        let mut p = LectionProgress {
            user_id: "u1".into(),
            lection_id: "l1".into(),
            progress: 100,
            completed: true,
            last_interaction: 0,
        };
        assert!(p.validate().is_ok());
        p.progress = 101;
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_stored_hearts_differs() {
        let record = UserRecord {
            user_id: "u1".into(),
            hearts: 7,
            last_refill_at: 10,
            premium: false,
            created_at: 0,
        };
        let policy = HeartPolicy::default();
        let clamped = record.life_state(&policy);
        assert_eq!(clamped, LifeState::new(5, 10));
        assert!(record.stored_hearts().differs_from(clamped));
        assert!(!record.stored_hearts().differs_from(LifeState::new(7, 10)));
    }
}
