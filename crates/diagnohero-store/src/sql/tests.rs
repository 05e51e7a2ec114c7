//! Tests for the SQL store.

use diagnohero_hearts::{HeartPolicy, LifeState};

use crate::sql::{DatabaseType, SqlStore, SqlStoreConfig};
use crate::{
    HeartService, LectionProgress, NewStudySession, QuizAnswer, SpendOutcome, StoreError,
    StudyStore, UserStore,
};

const T: i64 = 1_700_000_000;

/// Create a test store with in-memory SQLite.
async fn setup_test_db() -> SqlStore {
    let config = SqlStoreConfig::new("sqlite::memory:")
        .max_connections(1)
        .init_schema(true);

    SqlStore::connect(config).await.expect("Failed to connect")
}

fn new_session(title: &str, date: i64) -> NewStudySession {
    NewStudySession {
        title: title.to_string(),
        description: Some("ECG basics".to_string()),
        date,
        duration: None,
    }
}

#[tokio::test]
async fn test_database_type_detection() {
    assert_eq!(
        DatabaseType::from_url("postgres://localhost/db"),
        Some(DatabaseType::PostgreSQL)
    );
    assert_eq!(
        DatabaseType::from_url("postgresql://localhost/db"),
        Some(DatabaseType::PostgreSQL)
    );
    assert_eq!(
        DatabaseType::from_url("mysql://localhost/db"),
        Some(DatabaseType::MySQL)
    );
    assert_eq!(
        DatabaseType::from_url("mariadb://localhost/db"),
        Some(DatabaseType::MySQL)
    );
    assert_eq!(
        DatabaseType::from_url("sqlite::memory:"),
        Some(DatabaseType::SQLite)
    );
    assert_eq!(DatabaseType::from_url("invalid://localhost"), None);
}

#[tokio::test]
async fn test_connect_rejects_unknown_scheme() {
    let err = SqlStore::connect(SqlStoreConfig::new("redis://localhost"))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Backend(_)));
}

#[tokio::test]
async fn test_init_schema_is_idempotent() {
    let store = setup_test_db().await;
    assert_eq!(store.database_type(), DatabaseType::SQLite);
    store.init_schema().await.unwrap();
}

#[tokio::test]
async fn test_create_and_find_user() {
    let store = setup_test_db().await;
    let created = store
        .create_user("u1", LifeState::new(5, T), T)
        .await
        .unwrap();

    let found = store.find_user("u1").await.unwrap().unwrap();
    assert_eq!(found, created);
    assert!(!found.premium);
    assert!(store.find_user("nobody").await.unwrap().is_none());
}

#[tokio::test]
async fn test_compare_and_set_hearts() {
    let store = setup_test_db().await;
    let record = store
        .create_user("u1", LifeState::new(3, T), T)
        .await
        .unwrap();
    let expected = record.stored_hearts();

    assert!(
        store
            .compare_and_set_hearts("u1", expected, LifeState::new(2, T))
            .await
            .unwrap()
    );
    assert!(
        !store
            .compare_and_set_hearts("u1", expected, LifeState::new(4, T + 3600))
            .await
            .unwrap()
    );

    let found = store.find_user("u1").await.unwrap().unwrap();
    assert_eq!(found.hearts, 2);
    assert_eq!(found.last_refill_at, T);
}

#[tokio::test]
async fn test_set_premium_and_list() {
    let store = setup_test_db().await;
    store
        .create_user("b", LifeState::new(5, T), T)
        .await
        .unwrap();
    store
        .create_user("a", LifeState::new(5, T), T)
        .await
        .unwrap();

    assert!(store.set_premium("a", true).await.unwrap());
    assert!(!store.set_premium("ghost", true).await.unwrap());

    let users = store.list_users().await.unwrap();
    let ids: Vec<_> = users.iter().map(|u| u.user_id.as_str()).collect();
    assert_eq!(ids, ["a", "b"]);
    assert!(users[0].premium);
    assert!(!users[1].premium);
}

#[tokio::test]
async fn test_answer_counts() {
    let store = setup_test_db().await;
    for (at, correct) in [(T - 10, false), (T, true), (T + 1, false), (T + 2, true)] {
        store
            .record_answer(QuizAnswer {
                user_id: "u1".into(),
                lection_id: "cardio-1".into(),
                correct,
                created_at: at,
            })
            .await
            .unwrap();
    }

    let counts = store.answer_counts_since("u1", T).await.unwrap();
    assert_eq!(counts.total, 3);
    assert_eq!(counts.correct, 2);

    let none = store.answer_counts_since("u2", 0).await.unwrap();
    assert_eq!(none.total, 0);
    assert_eq!(none.correct, 0);
}

#[tokio::test]
async fn test_progress_upsert() {
    let store = setup_test_db().await;
    let mut progress = LectionProgress {
        user_id: "u1".into(),
        lection_id: "cardio-1".into(),
        progress: 30,
        completed: false,
        last_interaction: T,
    };
    store.upsert_progress(&progress).await.unwrap();
    assert_eq!(store.completed_lections("u1").await.unwrap(), 0);

    progress.progress = 100;
    progress.completed = true;
    progress.last_interaction = T + 60;
    store.upsert_progress(&progress).await.unwrap();

    let found = store
        .find_progress("u1", "cardio-1")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found, progress);
    assert_eq!(store.completed_lections("u1").await.unwrap(), 1);
    assert!(store.find_progress("u1", "other").await.unwrap().is_none());
}

#[tokio::test]
async fn test_study_sessions() {
    let store = setup_test_db().await;
    let first = store
        .add_session("u1", new_session("Cardiology", T), T)
        .await
        .unwrap();
    let second = store
        .add_session("u1", new_session("Neurology", T + 86_400), T)
        .await
        .unwrap();
    store
        .add_session("u2", new_session("Other user", T), T)
        .await
        .unwrap();
    assert_ne!(first.id, second.id);

    let listed = store.list_sessions("u1").await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].title, "Neurology");
    assert_eq!(listed[1].description.as_deref(), Some("ECG basics"));
    assert_eq!(listed[1].duration, None);

    // Other users can't touch the session.
    assert!(
        !store
            .set_session_completed("u2", first.id, true, T + 5)
            .await
            .unwrap()
    );
    assert!(!store.delete_session("u2", first.id).await.unwrap());

    assert!(
        store
            .set_session_completed("u1", first.id, true, T + 5)
            .await
            .unwrap()
    );
    let listed = store.list_sessions("u1").await.unwrap();
    assert!(listed[1].completed);
    assert_eq!(listed[1].updated_at, T + 5);

    assert!(store.delete_session("u1", first.id).await.unwrap());
    assert!(!store.delete_session("u1", first.id).await.unwrap());
    assert_eq!(store.list_sessions("u1").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_heart_service_over_sql() {
    let store = setup_test_db().await;
    let svc = HeartService::new(store, HeartPolicy::default());

    svc.ensure_user("u1", T).await.unwrap();
    let outcome = svc.spend_heart("u1", T + 10).await.unwrap();
    assert_eq!(
        outcome,
        SpendOutcome::Spent {
            remaining: 4,
            next_heart_in: Some(3600)
        }
    );

    let status = svc.hearts("u1", T + 10 + 3600).await.unwrap();
    assert_eq!(status.hearts.count(), Some(5));
    assert_eq!(status.next_heart_in, None);

    let record = svc.store().find_user("u1").await.unwrap().unwrap();
    assert_eq!(record.hearts, 5);
    assert_eq!(record.last_refill_at, T + 10 + 3600);
}
