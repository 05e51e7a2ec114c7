//! Read-regenerate-write protocol on top of a [`UserStore`].
//!
//! [`HeartService<S>`] is the only place that mutates heart columns. Every
//! mutation follows the same steps:
//! 1. read the user row
//! 2. settle regeneration at `now`
//! 3. apply the operation (spend, refill, ...)
//! 4. write back with a conditional update guarded by the values read in 1
//!
//! A lost conditional update is retried once against a fresh read; a second
//! loss surfaces as [`StoreError::Conflict`].

use diagnohero_hearts::{EffectiveHearts, HeartPolicy, LifeState, regenerate, time_until_next_heart};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::record::UserRecord;
use crate::traits::UserStore;

/// Read + conditional write attempts before giving up.
const MAX_ATTEMPTS: usize = 2;

/// Heart counter as seen by a caller at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeartStatus {
    pub hearts: EffectiveHearts,
    pub max_hearts: u32,
    /// Seconds until the next heart; `None` when full or premium.
    pub next_heart_in: Option<u64>,
    pub premium: bool,
}

impl HeartStatus {
    fn unlimited(policy: &HeartPolicy) -> Self {
        Self {
            hearts: EffectiveHearts::Unlimited,
            max_hearts: policy.max_hearts,
            next_heart_in: None,
            premium: true,
        }
    }

    fn limited(policy: &HeartPolicy, state: LifeState, now: i64) -> Self {
        Self {
            hearts: EffectiveHearts::Limited(state.hearts),
            max_hearts: policy.max_hearts,
            next_heart_in: time_until_next_heart(policy, state, now),
            premium: false,
        }
    }
}

/// JSON shape: `hearts` is `null` for premium accounts.
impl Serialize for HeartStatus {
    fn serialize<Ser: serde::Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        use serde::ser::SerializeStruct;

        let mut s = serializer.serialize_struct("HeartStatus", 4)?;
        s.serialize_field("hearts", &self.hearts.count())?;
        s.serialize_field("max_hearts", &self.max_hearts)?;
        s.serialize_field("next_heart_in", &self.next_heart_in)?;
        s.serialize_field("premium", &self.premium)?;
        s.end()
    }
}

/// Result of [`HeartService::spend_heart`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpendOutcome {
    /// One heart was spent.
    Spent {
        remaining: u32,
        next_heart_in: Option<u64>,
    },
    /// Nothing left to spend; the attempt is blocked.
    NoHeartsLeft { next_heart_in: Option<u64> },
    /// Premium account, nothing was spent.
    Unlimited,
}

impl SpendOutcome {
    /// Whether the attempt may proceed.
    #[inline]
    pub fn allowed(&self) -> bool {
        !matches!(self, Self::NoHeartsLeft { .. })
    }

    /// Hearts left after the attempt; `None` for premium accounts.
    pub fn hearts(&self) -> Option<u32> {
        match self {
            Self::Spent { remaining, .. } => Some(*remaining),
            Self::NoHeartsLeft { .. } => Some(0),
            Self::Unlimited => None,
        }
    }

    /// Seconds until the next heart regenerates.
    pub fn next_heart_in(&self) -> Option<u64> {
        match self {
            Self::Spent { next_heart_in, .. } | Self::NoHeartsLeft { next_heart_in } => {
                *next_heart_in
            }
            Self::Unlimited => None,
        }
    }
}

/// Outcome of one settle pass.
enum Settled<R> {
    Premium,
    Limited { state: LifeState, value: R },
}

/// Hearts service wrapping a [`UserStore`].
///
/// # Type parameter
///
/// - `S` — the underlying data store (e.g. `MemoryStore`, `SqlStore`)
pub struct HeartService<S: UserStore> {
    store: S,
    policy: HeartPolicy,
}

impl<S: UserStore> HeartService<S> {
    /// Create a new service over `store` with the given policy.
    pub fn new(store: S, policy: HeartPolicy) -> Self {
        Self { store, policy }
    }

    /// Get a reference to the underlying store.
    #[inline]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Active regeneration policy.
    #[inline]
    pub fn policy(&self) -> &HeartPolicy {
        &self.policy
    }

    /// Fetch a user, creating it with a full counter when missing.
    ///
    /// Tolerates a concurrent creation of the same id.
    pub async fn ensure_user(&self, user_id: &str, now: i64) -> Result<UserRecord, StoreError> {
        if let Some(record) = self.store.find_user(user_id).await? {
            return Ok(record);
        }

        match self
            .store
            .create_user(user_id, self.policy.full(now), now)
            .await
        {
            Ok(record) => {
                info!(user_id, "user provisioned");
                Ok(record)
            }
            Err(StoreError::AlreadyExists) => self
                .store
                .find_user(user_id)
                .await?
                .ok_or(StoreError::NotFound),
            Err(e) => Err(e),
        }
    }

    /// Current hearts of a user, persisting any regeneration that accrued.
    pub async fn hearts(&self, user_id: &str, now: i64) -> Result<HeartStatus, StoreError> {
        match self.settle(user_id, now, true, |state| (state, ())).await? {
            Settled::Premium => Ok(HeartStatus::unlimited(&self.policy)),
            Settled::Limited { state, .. } => Ok(HeartStatus::limited(&self.policy, state, now)),
        }
    }

    /// Spend one heart for an incorrect answer.
    ///
    /// Running out of hearts is reported as [`SpendOutcome::NoHeartsLeft`],
    /// not as an error.
    pub async fn spend_heart(&self, user_id: &str, now: i64) -> Result<SpendOutcome, StoreError> {
        let policy = self.policy;
        let settled = self
            .settle(user_id, now, true, |state| state.spend(&policy, now))
            .await?;

        let outcome = match settled {
            Settled::Premium => SpendOutcome::Unlimited,
            Settled::Limited {
                state,
                value: true,
            } => {
                diagnohero_metrics::record_heart_spent();
                SpendOutcome::Spent {
                    remaining: state.hearts,
                    next_heart_in: time_until_next_heart(&policy, state, now),
                }
            }
            Settled::Limited {
                state,
                value: false,
            } => {
                debug!(user_id, "no hearts left");
                diagnohero_metrics::record_hearts_exhausted();
                SpendOutcome::NoHeartsLeft {
                    next_heart_in: time_until_next_heart(&policy, state, now),
                }
            }
        };
        Ok(outcome)
    }

    /// Reset a user to a full counter anchored at `now`.
    ///
    /// Applies to premium accounts too, so their counter is sane if the
    /// flag is later removed.
    pub async fn refill(&self, user_id: &str, now: i64) -> Result<LifeState, StoreError> {
        let full = self.policy.full(now);
        match self.settle(user_id, now, false, |_| (full, ())).await? {
            Settled::Limited { state, .. } => Ok(state),
            Settled::Premium => Ok(full),
        }
    }

    /// Switch a user to premium, provisioning it first when needed.
    pub async fn upgrade_to_premium(
        &self,
        user_id: &str,
        now: i64,
    ) -> Result<HeartStatus, StoreError> {
        self.ensure_user(user_id, now).await?;
        if !self.store.set_premium(user_id, true).await? {
            return Err(StoreError::NotFound);
        }
        diagnohero_metrics::record_premium_upgrade();
        info!(user_id, "premium enabled");
        Ok(HeartStatus::unlimited(&self.policy))
    }

    /// Run one read-regenerate-apply-write cycle with retry.
    ///
    /// `apply` receives the regenerated state and returns the state to store
    /// together with a value handed back to the caller. The write is skipped
    /// when the stored row already holds the result.
    async fn settle<R, F>(
        &self,
        user_id: &str,
        now: i64,
        skip_premium: bool,
        apply: F,
    ) -> Result<Settled<R>, StoreError>
    where
        F: Fn(LifeState) -> (LifeState, R) + Send + Sync,
        R: Send,
    {
        for attempt in 1..=MAX_ATTEMPTS {
            let record = self
                .store
                .find_user(user_id)
                .await?
                .ok_or(StoreError::NotFound)?;

            if skip_premium && record.premium {
                return Ok(Settled::Premium);
            }

            let expected = record.stored_hearts();
            let stored = record.life_state(&self.policy);
            let regen = regenerate(&self.policy, stored, now);
            let (state, value) = apply(regen.state);

            if !expected.differs_from(state) {
                return Ok(Settled::Limited { state, value });
            }

            if self
                .store
                .compare_and_set_hearts(user_id, expected, state)
                .await?
            {
                let gained = regen.state.hearts.saturating_sub(stored.hearts);
                if gained > 0 {
                    diagnohero_metrics::record_hearts_regenerated(u64::from(gained));
                }
                return Ok(Settled::Limited { state, value });
            }

            diagnohero_metrics::record_store_conflict();
            warn!(user_id, attempt, "conditional heart update lost, re-reading");
        }

        Err(StoreError::Conflict)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::memory::MemoryStore;
    use crate::record::StoredHearts;

    const T: i64 = 1_700_000_000;

    fn service() -> HeartService<Arc<MemoryStore>> {
        HeartService::new(Arc::new(MemoryStore::new()), HeartPolicy::default())
    }

    fn seed(store: &MemoryStore, hearts: i64, anchor: i64, premium: bool) {
        store.put_user(UserRecord {
            user_id: "u1".into(),
            hearts,
            last_refill_at: anchor,
            premium,
            created_at: T,
        });
    }

    async fn stored(svc: &HeartService<Arc<MemoryStore>>) -> StoredHearts {
        svc.store()
            .find_user("u1")
            .await
            .unwrap()
            .unwrap()
            .stored_hearts()
    }

    #[tokio::test]
    async fn test_ensure_user_creates_full() {
        let svc = service();
        let record = svc.ensure_user("u1", T).await.unwrap();
        assert_eq!(record.hearts, 5);
        assert_eq!(record.last_refill_at, T);

        // Second call returns the existing row unchanged.
        let again = svc.ensure_user("u1", T + 100).await.unwrap();
        assert_eq!(again, record);
    }

    #[tokio::test]
    async fn test_unknown_user_is_not_found() {
        let svc = service();
        assert!(matches!(
            svc.hearts("ghost", T).await,
            Err(StoreError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_read_persists_regeneration() {
        let svc = service();
        seed(svc.store(), 3, T, false);

        let status = svc.hearts("u1", T + 3600 + 600).await.unwrap();
        assert_eq!(status.hearts, EffectiveHearts::Limited(4));
        assert_eq!(status.next_heart_in, Some(3000));
        assert!(!status.premium);
        assert_eq!(
            stored(&svc).await,
            StoredHearts {
                hearts: 4,
                last_refill_at: T + 3600
            }
        );
    }

    #[tokio::test]
    async fn test_read_without_gain_does_not_write() {
        let svc = service();
        seed(svc.store(), 3, T, false);
        let status = svc.hearts("u1", T + 1800).await.unwrap();
        assert_eq!(status.hearts, EffectiveHearts::Limited(3));
        assert_eq!(stored(&svc).await.last_refill_at, T);
    }

    #[tokio::test]
    async fn test_spend_from_full_restarts_window() {
        let svc = service();
        seed(svc.store(), 5, T, false);

        let later = T + 10 * 3600;
        let outcome = svc.spend_heart("u1", later).await.unwrap();
        assert_eq!(
            outcome,
            SpendOutcome::Spent {
                remaining: 4,
                next_heart_in: Some(3600)
            }
        );
        assert_eq!(
            stored(&svc).await,
            StoredHearts {
                hearts: 4,
                last_refill_at: later
            }
        );
    }

    #[tokio::test]
    async fn test_spend_keeps_partial_anchor() {
        let svc = service();
        seed(svc.store(), 3, T, false);

        let outcome = svc.spend_heart("u1", T + 1800).await.unwrap();
        assert_eq!(outcome.hearts(), Some(2));
        assert_eq!(outcome.next_heart_in(), Some(1800));
        assert_eq!(stored(&svc).await.last_refill_at, T);
    }

    #[tokio::test]
    async fn test_spend_until_exhausted() {
        let svc = service();
        svc.ensure_user("u1", T).await.unwrap();

        for expected in (0..5).rev() {
            let outcome = svc.spend_heart("u1", T + 1).await.unwrap();
            assert_eq!(outcome.hearts(), Some(expected));
            assert!(outcome.allowed());
        }

        let blocked = svc.spend_heart("u1", T + 2).await.unwrap();
        assert!(!blocked.allowed());
        assert_eq!(blocked.hearts(), Some(0));
        assert_eq!(stored(&svc).await.hearts, 0);
    }

    #[tokio::test]
    async fn test_depleted_user_recovers_after_period() {
        let svc = service();
        seed(svc.store(), 0, T, false);

        assert!(!svc.spend_heart("u1", T + 10).await.unwrap().allowed());
        let outcome = svc.spend_heart("u1", T + 3600).await.unwrap();
        assert_eq!(outcome.hearts(), Some(0));
        assert!(outcome.allowed());
    }

    #[tokio::test]
    async fn test_premium_is_unlimited() {
        let svc = service();
        seed(svc.store(), 0, T, true);

        let status = svc.hearts("u1", T).await.unwrap();
        assert_eq!(status.hearts, EffectiveHearts::Unlimited);
        assert!(status.premium);

        let outcome = svc.spend_heart("u1", T).await.unwrap();
        assert_eq!(outcome, SpendOutcome::Unlimited);
        assert!(outcome.allowed());
        // Stored counter untouched.
        assert_eq!(stored(&svc).await.hearts, 0);
    }

    #[tokio::test]
    async fn test_upgrade_to_premium() {
        let svc = service();
        let status = svc.upgrade_to_premium("u1", T).await.unwrap();
        assert!(status.premium);
        assert!(svc.store().find_user("u1").await.unwrap().unwrap().premium);
    }

    #[tokio::test]
    async fn test_refill() {
        let svc = service();
        seed(svc.store(), 1, T, false);
        let state = svc.refill("u1", T + 50).await.unwrap();
        assert_eq!(state, LifeState::new(5, T + 50));
        assert_eq!(stored(&svc).await.hearts, 5);
    }

    #[tokio::test]
    async fn test_out_of_range_row_is_repaired() {
        let svc = service();
        seed(svc.store(), -2, T, false);
        let status = svc.hearts("u1", T + 1).await.unwrap();
        assert_eq!(status.hearts, EffectiveHearts::Limited(0));
        assert_eq!(stored(&svc).await.hearts, 0);
    }

    #[test]
    fn test_status_json() {
        let policy = HeartPolicy::default();
        let limited = serde_json::to_value(HeartStatus::limited(&policy, LifeState::new(3, T), T))
            .unwrap();
        assert_eq!(limited["hearts"], 3);
        assert_eq!(limited["next_heart_in"], 3600);

        let unlimited = serde_json::to_value(HeartStatus::unlimited(&policy)).unwrap();
        assert!(unlimited["hearts"].is_null());
        assert_eq!(unlimited["premium"], true);
    }

    /// Store whose conditional update fails a fixed number of times.
    struct Contended {
        inner: MemoryStore,
        failures: AtomicUsize,
    }

    #[async_trait]
    impl UserStore for Contended {
        async fn find_user(&self, user_id: &str) -> Result<Option<UserRecord>, StoreError> {
            self.inner.find_user(user_id).await
        }

        async fn create_user(
            &self,
            user_id: &str,
            state: LifeState,
            now: i64,
        ) -> Result<UserRecord, StoreError> {
            self.inner.create_user(user_id, state, now).await
        }

        async fn compare_and_set_hearts(
            &self,
            user_id: &str,
            expected: StoredHearts,
            new: LifeState,
        ) -> Result<bool, StoreError> {
            let left = self.failures.load(Ordering::SeqCst);
            if left > 0 {
                self.failures.store(left - 1, Ordering::SeqCst);
                return Ok(false);
            }
            self.inner.compare_and_set_hearts(user_id, expected, new).await
        }

        async fn set_premium(&self, user_id: &str, premium: bool) -> Result<bool, StoreError> {
            self.inner.set_premium(user_id, premium).await
        }

        async fn list_users(&self) -> Result<Vec<UserRecord>, StoreError> {
            self.inner.list_users().await
        }
    }

    fn contended(failures: usize) -> HeartService<Contended> {
        let inner = MemoryStore::new();
        seed(&inner, 3, T, false);
        HeartService::new(
            Contended {
                inner,
                failures: AtomicUsize::new(failures),
            },
            HeartPolicy::default(),
        )
    }

    #[tokio::test]
    async fn test_conflict_retried_once() {
        let svc = contended(1);
        let outcome = svc.spend_heart("u1", T + 10).await.unwrap();
        assert_eq!(outcome.hearts(), Some(2));
    }

    #[tokio::test]
    async fn test_conflict_twice_fails() {
        let svc = contended(2);
        assert!(matches!(
            svc.spend_heart("u1", T + 10).await,
            Err(StoreError::Conflict)
        ));
        // Nothing was written.
        let record = svc.store().find_user("u1").await.unwrap().unwrap();
        assert_eq!(record.hearts, 3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_spends_lose_no_update() {
        let svc = Arc::new(service());
        svc.ensure_user("u1", T).await.unwrap();

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let svc = svc.clone();
                tokio::spawn(async move { svc.spend_heart("u1", T + 1).await })
            })
            .collect();

        let mut spent = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(SpendOutcome::Spent { .. }) => spent += 1,
                Ok(_) | Err(StoreError::Conflict) => {}
                Err(e) => panic!("unexpected error: {e}"),
            }
        }

        assert!(spent >= 1);
        assert!(spent <= 5);
        assert_eq!(stored(&svc).await.hearts, 5 - spent);
    }

    /// Recorder counting increments per metric name.
    #[derive(Default)]
    struct CountingRecorder {
        counters: parking_lot::Mutex<std::collections::HashMap<String, Arc<AtomicU64>>>,
    }

    struct CounterCell(Arc<AtomicU64>);

    impl metrics::CounterFn for CounterCell {
        fn increment(&self, value: u64) {
            self.0.fetch_add(value, Ordering::SeqCst);
        }

        fn absolute(&self, value: u64) {
            self.0.store(value, Ordering::SeqCst);
        }
    }

    impl CountingRecorder {
        fn count(&self, name: &str) -> u64 {
            self.counters
                .lock()
                .get(name)
                .map_or(0, |c| c.load(Ordering::SeqCst))
        }
    }

    impl metrics::Recorder for CountingRecorder {
        fn describe_counter(
            &self,
            _: metrics::KeyName,
            _: Option<metrics::Unit>,
            _: metrics::SharedString,
        ) {
        }

        fn describe_gauge(
            &self,
            _: metrics::KeyName,
            _: Option<metrics::Unit>,
            _: metrics::SharedString,
        ) {
        }

        fn describe_histogram(
            &self,
            _: metrics::KeyName,
            _: Option<metrics::Unit>,
            _: metrics::SharedString,
        ) {
        }

        fn register_counter(
            &self,
            key: &metrics::Key,
            _: &metrics::Metadata<'_>,
        ) -> metrics::Counter {
            let cell = self
                .counters
                .lock()
                .entry(key.name().to_string())
                .or_default()
                .clone();
            metrics::Counter::from_arc(Arc::new(CounterCell(cell)))
        }

        fn register_gauge(&self, _: &metrics::Key, _: &metrics::Metadata<'_>) -> metrics::Gauge {
            metrics::Gauge::noop()
        }

        fn register_histogram(
            &self,
            _: &metrics::Key,
            _: &metrics::Metadata<'_>,
        ) -> metrics::Histogram {
            metrics::Histogram::noop()
        }
    }

    #[test]
    fn test_exhausted_counts_refused_spends_only() {
        let recorder = CountingRecorder::default();
        let svc = service();
        seed(svc.store(), 1, T, false);
        let rt = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();

        metrics::with_local_recorder(&recorder, || {
            rt.block_on(async {
                assert!(svc.spend_heart("u1", T + 1).await.unwrap().allowed());
                assert!(!svc.spend_heart("u1", T + 2).await.unwrap().allowed());
                assert!(!svc.spend_heart("u1", T + 3).await.unwrap().allowed());
            });
        });

        assert_eq!(recorder.count(diagnohero_metrics::HEARTS_SPENT_TOTAL), 1);
        assert_eq!(recorder.count(diagnohero_metrics::HEARTS_EXHAUSTED_TOTAL), 2);
    }
}
