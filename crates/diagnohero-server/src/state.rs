//! Shared application state.

use std::sync::Arc;

use diagnohero_config::Config;
use diagnohero_core::{DEFAULT_STATS_WINDOW_DAYS, now_unix};
use diagnohero_hearts::HeartPolicy;
use diagnohero_store::{HeartService, Store};

use crate::session::{SessionResolver, StaticSessions};

/// Source of the current unix time in seconds.
pub type Clock = Arc<dyn Fn() -> i64 + Send + Sync>;

const SECS_PER_DAY: u64 = 86_400;

/// State shared by all request handlers.
#[derive(Clone)]
pub struct AppState {
    pub hearts: Arc<HeartService<Arc<dyn Store>>>,
    pub store: Arc<dyn Store>,
    pub sessions: Arc<dyn SessionResolver>,
    pub stats_window_secs: u64,
    clock: Clock,
}

impl AppState {
    pub fn new(
        store: Arc<dyn Store>,
        policy: HeartPolicy,
        sessions: Arc<dyn SessionResolver>,
    ) -> Self {
        Self {
            hearts: Arc::new(HeartService::new(store.clone(), policy)),
            store,
            sessions,
            stats_window_secs: DEFAULT_STATS_WINDOW_DAYS * SECS_PER_DAY,
            clock: Arc::new(now_unix),
        }
    }

    /// Build state from a validated configuration.
    pub fn from_config(config: &Config, store: Arc<dyn Store>) -> Self {
        let policy = HeartPolicy::new(config.hearts.max_hearts, config.hearts.seconds_per_heart);
        let sessions = Arc::new(StaticSessions::from_entries(&config.auth.sessions));
        Self::new(store, policy, sessions).with_stats_window_days(config.server.stats_window_days)
    }

    /// Replace the wall clock, e.g. with a fixed time in tests.
    pub fn with_clock(mut self, clock: impl Fn() -> i64 + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn with_stats_window_days(mut self, days: u64) -> Self {
        self.stats_window_secs = days.saturating_mul(SECS_PER_DAY);
        self
    }

    #[inline]
    pub fn now(&self) -> i64 {
        (self.clock)()
    }

    #[inline]
    pub fn policy(&self) -> &HeartPolicy {
        self.hearts.policy()
    }
}
