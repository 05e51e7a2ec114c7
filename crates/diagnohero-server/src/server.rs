//! Router construction and the serve loop.

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::extract::{MatchedPath, Request};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{delete, get, post};
use diagnohero_config::{Config, StoreBackend, StoreConfig};
use diagnohero_metrics::record_request;
use diagnohero_store::sql::{SqlStore, SqlStoreConfig};
use diagnohero_store::{MemoryStore, Store};
use tokio::net::TcpListener;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::error::ServerError;
use crate::handler::{self, hearts, lections, premium, sessions, statistics};
use crate::state::AppState;

/// Default graceful shutdown timeout.
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration =
    Duration::from_secs(diagnohero_core::DEFAULT_SHUTDOWN_TIMEOUT_SECS);

/// Build the HTTP router over the given state.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handler::health))
        .route("/api/hearts", get(hearts::get_hearts))
        .route("/api/lections/{id}/answers", post(lections::submit_answer))
        .route(
            "/api/lections/{id}/progress",
            get(lections::get_progress).post(lections::update_progress),
        )
        .route("/api/statistics", get(statistics::get_statistics))
        .route(
            "/api/study-sessions",
            get(sessions::list).post(sessions::create),
        )
        .route("/api/study-sessions/{id}", delete(sessions::delete))
        .route(
            "/api/study-sessions/{id}/complete",
            post(sessions::complete),
        )
        .route("/api/premium/upgrade", post(premium::upgrade))
        .layer(middleware::from_fn(track_request))
        .with_state(state)
}

/// Count requests and their latency per matched route.
async fn track_request(req: Request, next: Next) -> Response {
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_owned());

    let start = Instant::now();
    let response = next.run(req).await;
    record_request(
        route,
        response.status().as_u16(),
        start.elapsed().as_secs_f64(),
    );
    response
}

/// Open the store selected by configuration.
pub async fn open_store(config: &StoreConfig) -> Result<Arc<dyn Store>, ServerError> {
    match config.backend {
        StoreBackend::Memory => {
            warn!("using in-memory store, state is lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::Sql => {
            let url = config.database_url.as_deref().ok_or_else(|| {
                ServerError::Config("store.database_url is required for the sql backend".into())
            })?;
            let sql_config = SqlStoreConfig::new(url)
                .max_connections(config.max_connections)
                .min_connections(config.min_connections)
                .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
                .init_schema(config.init_schema);

            let store = SqlStore::connect(sql_config).await?;
            info!(database = ?store.database_type(), "sql store connected");
            Ok(Arc::new(store))
        }
    }
}

/// Serve requests on `listener` until `shutdown` is cancelled.
///
/// After cancellation, in-flight requests get `drain_timeout` to finish.
pub async fn serve(
    listener: TcpListener,
    state: AppState,
    shutdown: CancellationToken,
    drain_timeout: Duration,
) -> Result<(), ServerError> {
    let addr = listener.local_addr()?;
    info!(%addr, "server listening");

    let server = axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown.clone().cancelled_owned())
        .into_future();

    let drain_deadline = async {
        shutdown.cancelled().await;
        tokio::time::sleep(drain_timeout).await;
    };

    tokio::select! {
        res = server => res?,
        _ = drain_deadline => {
            warn!(
                timeout_secs = drain_timeout.as_secs(),
                "shutdown timeout reached, dropping remaining requests"
            );
        }
    }

    info!("server stopped");
    Ok(())
}

/// Run the server with a cancellation token for graceful shutdown.
pub async fn run_with_shutdown(
    config: Config,
    store: Arc<dyn Store>,
    shutdown: CancellationToken,
) -> Result<(), ServerError> {
    let listener = TcpListener::bind(&config.server.listen).await?;
    let state = AppState::from_config(&config, store);
    info!(
        max_hearts = state.policy().max_hearts,
        seconds_per_heart = state.policy().seconds_per_heart,
        sessions = config.auth.sessions.len(),
        "hearts service configured"
    );

    let drain_timeout = Duration::from_secs(config.server.shutdown_timeout_secs);
    serve(listener, state, shutdown, drain_timeout).await
}

/// Run the server until the process is stopped.
pub async fn run(config: Config, store: Arc<dyn Store>) -> Result<(), ServerError> {
    run_with_shutdown(config, store, CancellationToken::new()).await
}
