//! Router assembly and the serve loop with bounded graceful shutdown.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use axum::{Router, middleware};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::config::AppConfig;
use crate::db::{self, PgUserRepository};
use crate::middleware::{RequestId, request_id_middleware};
use crate::routes;
use crate::state::AppState;

/// Errors that stop the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to create database pool: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Failed to bind to {0}: {1}")]
    Bind(String, std::io::Error),
    #[error("Server error: {0}")]
    Serve(std::io::Error),
    #[error("Server task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let static_dir = ServeDir::new(&state.config().templates.path);

    Router::new()
        .merge(routes::routes())
        .nest_service("/static", static_dir)
        .fallback(routes::not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    let request_id = request
                        .extensions()
                        .get::<RequestId>()
                        .map(|id| id.as_str().to_owned())
                        .unwrap_or_default();
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = %request_id,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>, latency: Duration, span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

/// Run the server until a shutdown signal, then close the pool.
///
/// # Errors
///
/// Returns `ServerError` if the pool cannot connect, the address cannot be
/// bound, or the server fails while running.
pub async fn run(config: AppConfig) -> Result<(), ServerError> {
    let pool = db::create_pool(&config.database).await?;
    tracing::info!("Database pool created");

    // NOTE: Migrations are NOT run on startup.
    // Run them explicitly via: cargo run -p userdesk-cli -- migrate

    let users = PgUserRepository::new(pool.clone(), config.database.query_timeout);
    let addr = config.server.bind_address();
    let grace = config.server.shutdown_grace;
    let app = router(AppState::new(config, Arc::new(users)));

    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| ServerError::Bind(addr.clone(), e))?;
    tracing::info!("userdesk listening on http://{}", addr);

    let result = serve_until(listener, app, shutdown_signal(), grace).await;

    pool.close().await;
    tracing::info!("Database pool closed");

    result
}

/// Serve `app` until `signal` resolves.
///
/// After the signal the listener stops accepting and in-flight requests get
/// `grace` to finish. Requests still running after that are abandoned.
///
/// # Errors
///
/// Returns `ServerError` if the server fails before or during shutdown.
pub async fn serve_until<F>(
    listener: TcpListener,
    app: Router,
    signal: F,
    grace: Duration,
) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send,
{
    let (stop_tx, stop_rx) = oneshot::channel::<()>();

    let mut server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = stop_rx.await;
            })
            .await
    });

    tokio::select! {
        result = &mut server => return result?.map_err(ServerError::Serve),
        () = signal => {}
    }

    let _ = stop_tx.send(());

    match tokio::time::timeout(grace, &mut server).await {
        Ok(result) => {
            tracing::info!("Server stopped");
            result?.map_err(ServerError::Serve)
        }
        Err(_) => {
            tracing::warn!(?grace, "Shutdown grace period elapsed, abandoning in-flight requests");
            server.abort();
            Ok(())
        }
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
