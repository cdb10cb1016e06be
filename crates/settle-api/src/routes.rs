//! Router setup with all API routes and middleware.

use std::future::Future;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use settle_core::error::SettleError;

use crate::handlers;
use crate::state::AppState;

/// Create the axum Router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // Localhost origins on the configured port and port+1 for a dev server.
    let port = state.config.general.port;
    let origins: Vec<HeaderValue> = [port, port.saturating_add(1)]
        .iter()
        .flat_map(|p| {
            [
                format!("http://127.0.0.1:{}", p),
                format!("http://localhost:{}", p),
            ]
        })
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect();
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    let chat_routes = Router::new()
        .route("/chat", post(handlers::chat))
        .route("/chat/{user_id}/history", get(handlers::chat_history))
        .route("/chat/{user_id}/welcome", get(handlers::chat_welcome))
        .layer(DefaultBodyLimit::max(64 * 1024));

    let operator_routes = Router::new()
        .route("/escalations", get(handlers::list_escalations))
        .route("/escalations/stream", get(handlers::escalation_stream))
        .route(
            "/escalations/{id}/accept",
            post(handlers::accept_escalation),
        )
        .route(
            "/escalations/{id}/decline",
            post(handlers::decline_escalation),
        );

    Router::new()
        .route("/health", get(handlers::health))
        .merge(chat_routes)
        .merge(operator_routes)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Serve on 127.0.0.1 at the configured port until `shutdown` resolves.
pub async fn start_server<F>(state: AppState, shutdown: F) -> Result<(), SettleError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = format!("127.0.0.1:{}", state.config.general.port);
    let router = create_router(state);

    tracing::info!("Starting API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| SettleError::Api(format!("Failed to bind: {}", e)))?;

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| SettleError::Api(format!("Server error: {}", e)))?;

    Ok(())
}
