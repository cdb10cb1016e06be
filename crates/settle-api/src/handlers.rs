//! Route handler functions for all API endpoints.
//!
//! Each handler extracts query/path parameters via axum extractors,
//! calls the resolver or the escalation desk, and returns JSON.

use std::convert::Infallible;
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::Json;
use serde::{Deserialize, Serialize};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

use settle_assistant::{AssistantReply, ConversationTurn, EscalationRequest, EscalationStatus};
use settle_core::types::PageContext;

use crate::error::ApiError;
use crate::state::AppState;

// =============================================================================
// Request types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub user_id: String,
    pub message: String,
    /// Page name such as `properties.html` or `listings`.
    pub page: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WelcomeParams {
    pub page: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EscalationParams {
    /// `pending` (default), `accepted`, `declined` or `all`.
    pub status: Option<String>,
}

// =============================================================================
// Response types
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub assistant_enabled: bool,
    pub remote_completion: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub user_id: String,
    pub turns: Vec<ConversationTurn>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WelcomeResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EscalationList {
    pub requests: Vec<EscalationRequest>,
    pub total: usize,
}

fn page_context(page: Option<&str>) -> PageContext {
    page.map(PageContext::from_page_name).unwrap_or_default()
}

// =============================================================================
// Handler functions
// =============================================================================

/// GET /health - liveness and uptime.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        assistant_enabled: state.config.assistant.enabled,
        remote_completion: state.config.completion.is_configured(),
    })
}

/// POST /chat - answer one user message.
pub async fn chat(
    State(state): State<AppState>,
    Json(body): Json<ChatRequest>,
) -> Result<Json<AssistantReply>, ApiError> {
    if body.user_id.trim().is_empty() {
        return Err(ApiError::BadRequest("'user_id' must not be empty".to_string()));
    }

    let page = page_context(body.page.as_deref());
    let reply = state
        .resolver
        .respond(body.user_id.trim(), &page, &body.message)
        .await?;
    Ok(Json(reply))
}

/// GET /chat/{user_id}/history - stored turns, oldest first.
pub async fn chat_history(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let turns = state.resolver.history(&user_id)?;
    Ok(Json(HistoryResponse { user_id, turns }))
}

/// GET /chat/{user_id}/welcome?page= - greeting for the chat window.
pub async fn chat_welcome(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(params): Query<WelcomeParams>,
) -> Result<Json<WelcomeResponse>, ApiError> {
    let page = page_context(params.page.as_deref());
    let message = state.resolver.welcome(&user_id, &page)?;
    Ok(Json(WelcomeResponse { message }))
}

/// GET /escalations?status= - mailbox listing, pending by default.
pub async fn list_escalations(
    State(state): State<AppState>,
    Query(params): Query<EscalationParams>,
) -> Result<Json<EscalationList>, ApiError> {
    let status = match params.status.as_deref() {
        None => Some(EscalationStatus::Pending),
        Some("all") => None,
        Some(s) => Some(s.parse::<EscalationStatus>().map_err(ApiError::BadRequest)?),
    };

    let requests = state.desk.list(status)?;
    let total = requests.len();
    Ok(Json(EscalationList { requests, total }))
}

/// POST /escalations/{id}/accept - operator takes the conversation.
pub async fn accept_escalation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<EscalationRequest>, ApiError> {
    Ok(Json(state.desk.accept(&id)?))
}

/// POST /escalations/{id}/decline - operator declines the request.
pub async fn decline_escalation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<EscalationRequest>, ApiError> {
    Ok(Json(state.desk.decline(&id)?))
}

/// GET /escalations/stream - SSE of newly pending requests.
pub async fn escalation_stream(
    State(state): State<AppState>,
) -> Sse<impl tokio_stream::Stream<Item = Result<Event, Infallible>> + Send> {
    let rx = state.escalation_tx.subscribe();
    let stream = BroadcastStream::new(rx).filter_map(|result| match result {
        Ok(request) => {
            let data = serde_json::to_string(&request).unwrap_or_default();
            Some(Ok(Event::default()
                .event("escalation")
                .id(request.id)
                .data(data)))
        }
        // Lagged receivers skip what they missed; the mailbox still has it.
        Err(_) => None,
    });

    Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(15)))
}
