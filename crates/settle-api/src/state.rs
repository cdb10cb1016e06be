//! Application state shared across all route handlers.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::broadcast;

use settle_assistant::{EscalationDesk, EscalationRequest, ResponseResolver};
use settle_core::config::SettleConfig;

/// Shared application state.
///
/// All fields use `Arc` or cheap-clone handles so the state clones per request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<SettleConfig>,
    pub resolver: Arc<ResponseResolver>,
    pub desk: Arc<EscalationDesk>,
    /// Newly pending escalation requests, fed by the operator poller.
    pub escalation_tx: broadcast::Sender<EscalationRequest>,
    /// Server start time for uptime calculation.
    pub start_time: Instant,
}

impl AppState {
    pub fn new(
        config: SettleConfig,
        resolver: Arc<ResponseResolver>,
        desk: Arc<EscalationDesk>,
        escalation_tx: broadcast::Sender<EscalationRequest>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            resolver,
            desk,
            escalation_tx,
            start_time: Instant::now(),
        }
    }
}
