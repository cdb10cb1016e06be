//! Background task that watches the mailbox for new pending requests.
//!
//! Each pending request is published once on a broadcast channel. The loop
//! runs until its [`PollerHandle`] is signalled.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, Notify};
use tracing::{debug, info, warn};

use crate::error::EscalationError;
use crate::escalation::EscalationDesk;
use crate::types::EscalationRequest;

const CHANNEL_CAPACITY: usize = 64;

/// Stops a running [`OperatorPoller`].
#[derive(Debug, Clone)]
pub struct PollerHandle {
    shutdown: Arc<Notify>,
}

impl PollerHandle {
    /// Signal the poller to stop. Safe to call before `run` starts.
    pub fn shutdown(&self) {
        self.shutdown.notify_one();
    }
}

pub struct OperatorPoller {
    desk: Arc<EscalationDesk>,
    interval: Duration,
    shutdown: Arc<Notify>,
    events: broadcast::Sender<EscalationRequest>,
}

impl OperatorPoller {
    pub fn new(desk: Arc<EscalationDesk>, interval: Duration) -> Self {
        let (events, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            desk,
            interval: interval.max(Duration::from_millis(10)),
            shutdown: Arc::new(Notify::new()),
            events,
        }
    }

    pub fn handle(&self) -> PollerHandle {
        PollerHandle {
            shutdown: Arc::clone(&self.shutdown),
        }
    }

    /// Receive newly pending requests.
    pub fn subscribe(&self) -> broadcast::Receiver<EscalationRequest> {
        self.events.subscribe()
    }

    /// Sender side, for handing to other components that want to subscribe later.
    pub fn sender(&self) -> broadcast::Sender<EscalationRequest> {
        self.events.clone()
    }

    pub fn shutdown(&self) {
        self.shutdown.notify_one();
    }

    /// Publish pending requests not in `seen`. Returns how many were published.
    ///
    /// `seen` is pruned to ids that are still pending so it cannot grow
    /// without bound.
    pub fn poll_once(&self, seen: &mut HashSet<String>) -> Result<usize, EscalationError> {
        let pending = self.desk.pending()?;
        let still_pending: HashSet<&str> = pending.iter().map(|r| r.id.as_str()).collect();
        seen.retain(|id| still_pending.contains(id.as_str()));

        let mut published = 0;
        for request in pending {
            if seen.insert(request.id.clone()) {
                debug!(id = %request.id, user_id = %request.user_id, "New escalation request");
                // No receivers is fine; the request stays in the mailbox.
                let _ = self.events.send(request);
                published += 1;
            }
        }
        Ok(published)
    }

    /// Poll until shut down.
    pub async fn run(&self) {
        info!(interval_ms = self.interval.as_millis() as u64, "Operator poller started");
        let mut seen = HashSet::new();
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.poll_once(&mut seen) {
                        warn!(error = %e, "Failed to poll escalation mailbox");
                    }
                }
                _ = self.shutdown.notified() => {
                    info!("Operator poller stopped");
                    return;
                }
            }
        }
    }
}
