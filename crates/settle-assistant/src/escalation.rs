//! The shared operator mailbox.
//!
//! Users file requests through the resolver; the operator side lists pending
//! requests and accepts or declines them. Lifecycle:
//! Pending -> Accepted
//! Pending -> Declined

use std::sync::{Arc, Mutex};

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use settle_core::error::SettleError;
use settle_core::types::User;
use settle_storage::{keys, Collection, Flag, KeyValueStore};

use crate::error::EscalationError;
use crate::types::{EscalationRequest, EscalationStatus};

const REQUEST_MESSAGE: &str = "User requested admin assistance via chatbot";

/// Validate that a status transition is allowed.
pub fn validate_transition(
    from: EscalationStatus,
    to: EscalationStatus,
) -> Result<(), EscalationError> {
    let valid = matches!(
        (from, to),
        (EscalationStatus::Pending, EscalationStatus::Accepted)
            | (EscalationStatus::Pending, EscalationStatus::Declined)
    );

    if valid {
        Ok(())
    } else {
        Err(EscalationError::InvalidTransition(from, to))
    }
}

/// Reads and writes the `admin_notifications` mailbox and the per-user
/// escalation flags.
pub struct EscalationDesk {
    store: Arc<dyn KeyValueStore>,
    mailbox: Collection<EscalationRequest>,
    // Serializes read-modify-write cycles on the mailbox.
    write_lock: Mutex<()>,
}

impl EscalationDesk {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            mailbox: Collection::new(Arc::clone(&store), keys::MAILBOX),
            store,
            write_lock: Mutex::new(()),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, ()>, EscalationError> {
        self.write_lock.lock().map_err(|e| {
            EscalationError::Storage(SettleError::Storage(format!("Lock poisoned: {}", e)))
        })
    }

    /// Append a pending request for `user` and mark the user as having filed.
    ///
    /// Earlier filings are not de-duplicated; a repeat is only logged.
    pub fn file(&self, user: &User) -> Result<EscalationRequest, EscalationError> {
        let repeat = self.has_filed(&user.id)?;
        let request = EscalationRequest {
            id: format!("notif-{}", Uuid::new_v4()),
            user_id: user.id.clone(),
            user_name: user.name.clone(),
            user_email: user.email.clone(),
            message: REQUEST_MESSAGE.to_string(),
            created_at: Utc::now(),
            status: EscalationStatus::Pending,
            decided_at: None,
        };

        {
            let _guard = self.lock()?;
            self.mailbox.push(request.clone())?;
        }
        Flag::new(Arc::clone(&self.store), keys::escalation_filed(&user.id)).set(true)?;

        if repeat {
            warn!(id = %request.id, user_id = %user.id, "Repeat escalation request filed");
        } else {
            info!(id = %request.id, user_id = %user.id, "Escalation request filed");
        }
        Ok(request)
    }

    /// Requests in filing order, optionally filtered by status.
    pub fn list(
        &self,
        status: Option<EscalationStatus>,
    ) -> Result<Vec<EscalationRequest>, EscalationError> {
        Ok(self
            .mailbox
            .load()?
            .into_iter()
            .filter(|r| status.map_or(true, |s| r.status == s))
            .collect())
    }

    /// Pending requests, oldest first.
    pub fn pending(&self) -> Result<Vec<EscalationRequest>, EscalationError> {
        self.list(Some(EscalationStatus::Pending))
    }

    pub fn get(&self, id: &str) -> Result<EscalationRequest, EscalationError> {
        self.mailbox
            .load()?
            .into_iter()
            .find(|r| r.id == id)
            .ok_or_else(|| EscalationError::NotFound(id.to_string()))
    }

    /// Accept a pending request and mark its user as operator-engaged.
    pub fn accept(&self, id: &str) -> Result<EscalationRequest, EscalationError> {
        let request = self.transition(id, EscalationStatus::Accepted)?;
        Flag::new(Arc::clone(&self.store), keys::operator_engaged(&request.user_id)).set(true)?;
        info!(id, user_id = %request.user_id, "Escalation accepted");
        Ok(request)
    }

    pub fn decline(&self, id: &str) -> Result<EscalationRequest, EscalationError> {
        let request = self.transition(id, EscalationStatus::Declined)?;
        info!(id, user_id = %request.user_id, "Escalation declined");
        Ok(request)
    }

    /// Whether an operator has accepted one of this user's requests.
    pub fn is_engaged(&self, user_id: &str) -> Result<bool, EscalationError> {
        Ok(Flag::new(Arc::clone(&self.store), keys::operator_engaged(user_id)).is_set()?)
    }

    /// Whether this user has ever filed a request.
    pub fn has_filed(&self, user_id: &str) -> Result<bool, EscalationError> {
        Ok(Flag::new(Arc::clone(&self.store), keys::escalation_filed(user_id)).is_set()?)
    }

    fn transition(
        &self,
        id: &str,
        to: EscalationStatus,
    ) -> Result<EscalationRequest, EscalationError> {
        let _guard = self.lock()?;
        self.mailbox.update(|requests| {
            let request = requests
                .iter_mut()
                .find(|r| r.id == id)
                .ok_or_else(|| EscalationError::NotFound(id.to_string()))?;
            validate_transition(request.status, to)?;
            request.status = to;
            request.decided_at = Some(Utc::now());
            Ok(request.clone())
        })
    }
}
