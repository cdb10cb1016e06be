//! Error types for the conversational assistant.

use settle_core::error::SettleError;

use crate::types::EscalationStatus;

/// Errors a caller of the resolver can see. Remote-call failures never
/// appear here: they are recovered inside the resolver.
#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    #[error("assistant is disabled")]
    Disabled,
    #[error("message cannot be empty")]
    EmptyMessage,
    #[error("message exceeds maximum length of {0} characters")]
    MessageTooLong(usize),
    #[error("unknown user: {0}")]
    UnknownUser(String),
    #[error("a reply for user {0} is already in progress")]
    Busy(String),
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<SettleError> for AssistantError {
    fn from(err: SettleError) -> Self {
        AssistantError::Storage(err.to_string())
    }
}

/// Failure of one remote completion attempt.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompletionError {
    #[error("remote completion is not configured")]
    NotConfigured,
    #[error("network error: {0}")]
    Network(String),
    #[error("remote completion timed out")]
    Timeout,
    #[error("remote completion returned HTTP {0}")]
    Status(u16),
    #[error("malformed completion payload: {0}")]
    Malformed(String),
}

/// Errors from the operator mailbox.
#[derive(Debug, thiserror::Error)]
pub enum EscalationError {
    #[error("escalation request not found: {0}")]
    NotFound(String),
    #[error("invalid escalation transition: {0} -> {1}")]
    InvalidTransition(EscalationStatus, EscalationStatus),
    #[error("storage error: {0}")]
    Storage(#[from] SettleError),
}
