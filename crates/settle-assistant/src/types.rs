//! Records the assistant stores and returns.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Conversation
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnRole {
    User,
    Assistant,
}

impl fmt::Display for TurnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnRole::User => write!(f, "user"),
            TurnRole::Assistant => write!(f, "assistant"),
        }
    }
}

/// One message exchanged by either party.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: TurnRole,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl ConversationTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Assistant,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}

// =============================================================================
// Escalation mailbox
// =============================================================================

/// Lifecycle of an escalation request. `Accepted` and `Declined` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EscalationStatus {
    Pending,
    Accepted,
    Declined,
}

impl fmt::Display for EscalationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EscalationStatus::Pending => write!(f, "pending"),
            EscalationStatus::Accepted => write!(f, "accepted"),
            EscalationStatus::Declined => write!(f, "declined"),
        }
    }
}

impl std::str::FromStr for EscalationStatus {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(EscalationStatus::Pending),
            "accepted" => Ok(EscalationStatus::Accepted),
            "declined" => Ok(EscalationStatus::Declined),
            _ => Err(format!("Unknown escalation status: {}", s)),
        }
    }
}

/// A user's request to talk to a human operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EscalationRequest {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    pub user_email: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub status: EscalationStatus,
    /// When the operator accepted or declined.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decided_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Replies
// =============================================================================

/// Where the text of a reply came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplySource {
    /// The remote completion model, unmodified.
    Remote,
    /// The local rule table.
    Local,
    /// An escalation was filed for this turn.
    Escalated,
    /// Something failed internally; the user was offered an operator.
    Trouble,
}

/// The assistant's answer to one user message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantReply {
    pub text: String,
    pub source: ReplySource,
    /// Relative link the UI can render next to the text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    /// Whether an escalation offer is open after this reply.
    pub offer_open: bool,
    /// Set when this turn filed an escalation request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub escalation_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_constructors() {
        let u = ConversationTurn::user("hello");
        assert_eq!(u.role, TurnRole::User);
        assert_eq!(u.text, "hello");
        let a = ConversationTurn::assistant("hi");
        assert_eq!(a.role, TurnRole::Assistant);
    }

    #[test]
    fn test_escalation_status_round_trip_strings() {
        for status in [
            EscalationStatus::Pending,
            EscalationStatus::Accepted,
            EscalationStatus::Declined,
        ] {
            assert_eq!(status.to_string().parse::<EscalationStatus>().unwrap(), status);
        }
        assert!("closed".parse::<EscalationStatus>().is_err());
    }

    #[test]
    fn test_escalation_request_json_shape() {
        let req = EscalationRequest {
            id: "notif-1".into(),
            user_id: "buyer-1".into(),
            user_name: "Demo Buyer".into(),
            user_email: "buyer@demo.com".into(),
            message: "help".into(),
            created_at: Utc::now(),
            status: EscalationStatus::Pending,
            decided_at: None,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["userId"], "buyer-1");
        assert_eq!(json["userEmail"], "buyer@demo.com");
        assert_eq!(json["status"], "pending");
        assert!(json.get("decidedAt").is_none());
    }

    #[test]
    fn test_reply_omits_empty_optionals() {
        let reply = AssistantReply {
            text: "Hi".into(),
            source: ReplySource::Local,
            link: None,
            offer_open: false,
            escalation_id: None,
        };
        let json = serde_json::to_value(&reply).unwrap();
        assert_eq!(json["source"], "local");
        assert!(json.get("link").is_none());
        assert!(json.get("escalation_id").is_none());
    }
}
