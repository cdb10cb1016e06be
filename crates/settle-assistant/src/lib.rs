//! Conversational assistant for the SettleSpace marketplace.
//!
//! Answers buyer and seller questions with a remote completion model,
//! falls back to a deterministic rule table when the model fails or hedges,
//! keeps a bounded per-user history, and hands conversations to a human
//! operator through a shared escalation mailbox.

pub mod completion;
pub mod error;
pub mod escalation;
pub mod history;
pub mod intent;
pub mod poller;
pub mod prompt;
pub mod resolver;
pub mod templates;
pub mod types;

pub use completion::{CompletionClient, DisabledClient, GeminiClient};
pub use error::{AssistantError, CompletionError, EscalationError};
pub use escalation::EscalationDesk;
pub use history::{ConversationHistory, HistoryStore};
pub use intent::{City, Intent, IntentClassifier};
pub use poller::{OperatorPoller, PollerHandle};
pub use resolver::ResponseResolver;
pub use types::{
    AssistantReply, ConversationTurn, EscalationRequest, EscalationStatus, ReplySource, TurnRole,
};
