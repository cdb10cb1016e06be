//! Turns a user message into a reply.
//!
//! Per turn: an open escalation offer answered affirmatively files an
//! escalation. Otherwise the remote model is asked once; a failure or a
//! hedged answer falls back to the local rule table. A hedged answer or an
//! unrecognised question arms a new offer unless the user is already with an
//! operator or the turn was itself the answer to an offer. Both turns are
//! appended to the user's history.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use settle_core::config::{AssistantConfig, SettleConfig};
use settle_core::types::{PageContext, User};
use settle_storage::{KeyValueStore, ListingRepository, UserRepository};

use crate::completion::CompletionClient;
use crate::error::{AssistantError, CompletionError};
use crate::escalation::EscalationDesk;
use crate::history::HistoryStore;
use crate::intent::{contains_hedge, is_affirmative, Intent, IntentClassifier};
use crate::prompt::{build_prompt, PromptContext};
use crate::templates;
use crate::types::{AssistantReply, ConversationTurn, ReplySource};

/// In-memory per-user session state. Lost on restart.
#[derive(Debug, Default, Clone)]
struct SessionState {
    offer_opened_at: Option<DateTime<Utc>>,
    escalated: bool,
}

/// Marks a user's turn as in flight until dropped.
struct TurnGuard<'a> {
    in_flight: &'a Mutex<HashSet<String>>,
    user_id: String,
}

impl<'a> TurnGuard<'a> {
    fn acquire(in_flight: &'a Mutex<HashSet<String>>, user_id: &str) -> Result<Self, AssistantError> {
        let mut active = in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if !active.insert(user_id.to_string()) {
            return Err(AssistantError::Busy(user_id.to_string()));
        }
        Ok(Self {
            in_flight,
            user_id: user_id.to_string(),
        })
    }
}

impl Drop for TurnGuard<'_> {
    fn drop(&mut self) {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.user_id);
    }
}

pub struct ResponseResolver {
    config: AssistantConfig,
    remote_timeout: Duration,
    client: Arc<dyn CompletionClient>,
    classifier: IntentClassifier,
    users: UserRepository,
    listings: ListingRepository,
    histories: HistoryStore,
    desk: Arc<EscalationDesk>,
    sessions: Mutex<HashMap<String, SessionState>>,
    in_flight: Mutex<HashSet<String>>,
}

impl ResponseResolver {
    pub fn new(
        config: &SettleConfig,
        store: Arc<dyn KeyValueStore>,
        client: Arc<dyn CompletionClient>,
        desk: Arc<EscalationDesk>,
    ) -> Self {
        Self {
            config: config.assistant.clone(),
            remote_timeout: Duration::from_secs(config.completion.timeout_secs.max(1)),
            client,
            classifier: IntentClassifier::new(),
            users: UserRepository::new(Arc::clone(&store)),
            listings: ListingRepository::new(Arc::clone(&store)),
            histories: HistoryStore::new(store, config.assistant.history_limit),
            desk,
            sessions: Mutex::new(HashMap::new()),
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    /// Override the bound on the remote call.
    pub fn with_remote_timeout(mut self, timeout: Duration) -> Self {
        self.remote_timeout = timeout;
        self
    }

    /// Answer one message from `user_id` on `page`.
    ///
    /// Only input and guard errors are returned. Remote failures degrade to
    /// the rule table and internal failures to the trouble reply.
    pub async fn respond(
        &self,
        user_id: &str,
        page: &PageContext,
        message: &str,
    ) -> Result<AssistantReply, AssistantError> {
        if !self.config.enabled {
            return Err(AssistantError::Disabled);
        }

        let message = message.trim();
        if message.is_empty() {
            return Err(AssistantError::EmptyMessage);
        }
        if message.chars().count() > self.config.max_message_length {
            return Err(AssistantError::MessageTooLong(self.config.max_message_length));
        }

        let user = self.find_user(user_id)?;
        let _guard = TurnGuard::acquire(&self.in_flight, user_id)?;

        let reply = match self.resolve(&user, page, message).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(user_id, error = %e, "Assistant turn failed, offering operator");
                self.trouble_reply(user_id)
            }
        };

        if let Err(e) = self.histories.append(
            user_id,
            [
                ConversationTurn::user(message),
                ConversationTurn::assistant(reply.text.clone()),
            ],
        ) {
            warn!(user_id, error = %e, "Failed to persist conversation history");
        }

        debug!(user_id, source = ?reply.source, offer_open = reply.offer_open, "Assistant replied");
        Ok(reply)
    }

    /// Greeting for a user opening the chat on `page`.
    pub fn welcome(&self, user_id: &str, page: &PageContext) -> Result<String, AssistantError> {
        let user = self.find_user(user_id)?;
        Ok(templates::welcome(&user.name, page))
    }

    /// Stored turns for a user, oldest first.
    pub fn history(&self, user_id: &str) -> Result<Vec<ConversationTurn>, AssistantError> {
        self.find_user(user_id)?;
        Ok(self.histories.load(user_id)?.into_vec())
    }

    /// Whether an unexpired escalation offer is open for the user.
    pub fn offer_open(&self, user_id: &str) -> bool {
        self.with_session(user_id, |s| self.offer_is_live(s.offer_opened_at))
    }

    /// Forget the in-memory session (open offer, escalated marker).
    pub fn reset_session(&self, user_id: &str) {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(user_id);
    }

    fn find_user(&self, user_id: &str) -> Result<User, AssistantError> {
        self.users
            .find_by_id(user_id)?
            .ok_or_else(|| AssistantError::UnknownUser(user_id.to_string()))
    }

    async fn resolve(
        &self,
        user: &User,
        page: &PageContext,
        message: &str,
    ) -> Result<AssistantReply, AssistantError> {
        // Any open offer is consumed by this turn whatever happens next.
        let offer_was_open = self.with_session(&user.id, |s| {
            let opened_at = s.offer_opened_at.take();
            self.offer_is_live(opened_at)
        });
        let suppressed = self.offers_suppressed(&user.id)?;

        if offer_was_open && !suppressed && is_affirmative(message) {
            let request = self
                .desk
                .file(user)
                .map_err(|e| AssistantError::Storage(e.to_string()))?;
            self.with_session(&user.id, |s| s.escalated = true);
            info!(user_id = %user.id, id = %request.id, "Conversation escalated to operator");
            return Ok(AssistantReply {
                text: templates::ESCALATED_ACK.to_string(),
                source: ReplySource::Escalated,
                link: None,
                offer_open: false,
                escalation_id: Some(request.id),
            });
        }

        let listings = self.listings.approved()?;
        let history = self.histories.load(&user.id)?;
        let recent = history.recent(self.config.prompt_turns);
        let prompt = build_prompt(
            &PromptContext {
                user,
                page,
                history: &recent,
                listings: &listings,
                message,
            },
            self.config.prompt_turns,
            self.config.prompt_listings,
        );

        let hedged = match self.complete(&prompt).await {
            Ok(text) if !contains_hedge(&text) => {
                return Ok(AssistantReply {
                    text,
                    source: ReplySource::Remote,
                    link: None,
                    offer_open: false,
                    escalation_id: None,
                });
            }
            Ok(_) => {
                debug!(user_id = %user.id, "Remote reply hedged, using rule table");
                true
            }
            Err(e) => {
                debug!(user_id = %user.id, error = %e, "Remote completion failed, using rule table");
                false
            }
        };

        let intent = self.classifier.classify(message);
        let rendered = templates::render(&intent, &user.name, &listings);
        // The turn that answered an offer never opens another one.
        let arm = !suppressed && !offer_was_open && (hedged || intent == Intent::Unknown);
        debug!(user_id = %user.id, %intent, hedged, arm, "Rule table reply");

        let text = if arm {
            self.with_session(&user.id, |s| s.offer_opened_at = Some(Utc::now()));
            templates::with_offer(&rendered.text)
        } else {
            rendered.text
        };

        Ok(AssistantReply {
            text,
            source: ReplySource::Local,
            link: rendered.link,
            offer_open: arm,
            escalation_id: None,
        })
    }

    /// One bounded remote attempt. No retries.
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        match tokio::time::timeout(self.remote_timeout, self.client.complete(prompt)).await {
            Ok(result) => result.map(|text| text.trim().to_string()),
            Err(_) => Err(CompletionError::Timeout),
        }
    }

    fn trouble_reply(&self, user_id: &str) -> AssistantReply {
        let suppressed = self.offers_suppressed(user_id).unwrap_or(false);
        if !suppressed {
            self.with_session(user_id, |s| s.offer_opened_at = Some(Utc::now()));
        }
        AssistantReply {
            text: templates::TROUBLE.to_string(),
            source: ReplySource::Trouble,
            link: None,
            offer_open: !suppressed,
            escalation_id: None,
        }
    }

    /// No offers while an operator is engaged or after escalating this session.
    fn offers_suppressed(&self, user_id: &str) -> Result<bool, AssistantError> {
        if self.with_session(user_id, |s| s.escalated) {
            return Ok(true);
        }
        self.desk
            .is_engaged(user_id)
            .map_err(|e| AssistantError::Storage(e.to_string()))
    }

    fn offer_is_live(&self, opened_at: Option<DateTime<Utc>>) -> bool {
        match opened_at {
            None => false,
            Some(_) if self.config.offer_ttl_minutes == 0 => true,
            Some(at) => {
                Utc::now() - at < chrono::Duration::minutes(i64::from(self.config.offer_ttl_minutes))
            }
        }
    }

    fn with_session<R>(&self, user_id: &str, f: impl FnOnce(&mut SessionState) -> R) -> R {
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        f(sessions.entry(user_id.to_string()).or_default())
    }
}
