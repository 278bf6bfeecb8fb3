//! # Session Controller
//!
//! Owns the conversation state machine and mediates every call to the
//! remote backend. The formatter knows nothing about network state; this
//! controller knows nothing about text structure.
//!
//! Every suspend point follows the same discipline: capture the session's
//! epoch before awaiting, re-check it afterwards, and silently discard the
//! result if the owning view closed in between. The source only did this
//! for hydration; here the submission and clear paths get the identical
//! check, closing a late-response leak.

use std::fmt;
use std::sync::Arc;

use log::{debug, warn};

use crate::api::client::{AssistantBackend, BackendError};
use crate::api::types::{ChatResponse, HistoryResponse};
use crate::core::session::{ErrorKind, Message, Phase, Role, SessionStore};
use crate::locale::Strings;

/// Rejected submissions. Never surfaced as a chat message; the caller
/// decides whether to show anything at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Input was blank after trimming.
    Blank,
    /// A submission is already in flight; not queued.
    Busy,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Blank => write!(f, "message is blank"),
            ValidationError::Busy => write!(f, "a submission is already pending"),
        }
    }
}

impl std::error::Error for ValidationError {}

pub struct ChatController {
    store: SessionStore,
    backend: Arc<dyn AssistantBackend>,
    strings: &'static Strings,
}

impl ChatController {
    pub fn new(backend: Arc<dyn AssistantBackend>, strings: &'static Strings) -> Self {
        ChatController {
            store: SessionStore::new(),
            backend,
            strings,
        }
    }

    // ── View lifecycle ──────────────────────────────────────────────────

    /// Opens a session for a user, replacing any stale one.
    pub fn open_session(&mut self, user_id: &str, route_number: Option<String>) {
        self.store.open(user_id, route_number, self.strings.greeting);
        debug!("session opened for {user_id}");
    }

    /// Discards a session. In-flight results for it will fail their
    /// liveness check and be dropped.
    pub fn close_session(&mut self, user_id: &str) {
        self.store.close(user_id);
        debug!("session closed for {user_id}");
    }

    // ── Render accessors ────────────────────────────────────────────────

    pub fn current_messages(&self, user_id: &str) -> &[Message] {
        self.store
            .get(user_id)
            .map_or(&[], |session| session.messages.as_slice())
    }

    pub fn is_pending(&self, user_id: &str) -> bool {
        self.store
            .get(user_id)
            .is_some_and(|session| session.is_pending())
    }

    pub fn last_error(&self, user_id: &str) -> Option<ErrorKind> {
        self.store.get(user_id).and_then(|session| session.last_error)
    }

    pub fn is_clear_pending(&self, user_id: &str) -> bool {
        self.store
            .get(user_id)
            .is_some_and(|session| session.clear_pending)
    }

    pub fn draft(&self, user_id: &str) -> &str {
        self.store.get(user_id).map_or("", |session| &session.draft)
    }

    /// The fixed quick-question prompts, offered only before any exchange.
    pub fn quick_questions(&self, user_id: &str) -> Option<[&'static str; 4]> {
        self.store
            .get(user_id)
            .filter(|session| session.offers_quick_questions())
            .map(|_| self.strings.quick_questions)
    }

    /// Copies a quick question into the draft. Populates the input only;
    /// never submits.
    pub fn apply_quick_question(&mut self, user_id: &str, index: usize) {
        let Some(question) = self
            .quick_questions(user_id)
            .and_then(|qs| qs.get(index).copied())
        else {
            return;
        };
        if let Some(session) = self.store.get_mut(user_id) {
            session.draft = question.to_string();
        }
    }

    pub fn set_draft(&mut self, user_id: &str, text: &str) {
        if let Some(session) = self.store.get_mut(user_id) {
            session.draft = text.to_string();
        }
    }

    // ── Hydration ───────────────────────────────────────────────────────

    /// Merges remote history into the session, at most once per session
    /// lifetime. The latch is set *before* the request is issued, so a
    /// duplicate trigger arriving before the first resolves is suppressed
    /// rather than fetching (and appending) the history twice.
    pub async fn hydrate_once(&mut self, user_id: &str) {
        let epoch = {
            let Some(session) = self.store.get_mut(user_id) else {
                return;
            };
            if session.hydration_latched {
                debug!("hydration already latched for {user_id}");
                return;
            }
            session.hydration_latched = true;
            session.phase = Phase::Hydrating;
            session.epoch
        };

        let result = self.backend.fetch_history(user_id).await;
        self.apply_hydration(user_id, epoch, result);
    }

    /// Resume-time half of hydration. Split out so the liveness check is
    /// testable without racing real tasks.
    fn apply_hydration(
        &mut self,
        user_id: &str,
        epoch: u64,
        result: Result<HistoryResponse, BackendError>,
    ) {
        let Some(session) = self.store.get_live(user_id, epoch) else {
            debug!("discarding hydration result for closed session {user_id}");
            return;
        };
        session.phase = Phase::Ready;

        match result {
            Ok(response) if response.success && !response.history.is_empty() => {
                debug!(
                    "hydrated {} history entries for {user_id}",
                    response.history.len()
                );
                for entry in response.history {
                    let role = if entry.role == "user" {
                        Role::User
                    } else {
                        Role::Assistant
                    };
                    session.messages.push(Message {
                        role,
                        content: entry.content,
                        is_ticket: false,
                        ticket: None,
                    });
                }
            }
            Ok(_) => {}
            // Silent degradation: worst case is a missing history.
            Err(e) => warn!("failed to load chat history for {user_id}: {e}"),
        }
    }

    // ── Submission ──────────────────────────────────────────────────────

    /// Submits a user message and appends the assistant's reply.
    ///
    /// The user message is appended optimistically and the draft cleared
    /// before the request goes out. Failures append one localized notice
    /// instead of a reply; they are never fatal and nothing is retried.
    pub async fn submit(&mut self, user_id: &str, text: &str) -> Result<(), ValidationError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Blank);
        }

        let (epoch, outbound, route_number) = {
            let Some(session) = self.store.get_mut(user_id) else {
                debug!("submit for unknown session {user_id}, ignoring");
                return Ok(());
            };
            if session.is_pending() {
                return Err(ValidationError::Busy);
            }
            session.messages.push(Message::user(trimmed));
            session.draft.clear();
            session.phase = Phase::Awaiting;
            session.last_error = None;
            (
                session.epoch,
                session.messages.clone(),
                session.route_number.clone(),
            )
        };

        let result = self
            .backend
            .send_conversation(&outbound, user_id, route_number.as_deref())
            .await;
        self.apply_reply(user_id, epoch, result);
        Ok(())
    }

    fn apply_reply(
        &mut self,
        user_id: &str,
        epoch: u64,
        result: Result<ChatResponse, BackendError>,
    ) {
        let Some(session) = self.store.get_live(user_id, epoch) else {
            debug!("discarding reply for closed session {user_id}");
            return;
        };
        session.phase = Phase::Ready;

        match result {
            Ok(response) if response.success => {
                let mut message = Message::assistant(response.answer);
                if response.ticket_generated {
                    message.is_ticket = true;
                    message.ticket = response.ticket;
                }
                session.messages.push(message);
            }
            Ok(response) => {
                // Application-level failure. The backend may have supplied
                // its own user-facing text; fall back to the fixed notice.
                session.last_error = Some(ErrorKind::Application);
                let notice = if response.answer.trim().is_empty() {
                    self.strings.assistant_error.to_string()
                } else {
                    response.answer
                };
                session.messages.push(Message::assistant(notice));
            }
            Err(e) => {
                warn!("chat request failed for {user_id}: {e}");
                session.last_error = Some(ErrorKind::Transport);
                session
                    .messages
                    .push(Message::assistant(self.strings.connection_error));
            }
        }
    }

    // ── Clear flow ──────────────────────────────────────────────────────

    /// Arms the clear confirmation. No side effects until confirmed.
    pub fn request_clear(&mut self, user_id: &str) {
        if let Some(session) = self.store.get_mut(user_id) {
            session.clear_pending = true;
        }
    }

    pub fn cancel_clear(&mut self, user_id: &str) {
        if let Some(session) = self.store.get_mut(user_id) {
            session.clear_pending = false;
        }
    }

    /// Deletes the remote history and, on success, replaces the whole
    /// message sequence with a single fresh greeting. All-or-nothing: on
    /// failure the existing sequence is untouched and nothing is surfaced.
    pub async fn confirm_clear(&mut self, user_id: &str) {
        let epoch = {
            let Some(session) = self.store.get_mut(user_id) else {
                return;
            };
            session.clear_pending = false;
            session.epoch
        };

        let result = self.backend.delete_history(user_id).await;
        self.apply_clear(user_id, epoch, result);
    }

    fn apply_clear(
        &mut self,
        user_id: &str,
        epoch: u64,
        result: Result<crate::api::types::DeleteResponse, BackendError>,
    ) {
        let Some(session) = self.store.get_live(user_id, epoch) else {
            debug!("discarding clear result for closed session {user_id}");
            return;
        };

        match result {
            Ok(response) if response.success => {
                session.messages = vec![Message::assistant(self.strings.cleared_greeting)];
                session.last_error = None;
                debug!("chat history cleared for {user_id}");
            }
            Ok(_) => warn!("backend declined to clear history for {user_id}"),
            Err(e) => warn!("failed to clear chat history for {user_id}: {e}"),
        }
    }
}
