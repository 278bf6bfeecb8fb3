//! # Conversation Sessions
//!
//! In-memory conversation state for one user across one view lifetime.
//! The remote backend is the durable store; a session is a cache that is
//! merged once per lifetime with it (hydration) and discarded on close.
//!
//! ```text
//! Phase:  Fresh ──hydrate──▶ Hydrating ──▶ Ready ◀──▶ Awaiting
//! ```
//!
//! The source kept this as a handful of booleans scattered across a view;
//! here it is one explicit `Phase` value plus two orthogonal bits: the
//! hydration latch (one-shot, never reset) and the clear-confirmation flag.

use std::collections::HashMap;

use crate::api::types::TicketSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

/// One conversation turn. Immutable once appended; insertion order is
/// conversation order.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub role: Role,
    pub content: String,
    /// True when this reply created a ticket as a side effect.
    pub is_ticket: bool,
    pub ticket: Option<TicketSummary>,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Message {
            role: Role::User,
            content: content.into(),
            is_ticket: false,
            ticket: None,
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Message {
            role: Role::Assistant,
            content: content.into(),
            is_ticket: false,
            ticket: None,
        }
    }
}

/// Where the session is in its lifecycle. `Awaiting` means a submission
/// is in flight; new submissions are rejected, not queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Fresh,
    Hydrating,
    Ready,
    Awaiting,
}

/// What went wrong with the last submission, if anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Request-level failure (network, HTTP error, bad body).
    Transport,
    /// Well-formed response with `success: false`.
    Application,
}

pub struct ConversationSession {
    pub user_id: String,
    pub route_number: Option<String>,
    /// Liveness token. Captured before a suspend point and compared at
    /// resume; a mismatch means the owning view closed in between and the
    /// result must be discarded.
    pub epoch: u64,
    pub messages: Vec<Message>,
    pub phase: Phase,
    /// Set synchronously before the hydration request is issued, and never
    /// reset for the session's lifetime.
    pub hydration_latched: bool,
    /// Destructive clear is gated behind explicit confirmation.
    pub clear_pending: bool,
    pub last_error: Option<ErrorKind>,
    /// Input buffer. Quick questions populate it; submit clears it.
    pub draft: String,
}

impl ConversationSession {
    fn new(user_id: &str, route_number: Option<String>, greeting: &str, epoch: u64) -> Self {
        ConversationSession {
            user_id: user_id.to_string(),
            route_number,
            epoch,
            messages: vec![Message::assistant(greeting)],
            phase: Phase::Fresh,
            hydration_latched: false,
            clear_pending: false,
            last_error: None,
            draft: String::new(),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.phase == Phase::Awaiting
    }

    /// Quick questions are offered only before any exchange, i.e. while
    /// the session holds exactly the initial greeting.
    pub fn offers_quick_questions(&self) -> bool {
        self.messages.len() == 1
    }
}

/// Explicit session store keyed by user identity. Lifetime is caller
/// controlled: `open` on view open, `close` on view close. One session per
/// user; no two views share one.
#[derive(Default)]
pub struct SessionStore {
    sessions: HashMap<String, ConversationSession>,
    next_epoch: u64,
}

impl SessionStore {
    pub fn new() -> Self {
        SessionStore::default()
    }

    /// Creates a session for a user, replacing any existing one. The new
    /// session gets a fresh epoch, so results still in flight for the old
    /// one fail their liveness check and are discarded.
    pub fn open(
        &mut self,
        user_id: &str,
        route_number: Option<String>,
        greeting: &str,
    ) -> &mut ConversationSession {
        self.next_epoch += 1;
        let session = ConversationSession::new(user_id, route_number, greeting, self.next_epoch);
        self.sessions.insert(user_id.to_string(), session);
        self.sessions
            .get_mut(user_id)
            .expect("session was just inserted")
    }

    pub fn close(&mut self, user_id: &str) {
        self.sessions.remove(user_id);
    }

    pub fn get(&self, user_id: &str) -> Option<&ConversationSession> {
        self.sessions.get(user_id)
    }

    pub fn get_mut(&mut self, user_id: &str) -> Option<&mut ConversationSession> {
        self.sessions.get_mut(user_id)
    }

    /// Returns the session only if it is still the same view lifetime as
    /// when `epoch` was captured. This is the resume-time half of the
    /// cancellation-by-relevance check.
    pub fn get_live(&mut self, user_id: &str, epoch: u64) -> Option<&mut ConversationSession> {
        self.sessions
            .get_mut(user_id)
            .filter(|session| session.epoch == epoch)
    }
}
