//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::api::client::{AssistantBackend, BackendError};
use crate::api::types::{ChatResponse, DeleteResponse, HistoryEntry, HistoryResponse};
use crate::core::session::Message;

/// A scripted backend for controller tests: counts calls, records the last
/// outbound request, and replays queued replies. With an empty queue it
/// answers with a generic success.
#[derive(Default)]
pub struct MockBackend {
    pub fetch_calls: AtomicUsize,
    pub send_calls: AtomicUsize,
    pub delete_calls: AtomicUsize,
    pub fail_fetch: AtomicBool,
    pub fail_delete: AtomicBool,
    pub history: Mutex<Vec<HistoryEntry>>,
    pub replies: Mutex<VecDeque<Result<ChatResponse, BackendError>>>,
    pub last_route: Mutex<Option<String>>,
    pub last_sent_len: AtomicUsize,
}

impl MockBackend {
    pub fn new() -> Self {
        MockBackend::default()
    }

    pub fn with_history(history: Vec<HistoryEntry>) -> Self {
        let backend = MockBackend::default();
        *backend.history.lock().unwrap() = history;
        backend
    }

    pub fn push_reply(&self, reply: Result<ChatResponse, BackendError>) {
        self.replies.lock().unwrap().push_back(reply);
    }
}

#[async_trait]
impl AssistantBackend for MockBackend {
    async fn fetch_history(&self, _user_id: &str) -> Result<HistoryResponse, BackendError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(BackendError::Network("mock fetch failure".to_string()));
        }
        Ok(HistoryResponse {
            success: true,
            history: self.history.lock().unwrap().clone(),
        })
    }

    async fn send_conversation(
        &self,
        messages: &[Message],
        _user_id: &str,
        route_number: Option<&str>,
    ) -> Result<ChatResponse, BackendError> {
        self.send_calls.fetch_add(1, Ordering::SeqCst);
        self.last_sent_len.store(messages.len(), Ordering::SeqCst);
        *self.last_route.lock().unwrap() = route_number.map(str::to_string);

        if let Some(reply) = self.replies.lock().unwrap().pop_front() {
            return reply;
        }
        Ok(ChatResponse {
            success: true,
            answer: "ok".to_string(),
            ..Default::default()
        })
    }

    async fn delete_history(&self, _user_id: &str) -> Result<DeleteResponse, BackendError> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(BackendError::Network("mock delete failure".to_string()));
        }
        Ok(DeleteResponse { success: true })
    }
}
