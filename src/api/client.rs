//! HTTP backend for the chat endpoints.
//!
//! `AssistantBackend` is the seam between the session controller and the
//! remote service: the controller only ever sees this trait, so tests swap
//! in a scripted mock and the integration tests point `HttpBackend` at a
//! wiremock server.

use std::fmt;

use async_trait::async_trait;
use log::{debug, warn};

use super::types::{
    ChatResponse, ConversationRequest, DeleteResponse, HistoryEntry, HistoryResponse,
};
use crate::core::session::{Message, Role};

/// Errors that can occur talking to the backend.
///
/// A well-formed response with `success: false` is *not* an error here;
/// the controller handles that flag itself. Both layers end up on the same
/// user-visible failure path.
#[derive(Debug)]
pub enum BackendError {
    /// Network-level failure (timeout, DNS, connection refused).
    Network(String),
    /// Backend returned a non-success HTTP status.
    Api { status: u16, message: String },
    /// Failed to parse the backend's response body.
    Parse(String),
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::Network(msg) => write!(f, "network error: {msg}"),
            BackendError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            BackendError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for BackendError {}

/// The three remote operations the assistant core consumes.
#[async_trait]
pub trait AssistantBackend: Send + Sync {
    /// Fetches the stored conversation history for a user. Idempotent;
    /// the controller calls it at most once per session lifetime.
    async fn fetch_history(&self, user_id: &str) -> Result<HistoryResponse, BackendError>;

    /// Sends the whole conversation and returns the assistant's reply.
    async fn send_conversation(
        &self,
        messages: &[Message],
        user_id: &str,
        route_number: Option<&str>,
    ) -> Result<ChatResponse, BackendError>;

    /// Deletes the stored history for a user.
    async fn delete_history(&self, user_id: &str) -> Result<DeleteResponse, BackendError>;
}

/// Maps a domain role to its wire string.
fn role_str(role: Role) -> &'static str {
    match role {
        Role::User => "user",
        Role::Assistant => "assistant",
    }
}

/// Flattens domain messages into wire entries. Ticket tags are local
/// rendering state and are not sent; only role and content go on the wire.
fn to_wire(messages: &[Message]) -> Vec<HistoryEntry> {
    messages
        .iter()
        .map(|m| HistoryEntry {
            role: role_str(m.role).to_string(),
            content: m.content.clone(),
        })
        .collect()
}

/// Backend over HTTP (reqwest) against the ticketing service.
pub struct HttpBackend {
    base_url: String,
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Checks the HTTP status and decodes the JSON body.
    async fn decode<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, BackendError> {
        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            warn!("backend returned HTTP {}: {}", status, message);
            return Err(BackendError::Api {
                status: status.as_u16(),
                message,
            });
        }
        response
            .json::<T>()
            .await
            .map_err(|e| BackendError::Parse(e.to_string()))
    }
}

#[async_trait]
impl AssistantBackend for HttpBackend {
    async fn fetch_history(&self, user_id: &str) -> Result<HistoryResponse, BackendError> {
        debug!("fetching chat history for {user_id}");
        let response = self
            .client
            .get(format!("{}/chat/history/{}", self.base_url, user_id))
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;
        Self::decode(response).await
    }

    async fn send_conversation(
        &self,
        messages: &[Message],
        user_id: &str,
        route_number: Option<&str>,
    ) -> Result<ChatResponse, BackendError> {
        let request = ConversationRequest {
            messages: to_wire(messages),
            conductor_id: user_id.to_string(),
            route_number: route_number.map(str::to_string),
        };
        debug!(
            "sending conversation for {user_id}: {} messages, route {:?}",
            request.messages.len(),
            route_number
        );
        let response = self
            .client
            .post(format!("{}/chat/conversation", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;
        Self::decode(response).await
    }

    async fn delete_history(&self, user_id: &str) -> Result<DeleteResponse, BackendError> {
        debug!("deleting chat history for {user_id}");
        let response = self
            .client
            .delete(format!("{}/chat/history/{}", self.base_url, user_id))
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;
        Self::decode(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_wire_drops_ticket_tag() {
        let messages = vec![
            Message::assistant("hi"),
            Message::user("make a ticket"),
        ];
        let wire = to_wire(&messages);
        assert_eq!(wire.len(), 2);
        assert_eq!(wire[0].role, "assistant");
        assert_eq!(wire[1].role, "user");
        assert_eq!(wire[1].content, "make a ticket");
    }

    #[test]
    fn test_base_url_trailing_slash_normalized() {
        let backend = HttpBackend::new("http://localhost:5000/api/".to_string());
        assert_eq!(backend.base_url, "http://localhost:5000/api");
    }
}
