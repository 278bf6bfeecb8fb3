//! Wire types for the ticketing backend's chat endpoints.
//!
//! The backend speaks camelCase JSON. These types mirror the three chat
//! operations the assistant core consumes: history fetch, conversation
//! send, and history delete. Everything else the console talks to
//! (tickets, fares, statistics) lives outside this crate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One persisted conversation turn as the backend stores it.
/// Role is a plain string on the wire ("user" / "assistant").
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub role: String,
    pub content: String,
}

/// Response of `GET /chat/history/{userId}`.
#[derive(Deserialize, Debug, Default)]
pub struct HistoryResponse {
    pub success: bool,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

/// Request body of `POST /chat/conversation`.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ConversationRequest {
    pub messages: Vec<HistoryEntry>,
    pub conductor_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route_number: Option<String>,
}

/// Response of `POST /chat/conversation`.
///
/// `success: false` with a non-empty `answer` is an application-level
/// failure the backend wants shown to the user; the controller falls back
/// to a fixed notice when `answer` is empty.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub success: bool,
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub ticket_generated: bool,
    #[serde(default)]
    pub ticket: Option<TicketSummary>,
}

/// Summary of a ticket the assistant created as a conversation side effect.
/// Carried on the assistant message for distinctive rendering.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TicketSummary {
    pub ticket_number: String,
    pub route_number: String,
    #[serde(rename = "from")]
    pub origin: Option<String>,
    #[serde(rename = "to")]
    pub destination: Option<String>,
    #[serde(default)]
    pub fare: f64,
    pub passenger_type: Option<String>,
    pub issued_at: Option<DateTime<Utc>>,
}

/// Response of `DELETE /chat/history/{userId}`.
#[derive(Deserialize, Debug, Default)]
pub struct DeleteResponse {
    pub success: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_response_defaults_missing_fields() {
        let resp: ChatResponse = serde_json::from_str(r#"{"success": true}"#).unwrap();
        assert!(resp.success);
        assert_eq!(resp.answer, "");
        assert!(!resp.ticket_generated);
        assert!(resp.ticket.is_none());
    }

    #[test]
    fn test_ticket_summary_camel_case() {
        let json = r#"{
            "ticketNumber": "T-0042",
            "routeNumber": "100",
            "from": "Central",
            "to": "Harbor",
            "fare": 15.5,
            "passengerType": "regular",
            "issuedAt": "2024-03-01T08:30:00Z"
        }"#;
        let ticket: TicketSummary = serde_json::from_str(json).unwrap();
        assert_eq!(ticket.ticket_number, "T-0042");
        assert_eq!(ticket.origin.as_deref(), Some("Central"));
        assert_eq!(ticket.destination.as_deref(), Some("Harbor"));
        assert_eq!(ticket.fare, 15.5);
    }

    #[test]
    fn test_conversation_request_serializes_camel_case() {
        let req = ConversationRequest {
            messages: vec![HistoryEntry {
                role: "user".to_string(),
                content: "hello".to_string(),
            }],
            conductor_id: "c-1".to_string(),
            route_number: Some("100".to_string()),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["conductorId"], "c-1");
        assert_eq!(json["routeNumber"], "100");
        assert_eq!(json["messages"][0]["role"], "user");
    }

    #[test]
    fn test_history_response_default_empty() {
        let resp: HistoryResponse = serde_json::from_str(r#"{"success": false}"#).unwrap();
        assert!(!resp.success);
        assert!(resp.history.is_empty());
    }
}
