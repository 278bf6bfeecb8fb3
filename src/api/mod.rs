//! Remote backend interface: wire types and the HTTP client.

pub mod client;
pub mod types;

pub use client::{AssistantBackend, BackendError, HttpBackend};
