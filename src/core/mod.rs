//! # Core Application Logic
//!
//! The assistant's business state and its state machine. It knows nothing
//! about any specific UI technology.
//!
//! ```text
//!            ┌──────────────────────────────┐
//!            │            CORE              │
//!            │                              │
//!            │  • session (state + store)   │
//!            │  • controller (transitions)  │
//!            │  • config (settings)         │
//!            │                              │
//!            │  Remote I/O behind a trait.  │
//!            └──────────────┬───────────────┘
//!                           │
//!              ┌────────────┴────────────┐
//!              ▼                         ▼
//!       ┌────────────┐            ┌────────────┐
//!       │  Console   │            │  Backend   │
//!       │    view    │            │  (reqwest) │
//!       └────────────┘            └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`session`]: `ConversationSession`, `SessionStore` — state in one place
//! - [`controller`]: `ChatController` — every transition the app can make
//! - [`config`]: settings with the defaults → file → env → CLI hierarchy

pub mod config;
pub mod controller;
pub mod session;
