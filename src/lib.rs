//! Tessera library exports
//!
//! The conversational-assistant core of the conductor ticketing console:
//! per-user chat sessions against the remote backend, plus the pure
//! text-to-blocks formatter the view renders with.

pub mod api;
pub mod core;
pub mod format;
pub mod locale;
pub mod view;

#[cfg(test)]
pub mod test_support;
