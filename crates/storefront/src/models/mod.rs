//! Domain models for storefront.
//!
//! Everything here lives in the visitor's session; nothing is persisted.

pub mod chat;
pub mod session;

pub use chat::{ChatMessage, ChatRole};
pub use session::{StorefrontSession, keys as session_keys};
