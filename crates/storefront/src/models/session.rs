//! Session-stored storefront state.
//!
//! The cart, the remembered category filter and the consultant chat log all
//! live in the visitor's server-side session. Handlers take a
//! [`StorefrontSession`], read a snapshot, apply a pure operation and write
//! the new value back.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tower_sessions::Session;

use aquacafe_core::{Cart, CategoryFilter};

use super::chat::ChatMessage;

/// Session keys.
pub mod keys {
    /// Key for the shopping cart.
    pub const CART: &str = "cart";

    /// Key for the last category filter chosen on the shop page.
    pub const CATEGORY: &str = "category";

    /// Key for the consultant chat log.
    pub const CONSULTATION_LOG: &str = "consultation_log";
}

/// Oldest messages are dropped past this many.
pub const MAX_LOG_MESSAGES: usize = 40;

/// Largest photo `data:` URL kept in the log. Only the newest photo is kept.
pub const MAX_LOGGED_IMAGE_BYTES: usize = 256 * 1024;

/// Typed access to the visitor's session.
#[derive(Debug, Clone)]
pub struct StorefrontSession(Session);

impl StorefrontSession {
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self(session)
    }

    /// Current cart, empty for a new session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn cart(&self) -> Result<Cart, tower_sessions::session::Error> {
        Ok(self.0.get::<Cart>(keys::CART).await?.unwrap_or_default())
    }

    /// Replace the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn set_cart(&self, cart: &Cart) -> Result<(), tower_sessions::session::Error> {
        self.0.insert(keys::CART, cart).await
    }

    /// Remembered category filter, `All` if none was chosen.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn category(&self) -> Result<CategoryFilter, tower_sessions::session::Error> {
        Ok(self
            .0
            .get::<CategoryFilter>(keys::CATEGORY)
            .await?
            .unwrap_or_default())
    }

    /// Remember a category filter.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn set_category(
        &self,
        filter: CategoryFilter,
    ) -> Result<(), tower_sessions::session::Error> {
        self.0.insert(keys::CATEGORY, filter).await
    }

    /// Consultant chat log, starting with the greeting.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn consultation_log(
        &self,
    ) -> Result<Vec<ChatMessage>, tower_sessions::session::Error> {
        Ok(self
            .0
            .get::<Vec<ChatMessage>>(keys::CONSULTATION_LOG)
            .await?
            .unwrap_or_else(|| vec![ChatMessage::greeting()]))
    }

    /// Append messages to the chat log and return the updated log.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn push_messages(
        &self,
        messages: impl IntoIterator<Item = ChatMessage>,
    ) -> Result<Vec<ChatMessage>, tower_sessions::session::Error> {
        let mut log = self.consultation_log().await?;
        log.extend(messages);
        let log = compact_photos(trim_log(log));
        self.0.insert(keys::CONSULTATION_LOG, &log).await?;
        Ok(log)
    }
}

fn trim_log(mut log: Vec<ChatMessage>) -> Vec<ChatMessage> {
    let excess = log.len().saturating_sub(MAX_LOG_MESSAGES);
    log.drain(..excess);
    log
}

/// Keep the `data:` URL of the newest photo only, and only while it fits in
/// [`MAX_LOGGED_IMAGE_BYTES`]. Dropped photos keep `photo_attached`.
fn compact_photos(mut log: Vec<ChatMessage>) -> Vec<ChatMessage> {
    let mut newest_seen = false;
    for message in log.iter_mut().rev() {
        let Some(size) = message.image.as_ref().map(String::len) else {
            continue;
        };
        if newest_seen || size > MAX_LOGGED_IMAGE_BYTES {
            message.image = None;
        }
        newest_seen = true;
    }
    log
}

impl<S> FromRequestParts<S> for StorefrontSession
where
    S: Send + Sync,
{
    type Rejection = <Session as FromRequestParts<S>>::Rejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Session::from_request_parts(parts, state).await.map(Self)
    }
}
