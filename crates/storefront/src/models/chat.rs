//! Consultant chat log.

use serde::{Deserialize, Serialize};

use crate::services::Citation;

/// Opening line of every new consultant panel.
pub const GREETING: &str =
    "Hello! I'm AquaBot. Send me a photo of your plants or ask any questions about your aquascape!";

/// Who wrote a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Bot,
}

/// One bubble in the consultant panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
    /// `data:` URL of an attached photo, while it is still kept in the log.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// A photo was sent with this message, even if its bytes were dropped.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub photo_attached: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub citations: Vec<Citation>,
}

impl ChatMessage {
    /// The greeting that opens the log.
    #[must_use]
    pub fn greeting() -> Self {
        Self::bot(GREETING, Vec::new())
    }

    #[must_use]
    pub fn user(text: impl Into<String>, image: Option<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
            photo_attached: image.is_some(),
            image,
            citations: Vec::new(),
        }
    }

    #[must_use]
    pub fn bot(text: impl Into<String>, citations: Vec<Citation>) -> Self {
        Self {
            role: ChatRole::Bot,
            text: text.into(),
            image: None,
            photo_attached: false,
            citations,
        }
    }

    #[must_use]
    pub fn is_user(&self) -> bool {
        self.role == ChatRole::User
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_greeting_is_from_bot() {
        let greeting = ChatMessage::greeting();
        assert!(!greeting.is_user());
        assert!(greeting.text.starts_with("Hello! I'm AquaBot."));
        assert!(!greeting.photo_attached);
    }

    #[test]
    fn test_user_message_with_photo() {
        let message = ChatMessage::user("What is this?", Some("data:image/png;base64,AA==".into()));
        assert!(message.is_user());
        assert!(message.photo_attached);

        let json = serde_json::to_value(&ChatMessage::user("hi", None)).unwrap();
        assert!(json.get("photo_attached").is_none());
        assert!(json.get("image").is_none());
    }
}
