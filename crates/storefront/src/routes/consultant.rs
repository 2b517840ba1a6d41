//! AquaBot consultant route handlers.
//!
//! The panel posts a multipart form (`prompt` text plus an optional `image`
//! file). Each exchange appends the shopper's message and AquaBot's reply to
//! the session chat log, and the updated message list is swapped back in.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Multipart, State};
use tracing::instrument;

use crate::error::Result;
use crate::models::{ChatMessage, StorefrontSession};
use crate::services::{ConsultationRequest, InlineImage};
use crate::state::AppState;

/// Bubble text when the shopper sends only a photo.
pub const IMAGE_ONLY_MESSAGE: &str = "Analyzing this image...";

/// Question asked upstream when the shopper sends only a photo.
pub const DEFAULT_IMAGE_PROMPT: &str = "Identify this plant and provide care tips.";

/// Consultant panel fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/consultant.html")]
pub struct ConsultantPanelTemplate {
    pub messages: Vec<ChatMessage>,
}

/// Consultant message list fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/consultation_messages.html")]
pub struct ConsultationMessagesTemplate {
    pub messages: Vec<ChatMessage>,
}

/// What came in on the consultant form.
#[derive(Debug, Default)]
struct ConsultationForm {
    prompt: String,
    image: Option<InlineImage>,
}

impl ConsultationForm {
    /// Read the multipart body. Unknown fields and non-image files are dropped.
    async fn read(mut multipart: Multipart) -> Result<Self> {
        let mut form = Self::default();
        while let Some(field) = multipart.next_field().await? {
            let name = field.name().map(str::to_owned);
            match name.as_deref() {
                Some("prompt") => form.prompt = field.text().await?.trim().to_owned(),
                Some("image") => {
                    let mime_type = field.content_type().map(str::to_owned);
                    let data = field.bytes().await?;
                    form.image = InlineImage::accept(mime_type.as_deref(), data.to_vec());
                    if form.image.is_none() && !data.is_empty() {
                        tracing::debug!(mime_type = ?mime_type, "Ignoring non-image upload");
                    }
                }
                _ => {}
            }
        }
        Ok(form)
    }

    fn is_empty(&self) -> bool {
        self.prompt.is_empty() && self.image.is_none()
    }
}

/// Display the consultant panel with the session's chat log.
///
/// # Errors
///
/// Returns an error if the session store fails.
#[instrument(skip(session))]
pub async fn panel(session: StorefrontSession) -> Result<ConsultantPanelTemplate> {
    Ok(ConsultantPanelTemplate {
        messages: session.consultation_log().await?,
    })
}

/// Ask AquaBot a question, optionally with a photo.
///
/// An empty prompt without an accepted photo leaves the log untouched.
/// Consultation failures are never errors here: the reply is the fallback
/// text instead.
///
/// # Errors
///
/// Returns an error if the upload cannot be read or the session store fails.
#[instrument(skip(state, session, multipart))]
pub async fn ask(
    State(state): State<AppState>,
    session: StorefrontSession,
    multipart: Multipart,
) -> Result<ConsultationMessagesTemplate> {
    let form = ConsultationForm::read(multipart).await?;
    if form.is_empty() {
        return Ok(ConsultationMessagesTemplate {
            messages: session.consultation_log().await?,
        });
    }

    let (shown, asked) = if form.prompt.is_empty() {
        (IMAGE_ONLY_MESSAGE.to_owned(), DEFAULT_IMAGE_PROMPT.to_owned())
    } else {
        (form.prompt.clone(), form.prompt)
    };
    let question = ChatMessage::user(shown, form.image.as_ref().map(InlineImage::to_data_url));

    let cart = session.cart().await?;
    let answer = state
        .consultant()
        .consult(ConsultationRequest {
            prompt: asked,
            cart_items: cart.item_names(),
            image: form.image,
        })
        .await;

    let citations = answer
        .citations
        .into_iter()
        .filter(|c| c.uri.is_some())
        .collect();
    let messages = session
        .push_messages([question, ChatMessage::bot(answer.text, citations)])
        .await?;

    Ok(ConsultationMessagesTemplate { messages })
}
