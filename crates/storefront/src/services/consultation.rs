//! AquaBot plant consultation.
//!
//! Packages a question, an optional photo and the shopper's cart into a
//! Gemini request and turns the answer into reply text plus citations.
//!
//! [`ConsultationService::consult`] never fails. Any problem on the way
//! (no API key, transport error, timeout, API error, empty answer) produces
//! [`FALLBACK_REPLY`] with no citations. There are no retries.

use base64::{Engine, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::config::GeminiConfig;
use crate::gemini::{
    Content, GeminiClient, GeminiError, GenerateContentRequest, GenerateContentResponse,
    GenerationConfig, InlineData, Part, Tool,
};

/// Reply shown whenever the consultation cannot be completed.
pub const FALLBACK_REPLY: &str = "I'm having a little trouble seeing that plant or connecting to my database. Could you describe it or try again?";

/// Sampling temperature for every consultation.
pub const TEMPERATURE: f32 = 0.7;

/// Title shown for a citation that has none.
const UNTITLED_SOURCE: &str = "Source";

/// A photo attached to a consultation.
#[derive(Debug, Clone)]
pub struct InlineImage {
    /// Declared content type, always `image/*`.
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl InlineImage {
    /// Accept an upload only if it declares an image type and is non-empty.
    #[must_use]
    pub fn accept(mime_type: Option<&str>, data: Vec<u8>) -> Option<Self> {
        let mime_type = mime_type?.trim().to_ascii_lowercase();
        if !mime_type.starts_with("image/") || mime_type.len() <= "image/".len() || data.is_empty()
        {
            return None;
        }
        Some(Self { mime_type, data })
    }

    /// Standard base64 of the bytes.
    #[must_use]
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.data)
    }

    /// `data:` URL for showing the photo back in the chat log.
    #[must_use]
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.to_base64())
    }
}

/// What the shopper asked.
#[derive(Debug, Clone)]
pub struct ConsultationRequest {
    pub prompt: String,
    /// Names of the products in the cart, in cart order.
    pub cart_items: Vec<String>,
    pub image: Option<InlineImage>,
}

/// A source the answer drew on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pub uri: Option<String>,
    pub title: Option<String>,
}

impl Citation {
    /// Title to show on the link.
    #[must_use]
    pub fn label(&self) -> &str {
        self.title
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(UNTITLED_SOURCE)
    }
}

/// What AquaBot answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Consultation {
    pub text: String,
    pub citations: Vec<Citation>,
}

impl Consultation {
    /// The reply used when anything goes wrong.
    #[must_use]
    pub fn fallback() -> Self {
        Self {
            text: FALLBACK_REPLY.to_string(),
            citations: Vec::new(),
        }
    }

    /// Extract reply text and citations from a Gemini response.
    ///
    /// # Errors
    ///
    /// Returns [`GeminiError::EmptyResponse`] if the first candidate has no
    /// text.
    pub fn from_response(response: &GenerateContentResponse) -> Result<Self, GeminiError> {
        let text = response.text().ok_or(GeminiError::EmptyResponse)?;
        let citations = response
            .grounding_chunks()
            .iter()
            .filter_map(|chunk| chunk.web.as_ref())
            .map(|web| Citation {
                uri: web.uri.clone(),
                title: web.title.clone(),
            })
            .collect();
        Ok(Self { text, citations })
    }
}

/// The fixed AquaBot persona with the shopper's cart spliced in.
#[must_use]
pub fn system_instruction(cart_items: &[String]) -> String {
    format!(
        "You are 'AquaBot', a world-class aquatic plant expert for AquaCafe.\n\
         Your goal is to help users select and care for aquatic plants.\n\
         Current user cart: [{}].\n\
         AquaCafe specializes in Anubias, Ferns, Crypts, and decorative plants.\n\
         If an image is provided, analyze the plant species, its health, and provide specific care \
         instructions or identify issues like algae or nutrient deficiencies.\n\
         Use Google Search for up-to-date species data.\n\
         Keep responses concise and professional.",
        cart_items.join(", ")
    )
}

/// Build the `generateContent` body for a consultation.
#[must_use]
pub fn build_request(request: &ConsultationRequest) -> GenerateContentRequest {
    let mut parts = vec![Part::text(request.prompt.clone())];
    if let Some(image) = &request.image {
        parts.push(Part::inline(InlineData {
            mime_type: image.mime_type.clone(),
            data: image.to_base64(),
        }));
    }

    GenerateContentRequest {
        contents: vec![Content::user(parts)],
        system_instruction: Some(Content::system(system_instruction(&request.cart_items))),
        tools: vec![Tool::google_search()],
        generation_config: Some(GenerationConfig {
            temperature: Some(TEMPERATURE),
        }),
    }
}

/// Plant consultation service.
///
/// Holds a Gemini client when an API key is configured; without one every
/// consultation answers with the fallback.
#[derive(Clone)]
pub struct ConsultationService {
    client: Option<GeminiClient>,
}

impl ConsultationService {
    /// Create the service from configuration.
    ///
    /// A missing or unusable API key is logged and leaves the service in
    /// fallback-only mode rather than failing startup.
    #[must_use]
    pub fn new(config: &GeminiConfig) -> Self {
        let client = match GeminiClient::new(config) {
            Ok(client) => {
                tracing::info!(model = client.model(), "AquaBot consultations enabled");
                Some(client)
            }
            Err(GeminiError::NotConfigured) => {
                tracing::warn!("GEMINI_API_KEY not set; AquaBot will answer with its fallback reply");
                None
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to create Gemini client; AquaBot disabled");
                None
            }
        };
        Self { client }
    }

    /// A service with no client, answering every request with the fallback.
    #[must_use]
    pub const fn disabled() -> Self {
        Self { client: None }
    }

    /// Whether requests are forwarded upstream.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.client.is_some()
    }

    /// Ask AquaBot. Always resolves.
    #[instrument(
        skip(self, request),
        fields(
            has_image = request.image.is_some(),
            cart_items = request.cart_items.len()
        )
    )]
    pub async fn consult(&self, request: ConsultationRequest) -> Consultation {
        match self.try_consult(&request).await {
            Ok(consultation) => {
                tracing::info!(
                    citations = consultation.citations.len(),
                    "Consultation answered"
                );
                consultation
            }
            Err(e) => {
                tracing::warn!(error = %e, "Consultation failed, using fallback reply");
                Consultation::fallback()
            }
        }
    }

    async fn try_consult(&self, request: &ConsultationRequest) -> Result<Consultation, GeminiError> {
        let client = self.client.as_ref().ok_or(GeminiError::NotConfigured)?;
        let response = client.generate_content(&build_request(request)).await?;
        Consultation::from_response(&response)
    }
}
