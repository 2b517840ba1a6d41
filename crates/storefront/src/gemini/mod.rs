//! Google Gemini API integration for the plant consultant.
//!
//! Only the non-streaming `generateContent` endpoint is used: one user turn
//! (text plus an optional inline image), a system instruction, the Google
//! Search grounding tool and a fixed temperature.
//!
//! Callers in the web layer go through
//! [`ConsultationService`](crate::services::consultation::ConsultationService),
//! which turns every [`GeminiError`] into the fallback reply.

pub mod client;
pub mod error;
pub mod types;

pub use client::GeminiClient;
pub use error::GeminiError;
pub use types::{
    Candidate, Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    GroundingChunk, GroundingMetadata, InlineData, Part, Tool, WebSource,
};
