//! Business logic services for storefront.
//!
//! # Services
//!
//! - `consultation` - AquaBot plant consultant (wraps the Gemini client)

pub mod consultation;

pub use consultation::{
    Citation, Consultation, ConsultationRequest, ConsultationService, FALLBACK_REPLY, InlineImage,
};
