//! Integration tests for the AquaBot consultant.

use std::time::Duration;

use aquacafe_integration_tests::{StandInGemini, TEST_API_KEY, TestContext};
use axum::http::StatusCode;
use reqwest::multipart::{Form, Part};
use serde_json::json;

const FALLBACK_FRAGMENT: &str = "having a little trouble seeing that plant";

fn answer() -> serde_json::Value {
    json!({
        "candidates": [{
            "content": {
                "role": "model",
                "parts": [{"text": "Crypt melt is normal after planting. "}, {"text": "Leave the roots in place."}]
            },
            "finishReason": "STOP",
            "groundingMetadata": {
                "groundingChunks": [
                    {"web": {"uri": "https://example.org/crypt-melt", "title": "Crypt melt explained"}},
                    {"web": {"uri": "https://example.org/untitled"}},
                    {"web": {"title": "No link"}}
                ]
            }
        }]
    })
}

fn png_part() -> Part {
    Part::bytes(vec![0x89, b'P', b'N', b'G'])
        .file_name("leaf.png")
        .mime_str("image/png")
        .expect("valid mime")
}

#[tokio::test]
async fn test_panel_starts_with_greeting() {
    let ctx = TestContext::start().await;
    let (status, panel) = ctx.get("/consultant").await;
    assert_eq!(status, StatusCode::OK);
    assert!(panel.contains("Send me a photo of your plants"));
    assert!(panel.contains("hx-disabled-elt"));
}

#[tokio::test]
async fn test_consultation_forwards_cart_and_returns_citations() {
    let gemini = StandInGemini::replying(answer()).await;
    let ctx = TestContext::with_gemini(&gemini, Duration::from_secs(5)).await;
    ctx.post_form("/cart/add", &[("product_id", "2")]).await;
    ctx.post_form("/cart/add", &[("product_id", "1")]).await;

    let form = Form::new().text("prompt", "My crypt is melting, help?");
    let (status, messages) = ctx.post_multipart("/consultant", form).await;
    assert_eq!(status, StatusCode::OK);
    assert!(messages.contains("My crypt is melting, help?"));
    assert!(messages.contains("Crypt melt is normal after planting. Leave the roots in place."));
    assert!(messages.contains("https://example.org/crypt-melt"));
    assert!(messages.contains("Crypt melt explained"));
    assert!(messages.contains(">Source<"));
    assert!(!messages.contains("No link"));

    let requests = gemini.requests().await;
    assert_eq!(requests.len(), 1);
    let request = requests.first().expect("one request");
    assert_eq!(request.call, "gemini-3-flash-preview:generateContent");
    assert_eq!(request.api_key.as_deref(), Some(TEST_API_KEY));
    assert_eq!(
        request.body["contents"][0]["parts"][0]["text"],
        "My crypt is melting, help?"
    );
    let instruction = request.body["systemInstruction"]["parts"][0]["text"]
        .as_str()
        .expect("system instruction text");
    assert!(instruction.contains("Current user cart: [Java Fern, Anubias Nana]."));
    assert_eq!(request.body["tools"][0]["googleSearch"], json!({}));
    let temperature = request.body["generationConfig"]["temperature"]
        .as_f64()
        .expect("temperature");
    assert!((temperature - 0.7).abs() < 1e-6);

    // The exchange is kept in the session log.
    let (_, panel) = ctx.get("/consultant").await;
    assert!(panel.contains("My crypt is melting, help?"));
}

#[tokio::test]
async fn test_image_only_consultation() {
    let gemini = StandInGemini::replying(answer()).await;
    let ctx = TestContext::with_gemini(&gemini, Duration::from_secs(5)).await;

    let form = Form::new().text("prompt", "").part("image", png_part());
    let (status, messages) = ctx.post_multipart("/consultant", form).await;
    assert_eq!(status, StatusCode::OK);
    assert!(messages.contains("Analyzing this image..."));
    assert!(messages.contains("data:image/png;base64,iVBORw=="));

    let requests = gemini.requests().await;
    let body = &requests.first().expect("one request").body;
    assert_eq!(
        body["contents"][0]["parts"][0]["text"],
        "Identify this plant and provide care tips."
    );
    assert_eq!(body["contents"][0]["parts"][1]["inlineData"]["mimeType"], "image/png");
    assert_eq!(body["contents"][0]["parts"][1]["inlineData"]["data"], "iVBORw==");
}

#[tokio::test]
async fn test_non_image_upload_is_ignored() {
    let gemini = StandInGemini::replying(answer()).await;
    let ctx = TestContext::with_gemini(&gemini, Duration::from_secs(5)).await;

    let notes = Part::bytes(b"just some notes".to_vec())
        .file_name("notes.txt")
        .mime_str("text/plain")
        .expect("valid mime");
    let form = Form::new().text("prompt", "   ").part("image", notes);
    let (status, messages) = ctx.post_multipart("/consultant", form).await;

    // Blank prompt and no usable photo: nothing happens.
    assert_eq!(status, StatusCode::OK);
    assert!(messages.contains("Send me a photo of your plants"));
    assert!(!messages.contains("Analyzing this image..."));
    assert!(gemini.requests().await.is_empty());
}

#[tokio::test]
async fn test_text_with_non_image_upload_sends_text_only() {
    let gemini = StandInGemini::replying(answer()).await;
    let ctx = TestContext::with_gemini(&gemini, Duration::from_secs(5)).await;

    let notes = Part::bytes(b"%PDF-1.7".to_vec())
        .file_name("care.pdf")
        .mime_str("application/pdf")
        .expect("valid mime");
    let form = Form::new()
        .text("prompt", "Is this enough light?")
        .part("image", notes);
    ctx.post_multipart("/consultant", form).await;

    let requests = gemini.requests().await;
    let parts = requests.first().expect("one request").body["contents"][0]["parts"]
        .as_array()
        .expect("parts")
        .len();
    assert_eq!(parts, 1);
}

#[tokio::test]
async fn test_upstream_error_falls_back() {
    let gemini = StandInGemini::failing(StatusCode::INTERNAL_SERVER_ERROR).await;
    let ctx = TestContext::with_gemini(&gemini, Duration::from_secs(5)).await;

    let form = Form::new().text("prompt", "Why are my leaves yellow?");
    let (status, messages) = ctx.post_multipart("/consultant", form).await;
    assert_eq!(status, StatusCode::OK);
    assert!(messages.contains("Why are my leaves yellow?"));
    assert!(messages.contains(FALLBACK_FRAGMENT));
    assert_eq!(gemini.requests().await.len(), 1);
}

#[tokio::test]
async fn test_upstream_timeout_falls_back() {
    let gemini = StandInGemini::slow(answer(), Duration::from_secs(3)).await;
    let ctx = TestContext::with_gemini(&gemini, Duration::from_secs(1)).await;

    let form = Form::new().text("prompt", "Still there?");
    let (status, messages) = ctx.post_multipart("/consultant", form).await;
    assert_eq!(status, StatusCode::OK);
    assert!(messages.contains(FALLBACK_FRAGMENT));
    assert!(!messages.contains("Crypt melt is normal"));
}

#[tokio::test]
async fn test_empty_answer_falls_back() {
    let gemini = StandInGemini::replying(json!({"candidates": []})).await;
    let ctx = TestContext::with_gemini(&gemini, Duration::from_secs(5)).await;

    let form = Form::new().text("prompt", "Hello?");
    let (_, messages) = ctx.post_multipart("/consultant", form).await;
    assert!(messages.contains(FALLBACK_FRAGMENT));
}

#[tokio::test]
async fn test_missing_key_falls_back() {
    let ctx = TestContext::start().await;
    let form = Form::new().text("prompt", "Do anubias need CO2?");
    let (status, messages) = ctx.post_multipart("/consultant", form).await;
    assert_eq!(status, StatusCode::OK);
    assert!(messages.contains(FALLBACK_FRAGMENT));
}

fn png_of_size(bytes: usize) -> Part {
    let mut data = vec![0x89, b'P', b'N', b'G'];
    data.resize(bytes, 0);
    Part::bytes(data)
        .file_name("tank.png")
        .mime_str("image/png")
        .expect("valid mime")
}

#[tokio::test]
async fn test_large_photos_are_not_kept_in_the_log() {
    let ctx = TestContext::start().await;

    for _ in 0..3 {
        let form = Form::new()
            .text("prompt", "")
            .part("image", png_of_size(2 * 1024 * 1024));
        let (status, _) = ctx.post_multipart("/consultant", form).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, panel) = ctx.get("/consultant").await;
    assert_eq!(status, StatusCode::OK);
    assert!(panel.len() < 64 * 1024, "panel is {} bytes", panel.len());
    assert!(!panel.contains("data:image/png"));
    assert_eq!(panel.matches("Photo attached").count(), 3);
    assert_eq!(panel.matches("Analyzing this image...").count(), 3);
}

#[tokio::test]
async fn test_only_the_newest_small_photo_is_shown() {
    let ctx = TestContext::start().await;

    for _ in 0..2 {
        let form = Form::new().text("prompt", "").part("image", png_part());
        ctx.post_multipart("/consultant", form).await;
    }

    let (_, panel) = ctx.get("/consultant").await;
    assert_eq!(panel.matches("data:image/png;base64,iVBORw==").count(), 1);
    assert_eq!(panel.matches("Photo attached").count(), 1);
}

#[tokio::test]
async fn test_upload_over_body_limit_is_rejected() {
    let gemini = StandInGemini::replying(answer()).await;
    let ctx = TestContext::with_gemini(&gemini, Duration::from_secs(5)).await;

    let form = Form::new().text("prompt", "Is my sword plant healthy?");
    ctx.post_multipart("/consultant", form).await;
    let (_, before) = ctx.get("/consultant").await;

    let form = Form::new()
        .text("prompt", "And this one?")
        .part("image", png_of_size(9 * 1024 * 1024));
    let (status, _) = ctx.post_multipart("/consultant", form).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);

    let (_, after) = ctx.get("/consultant").await;
    assert_eq!(after, before);
    assert!(!after.contains("And this one?"));
    assert_eq!(gemini.requests().await.len(), 1);
}
