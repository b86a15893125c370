//! Generation dispatcher: one `generateContent` call to the Gemini image
//! endpoint per submit, plus interpretation of the structured response as
//! either a styled portrait or a refusal.

use std::time::Duration;

use base64::{engine::general_purpose, Engine as _};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::config::CONFIG;
use crate::llm::media::PortraitImage;
use crate::prompt::compile_instruction;
use crate::session::SelectionState;
use crate::utils::http::get_http_client;

/// Portrait orientation matching the studio's display frame.
const STUDIO_ASPECT_RATIO: &str = "3:4";

/// Everything needed for one generation. Ephemeral; assembled per submit.
#[derive(Debug)]
pub struct GenerationRequest<'a> {
    pub primary: &'a PortraitImage,
    pub smile_reference: Option<&'a PortraitImage>,
    pub selection: &'a SelectionState,
}

/// A styled portrait returned by the model.
#[derive(Debug, Clone)]
pub struct GeneratedImage {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl GeneratedImage {
    pub fn to_data_uri(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime_type,
            general_purpose::STANDARD.encode(&self.bytes)
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("API key is missing. Set GEMINI_API_KEY before launching a studio shoot.")]
    MissingApiKey,
    #[error("The model declined to generate the image: {0}")]
    Declined(String),
    #[error("No image data was found in the response. This often happens if the input photo is unclear or triggers safety filters.")]
    EmptyResponse,
    #[error("Image generation request failed: {0}")]
    Request(String),
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<GeminiCandidate>>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiContent {
    parts: Option<Vec<GeminiPart>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GeminiPart {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: GeminiInlineData,
    },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiInlineData {
    mime_type: String,
    data: String,
}

fn redact_api_key(text: &str) -> String {
    let key = CONFIG.gemini_api_key.trim();
    if key.is_empty() {
        return text.to_string();
    }
    text.replace(key, "[redacted]")
}

fn truncate_for_log(value: &str, limit: usize) -> String {
    if value.chars().count() <= limit {
        return value.to_string();
    }
    let truncated: String = value.chars().take(limit).collect();
    format!("{truncated}... (truncated)")
}

fn summarize_error_body(body: &str) -> (Option<String>, String) {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return (None, "empty response body".to_string());
    }

    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        let message = value
            .pointer("/error/message")
            .and_then(|v| v.as_str())
            .map(|v| v.to_string());
        return (message, truncate_for_log(&value.to_string(), 2000));
    }

    (None, truncate_for_log(trimmed, 2000))
}

fn build_safety_settings() -> Vec<Value> {
    let profile = CONFIG.gemini_safety_settings.as_str();
    let threshold = match profile {
        "standard" => "BLOCK_MEDIUM_AND_ABOVE",
        "permissive" => "OFF",
        _ => {
            warn!(
                "Unknown GEMINI_SAFETY_SETTINGS value '{}', using permissive defaults.",
                profile
            );
            "OFF"
        }
    };

    vec![
        json!({ "category": "HARM_CATEGORY_HARASSMENT", "threshold": threshold }),
        json!({ "category": "HARM_CATEGORY_HATE_SPEECH", "threshold": threshold }),
        json!({ "category": "HARM_CATEGORY_SEXUALLY_EXPLICIT", "threshold": threshold }),
        json!({ "category": "HARM_CATEGORY_DANGEROUS_CONTENT", "threshold": threshold }),
        json!({ "category": "HARM_CATEGORY_CIVIC_INTEGRITY", "threshold": threshold }),
    ]
}

fn inline_data_part(image: &PortraitImage) -> Value {
    json!({
        "inlineData": {
            "mimeType": image.mime_type,
            "data": general_purpose::STANDARD.encode(&image.bytes)
        }
    })
}

/// Request parts in wire order: primary portrait, optional smile reference,
/// then the compiled instruction text.
fn build_request_parts(
    primary: &PortraitImage,
    smile_reference: Option<&PortraitImage>,
    instruction: &str,
) -> Vec<Value> {
    let mut parts = vec![inline_data_part(primary)];
    if let Some(smile) = smile_reference {
        parts.push(inline_data_part(smile));
    }
    parts.push(json!({ "text": instruction }));
    parts
}

fn summarize_request_parts(parts: &[Value]) -> Vec<Value> {
    parts
        .iter()
        .map(|part| {
            if let Some(text) = part.get("text").and_then(|value| value.as_str()) {
                json!({ "text": truncate_for_log(text, 200) })
            } else if let Some(inline_data) = part.get("inlineData") {
                let mime_type = inline_data
                    .get("mimeType")
                    .and_then(|value| value.as_str())
                    .unwrap_or("unknown");
                let data_len = inline_data
                    .get("data")
                    .and_then(|value| value.as_str())
                    .map(|value| value.len())
                    .unwrap_or(0);
                json!({ "inlineData": { "mimeType": mime_type, "dataLen": data_len } })
            } else {
                json!({ "unknownPart": true })
            }
        })
        .collect()
}

fn summarize_response(response: &GeminiResponse) -> Value {
    let mut text_parts = 0usize;
    let mut image_parts = 0usize;
    let mut text_preview = None;

    let candidates = response.candidates.as_deref().unwrap_or(&[]);
    for candidate in candidates {
        let Some(parts) = candidate.content.as_ref().and_then(|c| c.parts.as_ref()) else {
            continue;
        };
        for part in parts {
            match part {
                GeminiPart::Text { text } => {
                    text_parts += 1;
                    if text_preview.is_none() && !text.trim().is_empty() {
                        text_preview = Some(truncate_for_log(text, 200));
                    }
                }
                GeminiPart::InlineData { inline_data } => {
                    if inline_data.mime_type.starts_with("image/") {
                        image_parts += 1;
                    }
                }
            }
        }
    }

    json!({
        "candidates": candidates.len(),
        "textParts": text_parts,
        "imageParts": image_parts,
        "textPreview": text_preview
    })
}

/// Applies the success/refusal decision rule to a response.
///
/// The first image part wins regardless of any accompanying text. With no
/// image, returned text is treated as a refusal explanation; with neither,
/// the generic empty-response diagnosis applies.
fn resolve_response(response: GeminiResponse) -> Result<GeneratedImage, GenerationError> {
    let mut refusal = String::new();

    for candidate in response.candidates.unwrap_or_default() {
        let Some(parts) = candidate.content.and_then(|content| content.parts) else {
            continue;
        };
        for part in parts {
            match part {
                GeminiPart::InlineData { inline_data }
                    if inline_data.mime_type.starts_with("image/") =>
                {
                    let bytes = general_purpose::STANDARD
                        .decode(inline_data.data)
                        .map_err(|err| {
                            GenerationError::Request(format!(
                                "Response image payload could not be decoded: {err}"
                            ))
                        })?;
                    return Ok(GeneratedImage {
                        bytes,
                        mime_type: inline_data.mime_type,
                    });
                }
                GeminiPart::Text { text } => refusal.push_str(&text),
                GeminiPart::InlineData { .. } => {}
            }
        }
    }

    if refusal.trim().is_empty() {
        Err(GenerationError::EmptyResponse)
    } else {
        Err(GenerationError::Declined(refusal.trim().to_string()))
    }
}

async fn call_generate_content(
    model: &str,
    payload: Value,
) -> Result<GeminiResponse, GenerationError> {
    let client = get_http_client();
    let url = format!(
        "https://generativelanguage.googleapis.com/v1beta/models/{model}:generateContent"
    );

    let response = client
        .post(&url)
        .header("x-goog-api-key", CONFIG.gemini_api_key.trim())
        .timeout(Duration::from_secs(CONFIG.gemini_request_timeout_seconds))
        .json(&payload)
        .send()
        .await
        .map_err(|err| {
            let err_text = redact_api_key(&err.to_string());
            warn!(
                "Gemini request failed to send: {} (timeout={}, connect={})",
                err_text,
                err.is_timeout(),
                err.is_connect()
            );
            GenerationError::Request(err_text)
        })?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let (message, body_summary) = summarize_error_body(&body);
        warn!("Gemini API error: status={}, body={}", status, body_summary);
        let detail = message.unwrap_or(body_summary);
        return Err(GenerationError::Request(format!(
            "status {status}: {}",
            redact_api_key(&detail)
        )));
    }

    let parsed = response
        .json::<GeminiResponse>()
        .await
        .map_err(|err| GenerationError::Request(redact_api_key(&err.to_string())))?;
    if tracing::enabled!(tracing::Level::DEBUG) {
        debug!(target: "studio.gemini", model = model, response = %summarize_response(&parsed));
    }
    Ok(parsed)
}

/// Dispatches one styled-portrait generation.
///
/// Fails fast when no API key is configured. The smile reference is only
/// attached when it participates per the selection (smile expression,
/// ancient mode inactive); callers may pass it unconditionally.
pub async fn generate_styled_portrait(
    request: &GenerationRequest<'_>,
) -> Result<GeneratedImage, GenerationError> {
    if CONFIG.gemini_api_key.trim().is_empty() {
        return Err(GenerationError::MissingApiKey);
    }

    let smile_reference = request.smile_reference.filter(|_| {
        !request.selection.styling_mode().is_ancient()
            && request.selection.expression.id == "smile"
    });

    let instruction = compile_instruction(request.selection, smile_reference.is_some());
    let parts = build_request_parts(request.primary, smile_reference, &instruction);

    if tracing::enabled!(tracing::Level::DEBUG) {
        debug!(
            target: "studio.gemini",
            parts = %serde_json::Value::Array(summarize_request_parts(&parts))
        );
    }

    let payload = json!({
        "contents": [{ "role": "user", "parts": parts }],
        "generationConfig": {
            "responseModalities": ["TEXT", "IMAGE"],
            "imageConfig": { "aspectRatio": STUDIO_ASPECT_RATIO }
        },
        "safetySettings": build_safety_settings(),
    });

    let response = call_generate_content(&CONFIG.gemini_image_model, payload).await?;
    resolve_response(response)
}
