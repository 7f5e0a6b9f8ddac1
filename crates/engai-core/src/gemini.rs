//! Google Gemini `generateContent` client.
//!
//! All prompt parts travel in a single `user` content entry; text parts map
//! to `{"text": …}` and inline parts to `{"inlineData": {"mimeType", "data"}}`.
//! The reply text is the concatenation of the text parts of the first
//! candidate.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::ModelError;
use crate::model::GenerativeModel;
use crate::prompt::{PromptPart, PromptParts};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

const API_KEY_HEADER: &str = "x-goog-api-key";

// ── Wire types ────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: [RequestContent<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum RequestPart<'a> {
    Text {
        text: &'a str,
    },
    Inline {
        #[serde(rename = "inlineData")]
        inline_data: InlineData<'a>,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData<'a> {
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<ResponseContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

// ── Client ────────────────────────────────────────────────────────────────────

pub struct GeminiClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl GeminiClient {
    /// `timeout` bounds the whole call; `None` waits for the API indefinitely.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, ModelError> {
        let mut builder = Client::builder().connect_timeout(Duration::from_secs(10));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url: base_url.into(),
            api_key: api_key.into(),
        })
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            model
        )
    }
}

fn request_body(parts: &PromptParts) -> GenerateContentRequest<'_> {
    let parts = parts
        .iter()
        .map(|part| match part {
            PromptPart::Text(text) => RequestPart::Text { text: text.as_str() },
            PromptPart::InlineData { mime_type, data } => RequestPart::Inline {
                inline_data: InlineData {
                    mime_type: mime_type.as_str(),
                    data: data.as_str(),
                },
            },
        })
        .collect();
    GenerateContentRequest {
        contents: [RequestContent { role: "user", parts }],
    }
}

fn reply_text(response: GenerateContentResponse) -> Result<String, ModelError> {
    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or(ModelError::EmptyResponse)?;

    let texts: Vec<String> = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if texts.is_empty() {
        warn!(finish_reason = ?candidate.finish_reason, "candidate carried no text");
        return Err(ModelError::EmptyResponse);
    }
    Ok(texts.concat())
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    async fn generate(&self, model: &str, parts: &PromptParts) -> Result<String, ModelError> {
        info!(model, parts = parts.len(), "Gemini generateContent request");

        let response = self
            .client
            .post(self.endpoint(model))
            .header(API_KEY_HEADER, &self.api_key)
            .json(&request_body(parts))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ModelError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        let decoded: GenerateContentResponse = serde_json::from_slice(&bytes)?;
        let text = reply_text(decoded)?;
        debug!(model, text_len = text.len(), "Gemini reply received");
        Ok(text)
    }
}
