use async_trait::async_trait;
use engai_types::{ChatReply, ErrorBody};
use reqwest::multipart::{Form, Part};
use thiserror::Error;
use tracing::debug;

use crate::store::OutboundTurn;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("server returned {status}: {message}")]
    Server { status: u16, message: String },
}

/// Delivers one turn and returns the assistant's text.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send(&self, turn: OutboundTurn) -> Result<String, TransportError>;
}

/// `POST {base}/chat` as multipart form data (`message`, `model`, optional `file`).
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    /// `base_url` is the API root, e.g. `http://localhost:5000/api`.
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            endpoint: format!("{}/chat", base_url.trim_end_matches('/')),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn build_form(turn: OutboundTurn) -> Result<Form, reqwest::Error> {
    let mut form = Form::new()
        .text("message", turn.message)
        .text("model", turn.model.as_form_value().to_owned());

    if let Some(attachment) = turn.attachment {
        let part = Part::bytes(attachment.bytes)
            .file_name(attachment.original_name)
            .mime_str(&attachment.mime_type)?;
        form = form.part("file", part);
    }
    Ok(form)
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn send(&self, turn: OutboundTurn) -> Result<String, TransportError> {
        debug!(
            endpoint = %self.endpoint,
            model = %turn.model,
            attachment = ?turn.attachment,
            "sending chat turn"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(build_form(turn)?)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            let reply: ChatReply = response.json().await?;
            return Ok(reply.text);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|b| b.error)
            .unwrap_or(body);
        Err(TransportError::Server {
            status: status.as_u16(),
            message,
        })
    }
}
