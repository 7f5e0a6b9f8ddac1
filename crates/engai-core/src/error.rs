use thiserror::Error;

/// Failures of a single prompt-assembly + model-invocation pass.
///
/// Callers at the HTTP boundary fold every variant into one generic
/// failure; the variants exist for logging.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The PDF parser rejected the document.
    #[error("PDF text extraction failed: {0}")]
    Extraction(String),

    /// The staged upload could not be read back from disk.
    #[error("failed to read staged upload: {0}")]
    Attachment(#[from] std::io::Error),

    #[error("model invocation failed: {0}")]
    Model(#[from] ModelError),
}

/// Errors reported by a [`GenerativeModel`](crate::GenerativeModel).
#[derive(Debug, Error)]
pub enum ModelError {
    /// Network, TLS or timeout failure.
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a non-2xx status (quota, auth, bad input…).
    #[error("model API returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The reply carried no text (e.g. blocked by a safety filter).
    #[error("model returned no text")]
    EmptyResponse,

    #[error("failed to decode model response: {0}")]
    Decode(#[from] serde_json::Error),
}
