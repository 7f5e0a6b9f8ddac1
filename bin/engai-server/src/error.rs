//! Unified server error type.
//!
//! Every handler returns `Result<T, ServerError>`, which implements
//! [`axum::response::IntoResponse`] so errors are automatically converted
//! to a JSON `{"error": …}` body with an appropriate status code.
//!
//! Prompt-pipeline failures are logged with full detail and then collapsed
//! into a single generic message, whatever their cause.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use engai_core::CoreError;
use engai_types::{ErrorBody, SERVER_FAILURE};
use thiserror::Error;
use tracing::error;

/// All errors that can occur in the engai-server request lifecycle.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Extraction, staged-file or model failure inside the prompt pipeline.
    #[error("chat pipeline error: {0}")]
    Chat(#[from] CoreError),

    /// Malformed multipart body or an upload over the size limit.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// An unclassified internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, client_message) = match &self {
            ServerError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
            ServerError::Chat(e) => {
                error!(error = %e, "failed to process chat request");
                (StatusCode::INTERNAL_SERVER_ERROR, SERVER_FAILURE.to_owned())
            }
            ServerError::Internal(m) => {
                error!(message = %m, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, SERVER_FAILURE.to_owned())
            }
        };
        (status, Json(ErrorBody { error: client_message })).into_response()
    }
}

impl From<std::io::Error> for ServerError {
    fn from(e: std::io::Error) -> Self {
        ServerError::Internal(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engai_core::ModelError;
    use http_body_util::BodyExt;

    async fn body_of(err: ServerError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn pipeline_failures_are_undifferentiated() {
        let quota = ServerError::Chat(CoreError::Model(ModelError::Status {
            status: 429,
            body: "RESOURCE_EXHAUSTED".into(),
        }));
        let parse = ServerError::Chat(CoreError::Extraction("bad xref table".into()));

        for err in [quota, parse] {
            let (status, body) = body_of(err).await;
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(body, serde_json::json!({ "error": "Failed to process request" }));
        }
    }

    #[tokio::test]
    async fn internal_detail_is_not_leaked() {
        let (status, body) = body_of(ServerError::Internal("/var/tmp/engai: EACCES".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body["error"].as_str().unwrap().contains("EACCES"));
    }

    #[tokio::test]
    async fn bad_request_message_is_exposed() {
        let (status, body) = body_of(ServerError::BadRequest("file too large".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "file too large");
    }
}
