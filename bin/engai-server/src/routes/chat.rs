//! Chat route: one multipart request in, one model answer out.
//!
//! The optional `file` field is staged to disk under a random name for the
//! duration of the request and handed to the prompt assembler, which removes
//! it again however the call ends.

use std::sync::Arc;

use axum::extract::multipart::Field;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::routing::post;
use axum::{Json, Router};
use engai_core::{PromptRequest, StagedUpload};
use engai_types::{ChatReply, ErrorBody, ModelTier};
use tracing::{debug, info};
use utoipa::OpenApi;

use crate::config::Config;
use crate::error::ServerError;
use crate::schemas::chat::ChatForm;
use crate::state::AppState;

/// Room for the text fields and multipart framing on top of the file itself.
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

#[derive(OpenApi)]
#[openapi(paths(chat), components(schemas(ChatForm, ChatReply, ErrorBody)))]
pub struct ChatApi;

/// Register chat routes (nested under `/api`).
pub fn router(max_upload_bytes: usize) -> Router<Arc<AppState>> {
    Router::new()
        .route("/chat", post(chat))
        .layer(DefaultBodyLimit::max(max_upload_bytes.saturating_add(FORM_OVERHEAD_BYTES)))
}

/// Fields of one chat form, with the file already staged.
#[derive(Debug, Default)]
struct ChatFields {
    message: Option<String>,
    model: Option<String>,
    file: Option<StagedUpload>,
}

/// Ask the engineering assistant a question (`POST /api/chat`).
///
/// `message` may be empty when a file is attached. PDFs contribute their
/// extracted text, images are sent to the model inline, and other file
/// types are ignored. Every failure past the upload boundary returns the
/// same generic 500 body.
#[utoipa::path(
    post,
    path = "/api/chat",
    tag = "chat",
    request_body(content = ChatForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Model answer", body = ChatReply),
        (status = 400, description = "Malformed form or file too large", body = ErrorBody),
        (status = 500, description = "Extraction or model failure", body = ErrorBody),
    )
)]
pub async fn chat(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<ChatReply>, ServerError> {
    let fields = read_fields(&state.config, &mut multipart).await?;

    let request = PromptRequest {
        user_text: fields.message.unwrap_or_default(),
        model_tier: ModelTier::from_form_value(fields.model.as_deref()),
        attachment: fields.file,
    };
    debug!(
        model_tier = %request.model_tier,
        message_len = request.user_text.len(),
        attachment = ?request.attachment.as_ref().map(|a| a.original_name()),
        "chat request"
    );

    let text = state.assembler.build_and_invoke(request).await?;

    info!(output_len = text.len(), "chat completion done");
    Ok(Json(ChatReply { text }))
}

async fn read_fields(config: &Config, multipart: &mut Multipart) -> Result<ChatFields, ServerError> {
    let mut fields = ChatFields::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::BadRequest(format!("Failed to read multipart field: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_owned();
        match name.as_str() {
            "message" => fields.message = Some(read_text(field).await?),
            "model" => fields.model = Some(read_text(field).await?),
            "file" => {
                if fields.file.is_some() {
                    return Err(ServerError::BadRequest("Only one file may be attached".into()));
                }
                fields.file = stage_file(config, field).await?;
            }
            other => debug!(field = %other, "ignoring unknown form field"),
        }
    }

    Ok(fields)
}

async fn read_text(field: Field<'_>) -> Result<String, ServerError> {
    field
        .text()
        .await
        .map_err(|e| ServerError::BadRequest(format!("Failed to read form field: {e}")))
}

/// Stream the file field into memory, enforcing the upload limit, then stage
/// it on disk. An empty field without a name (no file chosen) is `None`.
async fn stage_file(config: &Config, mut field: Field<'_>) -> Result<Option<StagedUpload>, ServerError> {
    let original_name = field.file_name().unwrap_or_default().to_owned();
    let mime_type = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_owned();
    let max_bytes = config.max_upload_bytes();

    let mut bytes: Vec<u8> = Vec::new();
    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| ServerError::BadRequest(format!("Failed to read file chunk: {e}")))?
    {
        bytes.extend_from_slice(&chunk);
        if bytes.len() > max_bytes {
            return Err(ServerError::BadRequest(format!(
                "File too large: exceeds maximum of {}MB",
                config.max_upload_mb
            )));
        }
    }

    if bytes.is_empty() && original_name.is_empty() {
        return Ok(None);
    }

    let name = if original_name.is_empty() { "upload" } else { &original_name };
    let upload = StagedUpload::stage(&config.upload_dir, name, &mime_type, &bytes).await?;
    info!(
        original_name = %upload.original_name(),
        mime_type = %upload.mime_type(),
        size_bytes = bytes.len(),
        "received file upload"
    );
    Ok(Some(upload))
}
