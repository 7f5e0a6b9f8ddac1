use utoipa::ToSchema;

/// Multipart form accepted by `POST /api/chat`.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct ChatForm {
    /// The user's question. May be empty when a file is attached.
    pub message: Option<String>,
    /// `flash` (default) or `pro`; any other value selects `flash`.
    pub model: Option<String>,
    /// One PDF or image. Other types are accepted and ignored.
    #[schema(value_type = Option<String>, format = Binary)]
    pub file: Option<Vec<u8>>,
}
