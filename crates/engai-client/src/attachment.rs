use std::io;
use std::path::Path;

use engai_types::{Attachment, AttachmentKind, PDF_MIME};

/// MIME type for `path`, judged by its extension.
pub fn guess_mime(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match ext.as_str() {
        "pdf" => PDF_MIME,
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "heic" => "image/heic",
        "txt" | "md" => "text/plain",
        _ => "application/octet-stream",
    }
}

/// Whether the chat picker offers this file (PDFs and images only).
pub fn is_accepted(attachment: &Attachment) -> bool {
    attachment.kind() != AttachmentKind::Unsupported
}

/// Read `path` into an [`Attachment`].
pub async fn load_attachment(path: &Path) -> io::Result<Attachment> {
    let bytes = tokio::fs::read(path).await?;
    let original_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_owned());
    Ok(Attachment::new(bytes, guess_mime(path), original_name))
}
