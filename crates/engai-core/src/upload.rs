//! Per-request temporary storage for uploaded files.

use std::io;
use std::path::{Path, PathBuf};

use engai_types::AttachmentKind;
use tracing::{debug, warn};
use uuid::Uuid;

/// An uploaded file written to disk for the lifetime of one request.
///
/// The file name is prefixed with a random UUID so concurrent requests never
/// collide. The file is deleted when the value is dropped, whichever way the
/// request ends.
#[derive(Debug)]
pub struct StagedUpload {
    path: PathBuf,
    mime_type: String,
    original_name: String,
}

impl StagedUpload {
    /// Write `bytes` under `dir` (created if missing).
    pub async fn stage(
        dir: &Path,
        original_name: &str,
        mime_type: &str,
        bytes: &[u8],
    ) -> io::Result<Self> {
        tokio::fs::create_dir_all(dir).await?;

        let path = dir.join(format!(
            "{}_{}",
            Uuid::new_v4(),
            sanitize_filename(original_name)
        ));
        // Constructed before the write so a partial file is cleaned up too.
        let upload = Self {
            path,
            mime_type: mime_type.to_owned(),
            original_name: original_name.to_owned(),
        };
        tokio::fs::write(&upload.path, bytes).await?;

        debug!(
            path = %upload.path.display(),
            original_name = %upload.original_name,
            mime_type = %upload.mime_type,
            size_bytes = bytes.len(),
            "staged upload"
        );
        Ok(upload)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn original_name(&self) -> &str {
        &self.original_name
    }

    pub fn kind(&self) -> AttachmentKind {
        AttachmentKind::from_mime(&self.mime_type)
    }

    pub async fn read(&self) -> io::Result<Vec<u8>> {
        tokio::fs::read(&self.path).await
    }
}

impl Drop for StagedUpload {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "removed staged upload"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!(
                path = %self.path.display(),
                error = %e,
                "failed to remove staged upload"
            ),
        }
    }
}

fn sanitize_filename(filename: &str) -> String {
    let cleaned: String = filename
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '.' || c == '_' || c == '-' { c } else { '_' })
        .collect();
    if cleaned.trim_matches('.').is_empty() {
        "upload".to_owned()
    } else {
        cleaned
    }
}
