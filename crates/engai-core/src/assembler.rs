//! Request → prompt parts → model call → reply text.

use std::sync::Arc;

use engai_types::{AttachmentKind, ModelTier};
use tracing::{debug, info};

use crate::error::CoreError;
use crate::extract::TextExtractor;
use crate::model::{GenerativeModel, ModelCatalog};
use crate::prompt::PromptParts;
use crate::upload::StagedUpload;

/// One chat request, alive for the duration of a single call.
#[derive(Debug)]
pub struct PromptRequest {
    pub user_text: String,
    pub model_tier: ModelTier,
    pub attachment: Option<StagedUpload>,
}

/// Stateless prompt pipeline; safe to share across concurrent requests.
#[derive(Clone)]
pub struct PromptAssembler {
    model: Arc<dyn GenerativeModel>,
    extractor: Arc<dyn TextExtractor>,
    catalog: ModelCatalog,
}

impl std::fmt::Debug for PromptAssembler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptAssembler")
            .field("catalog", &self.catalog)
            .finish_non_exhaustive()
    }
}

impl PromptAssembler {
    pub fn new(
        model: Arc<dyn GenerativeModel>,
        extractor: Arc<dyn TextExtractor>,
        catalog: ModelCatalog,
    ) -> Self {
        Self {
            model,
            extractor,
            catalog,
        }
    }

    pub fn catalog(&self) -> &ModelCatalog {
        &self.catalog
    }

    /// Build the ordered model input for `request`.
    ///
    /// PDFs contribute their extracted text, images their bytes inline; any
    /// other attachment type is skipped. Extraction and read failures abort
    /// the whole request.
    pub async fn assemble(&self, request: &PromptRequest) -> Result<PromptParts, CoreError> {
        let mut parts = PromptParts::begin();

        if let Some(upload) = &request.attachment {
            match upload.kind() {
                AttachmentKind::Pdf => {
                    let bytes = upload.read().await?;
                    let text = self.extractor.extract_text(bytes).await?;
                    parts.push_pdf_context(&text);
                }
                AttachmentKind::Image => {
                    let bytes = upload.read().await?;
                    parts.push_inline(upload.mime_type(), &bytes);
                }
                AttachmentKind::Unsupported => {
                    debug!(
                        mime_type = %upload.mime_type(),
                        original_name = %upload.original_name(),
                        "attachment type not used in prompts; skipping"
                    );
                }
            }
        }

        Ok(parts.finish(&request.user_text))
    }

    /// Assemble `request`, run it through the model for its tier and return
    /// the reply text.
    ///
    /// Takes the request by value: the staged upload is deleted before this
    /// returns, on success and on every error path.
    pub async fn build_and_invoke(&self, request: PromptRequest) -> Result<String, CoreError> {
        let model = self.catalog.resolve(request.model_tier);
        let result = self.invoke(model, &request).await;
        drop(request);
        result
    }

    async fn invoke(&self, model: &str, request: &PromptRequest) -> Result<String, CoreError> {
        let parts = self.assemble(request).await?;
        info!(
            model,
            parts = parts.len(),
            attachment = request.attachment.as_ref().map(|a| a.original_name()),
            "invoking model"
        );
        Ok(self.model.generate(model, &parts).await?)
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;

    use super::*;
    use crate::error::ModelError;
    use crate::prompt::{PromptPart, SYSTEM_INSTRUCTION};

    #[derive(Default)]
    struct RecordingModel {
        calls: Mutex<Vec<(String, PromptParts)>>,
        fail: bool,
    }

    #[async_trait]
    impl GenerativeModel for RecordingModel {
        async fn generate(&self, model: &str, parts: &PromptParts) -> Result<String, ModelError> {
            self.calls.lock().unwrap().push((model.to_owned(), parts.clone()));
            if self.fail {
                Err(ModelError::Status { status: 503, body: "unavailable".into() })
            } else {
                Ok("$$2+2=4$$".into())
            }
        }
    }

    struct StubExtractor(Result<&'static str, &'static str>);

    #[async_trait]
    impl TextExtractor for StubExtractor {
        async fn extract_text(&self, _pdf_bytes: Vec<u8>) -> Result<String, CoreError> {
            self.0
                .map(str::to_owned)
                .map_err(|e| CoreError::Extraction(e.to_owned()))
        }
    }

    fn assembler(model: Arc<RecordingModel>, extractor: StubExtractor) -> PromptAssembler {
        PromptAssembler::new(model, Arc::new(extractor), ModelCatalog::new("fast-m", "advanced-m"))
    }

    fn ok_assembler() -> (Arc<RecordingModel>, PromptAssembler) {
        let model = Arc::new(RecordingModel::default());
        (model.clone(), assembler(model, StubExtractor(Ok("beam length 4 m"))))
    }

    async fn staged(dir: &Path, name: &str, mime: &str, bytes: &[u8]) -> (PathBuf, StagedUpload) {
        let upload = StagedUpload::stage(dir, name, mime, bytes).await.unwrap();
        (upload.path().to_path_buf(), upload)
    }

    fn request(text: &str, attachment: Option<StagedUpload>) -> PromptRequest {
        PromptRequest {
            user_text: text.into(),
            model_tier: ModelTier::Fast,
            attachment,
        }
    }

    fn texts(parts: &PromptParts) -> Vec<Option<&str>> {
        parts.iter().map(PromptPart::as_text).collect()
    }

    #[tokio::test]
    async fn text_only_yields_instruction_then_question() {
        let (_, asm) = ok_assembler();
        let parts = asm.assemble(&request("What is 2+2?", None)).await.unwrap();
        assert_eq!(
            texts(&parts),
            vec![Some(SYSTEM_INSTRUCTION), Some("User Question: What is 2+2?")]
        );
    }

    #[tokio::test]
    async fn pdf_context_sits_between_instruction_and_question() {
        let dir = tempfile::tempdir().unwrap();
        let (_, upload) = staged(dir.path(), "frame.pdf", "application/pdf", b"%PDF").await;
        let (_, asm) = ok_assembler();

        let parts = asm.assemble(&request("Deflection?", Some(upload))).await.unwrap();
        assert_eq!(
            texts(&parts),
            vec![
                Some(SYSTEM_INSTRUCTION),
                Some("Context from PDF: beam length 4 m"),
                Some("User Question: Deflection?"),
            ]
        );
    }

    #[tokio::test]
    async fn image_is_inlined_with_its_mime_type() {
        let dir = tempfile::tempdir().unwrap();
        let (_, upload) = staged(dir.path(), "circuit.jpg", "image/jpeg", b"\xff\xd8\xff").await;
        let (_, asm) = ok_assembler();

        let parts = asm.assemble(&request("", Some(upload))).await.unwrap();
        assert_eq!(parts.len(), 3);
        match &parts.as_slice()[1] {
            PromptPart::InlineData { mime_type, data } => {
                assert_eq!(mime_type, "image/jpeg");
                assert_eq!(STANDARD.decode(data).unwrap(), b"\xff\xd8\xff");
            }
            other => panic!("expected inline data, got {other:?}"),
        }
        assert_eq!(parts.as_slice()[2].as_text(), Some("User Question: "));
    }

    #[tokio::test]
    async fn unsupported_attachment_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        for mime in ["text/plain", "application/zip", "video/mp4"] {
            let (_, upload) = staged(dir.path(), "notes.txt", mime, b"hello").await;
            let (_, asm) = ok_assembler();
            let parts = asm.assemble(&request("hi", Some(upload))).await.unwrap();
            assert_eq!(parts.len(), 2, "{mime}");
        }
    }

    #[tokio::test]
    async fn tier_selects_model_identifier() {
        let (model, asm) = ok_assembler();
        let mut req = request("q", None);
        req.model_tier = ModelTier::Advanced;
        asm.build_and_invoke(req).await.unwrap();
        asm.build_and_invoke(request("q", None)).await.unwrap();

        let calls = model.calls.lock().unwrap();
        assert_eq!(calls[0].0, "advanced-m");
        assert_eq!(calls[1].0, "fast-m");
    }

    #[tokio::test]
    async fn success_returns_text_and_removes_upload() {
        let dir = tempfile::tempdir().unwrap();
        let (path, upload) = staged(dir.path(), "plot.png", "image/png", b"png").await;
        let (model, asm) = ok_assembler();

        let text = asm.build_and_invoke(request("Explain", Some(upload))).await.unwrap();
        assert_eq!(text, "$$2+2=4$$");
        assert!(!path.exists());
        assert_eq!(model.calls.lock().unwrap()[0].1.len(), 3);
    }

    #[tokio::test]
    async fn extraction_failure_skips_model_and_removes_upload() {
        let dir = tempfile::tempdir().unwrap();
        let (path, upload) = staged(dir.path(), "broken.pdf", "application/pdf", b"nope").await;
        let model = Arc::new(RecordingModel::default());
        let asm = assembler(model.clone(), StubExtractor(Err("bad xref")));

        let err = asm.build_and_invoke(request("?", Some(upload))).await.unwrap_err();
        assert!(matches!(err, CoreError::Extraction(_)));
        assert!(model.calls.lock().unwrap().is_empty());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn model_failure_removes_upload() {
        let dir = tempfile::tempdir().unwrap();
        let (path, upload) = staged(dir.path(), "doc.pdf", "application/pdf", b"%PDF").await;
        let model = Arc::new(RecordingModel { fail: true, ..Default::default() });
        let asm = assembler(model, StubExtractor(Ok("ctx")));

        let err = asm.build_and_invoke(request("?", Some(upload))).await.unwrap_err();
        assert!(matches!(err, CoreError::Model(ModelError::Status { status: 503, .. })));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn vanished_upload_is_an_attachment_error() {
        let dir = tempfile::tempdir().unwrap();
        let (path, upload) = staged(dir.path(), "gone.png", "image/png", b"x").await;
        std::fs::remove_file(&path).unwrap();
        let (_, asm) = ok_assembler();

        let err = asm.build_and_invoke(request("?", Some(upload))).await.unwrap_err();
        assert!(matches!(err, CoreError::Attachment(_)));
    }
}
