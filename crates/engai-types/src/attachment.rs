use std::fmt;

/// MIME type of PDF documents.
pub const PDF_MIME: &str = "application/pdf";

/// How the prompt pipeline treats an attachment, decided by MIME type alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    /// `application/pdf`: text is extracted and sent as context.
    Pdf,
    /// `image/*`: sent inline as base64 binary.
    Image,
    /// Anything else is dropped without error.
    Unsupported,
}

impl AttachmentKind {
    pub fn from_mime(mime_type: &str) -> Self {
        if mime_type == PDF_MIME {
            AttachmentKind::Pdf
        } else if mime_type.starts_with("image/") {
            AttachmentKind::Image
        } else {
            AttachmentKind::Unsupported
        }
    }
}

/// A file selected for the next turn.
#[derive(Clone, PartialEq, Eq)]
pub struct Attachment {
    pub bytes: Vec<u8>,
    pub mime_type: String,
    pub original_name: String,
}

impl Attachment {
    pub fn new(
        bytes: impl Into<Vec<u8>>,
        mime_type: impl Into<String>,
        original_name: impl Into<String>,
    ) -> Self {
        Self {
            bytes: bytes.into(),
            mime_type: mime_type.into(),
            original_name: original_name.into(),
        }
    }

    pub fn kind(&self) -> AttachmentKind {
        AttachmentKind::from_mime(&self.mime_type)
    }
}

// Raw bytes would flood the logs.
impl fmt::Debug for Attachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attachment")
            .field("original_name", &self.original_name)
            .field("mime_type", &self.mime_type)
            .field("size_bytes", &self.bytes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_is_decided_by_mime_type() {
        assert_eq!(AttachmentKind::from_mime("application/pdf"), AttachmentKind::Pdf);
        assert_eq!(AttachmentKind::from_mime("image/png"), AttachmentKind::Image);
        assert_eq!(AttachmentKind::from_mime("image/svg+xml"), AttachmentKind::Image);
        assert_eq!(AttachmentKind::from_mime("text/plain"), AttachmentKind::Unsupported);
        assert_eq!(AttachmentKind::from_mime("application/pdfx"), AttachmentKind::Unsupported);
        assert_eq!(AttachmentKind::from_mime(""), AttachmentKind::Unsupported);
    }

    #[test]
    fn debug_omits_payload() {
        let a = Attachment::new(vec![0u8; 4096], "image/png", "plot.png");
        let rendered = format!("{a:?}");
        assert!(rendered.contains("size_bytes: 4096"));
        assert!(!rendered.contains("[0, 0"));
    }
}
