//! Document text extraction.

use async_trait::async_trait;
use tracing::debug;

use crate::error::CoreError;

/// Turns raw PDF bytes into plain text.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract_text(&self, pdf_bytes: Vec<u8>) -> Result<String, CoreError>;
}

/// [`TextExtractor`] backed by the `pdf-extract` crate.
///
/// Parsing is CPU-bound, so it runs on the blocking pool. A parser panic is
/// reported as an extraction failure rather than taking the worker down.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfTextExtractor;

#[async_trait]
impl TextExtractor for PdfTextExtractor {
    async fn extract_text(&self, pdf_bytes: Vec<u8>) -> Result<String, CoreError> {
        let size_bytes = pdf_bytes.len();
        let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&pdf_bytes))
            .await
            .map_err(|e| CoreError::Extraction(format!("extraction task failed: {e}")))?
            .map_err(|e| CoreError::Extraction(e.to_string()))?;

        debug!(size_bytes, text_len = text.len(), "extracted PDF text");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Single-page PDF drawing `text` in Helvetica, with a correct xref table.
    fn one_page_pdf(text: &str) -> Vec<u8> {
        let content = format!("BT /F1 24 Tf 72 720 Td ({text}) Tj ET");
        let objects = [
            "<< /Type /Catalog /Pages 2 0 R >>".to_owned(),
            "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_owned(),
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
             /Resources << /Font << /F1 5 0 R >> >> /Contents 4 0 R >>"
                .to_owned(),
            format!("<< /Length {} >>\nstream\n{content}\nendstream", content.len()),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
                .to_owned(),
        ];

        let mut pdf = b"%PDF-1.4\n".to_vec();
        let mut offsets = Vec::with_capacity(objects.len());
        for (i, body) in objects.iter().enumerate() {
            offsets.push(pdf.len());
            pdf.extend_from_slice(format!("{} 0 obj\n{body}\nendobj\n", i + 1).as_bytes());
        }
        let xref_at = pdf.len();
        pdf.extend_from_slice(format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1).as_bytes());
        for offset in offsets {
            pdf.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
        }
        pdf.extend_from_slice(
            format!(
                "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_at}\n%%EOF\n",
                objects.len() + 1
            )
            .as_bytes(),
        );
        pdf
    }

    #[tokio::test]
    async fn extracts_text_from_a_real_pdf() {
        let text = PdfTextExtractor
            .extract_text(one_page_pdf("beam length four"))
            .await
            .unwrap();
        assert!(text.contains("beam length four"), "got {text:?}");
    }

    #[tokio::test]
    async fn garbage_is_an_extraction_error() {
        let err = PdfTextExtractor
            .extract_text(b"definitely not a pdf".to_vec())
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Extraction(_)), "got {err:?}");
    }
}
