//! Prompt parts and the fixed text segments.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Persona, output convention and attachment behaviour sent ahead of every question.
pub const SYSTEM_INSTRUCTION: &str = "You are an expert Engineering Problem Solver AI.
Your goal is to provide accurate, step-by-step solutions to complex engineering problems.
Use LaTeX for all mathematical formulas (wrap them in $ for inline or $$ for blocks).
Be precise and professional.
If a file (PDF text or image) is provided, use it to answer the question.";

const PDF_CONTEXT_LABEL: &str = "Context from PDF: ";
const QUESTION_LABEL: &str = "User Question: ";

/// One entry of the model input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptPart {
    Text(String),
    /// Binary content sent inline; `data` is base64.
    InlineData { mime_type: String, data: String },
}

impl PromptPart {
    pub fn inline(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        PromptPart::InlineData {
            mime_type: mime_type.into(),
            data: STANDARD.encode(bytes),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            PromptPart::Text(t) => Some(t),
            PromptPart::InlineData { .. } => None,
        }
    }
}

/// Ordered model input: system instruction first, user question last,
/// at most one attachment segment between them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptParts(Vec<PromptPart>);

impl PromptParts {
    /// Starts a new list with the system instruction.
    pub(crate) fn begin() -> Self {
        Self(vec![PromptPart::Text(SYSTEM_INSTRUCTION.to_owned())])
    }

    pub(crate) fn push_pdf_context(&mut self, text: &str) {
        self.0.push(PromptPart::Text(format!("{PDF_CONTEXT_LABEL}{text}")));
    }

    pub(crate) fn push_inline(&mut self, mime_type: &str, bytes: &[u8]) {
        self.0.push(PromptPart::inline(mime_type, bytes));
    }

    /// Closes the list with the question. Consumes `self` so nothing can follow it.
    pub(crate) fn finish(mut self, question: &str) -> Self {
        self.0.push(PromptPart::Text(format!("{QUESTION_LABEL}{question}")));
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PromptPart> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[PromptPart] {
        &self.0
    }
}

impl<'a> IntoIterator for &'a PromptParts {
    type Item = &'a PromptPart;
    type IntoIter = std::slice::Iter<'a, PromptPart>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
