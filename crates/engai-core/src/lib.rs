//! engai-core – turns one chat request into one generative-model call.
//!
//! The [`PromptAssembler`] merges the fixed system instruction, optional
//! attachment content and the user question into an ordered
//! [`PromptParts`] list, submits it through a [`GenerativeModel`], and
//! returns the reply text. Uploaded files live on disk as a
//! [`StagedUpload`] that is removed when the request is dropped.

pub mod assembler;
pub mod error;
pub mod extract;
pub mod gemini;
pub mod model;
pub mod prompt;
pub mod upload;

pub use assembler::{PromptAssembler, PromptRequest};
pub use error::{CoreError, ModelError};
pub use extract::{PdfTextExtractor, TextExtractor};
pub use gemini::GeminiClient;
pub use model::{GenerativeModel, ModelCatalog};
pub use prompt::{PromptPart, PromptParts, SYSTEM_INSTRUCTION};
pub use upload::StagedUpload;
