//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use engai_core::PromptAssembler;

use crate::config::Config;

/// State shared across all HTTP handlers.
///
/// Holds no per-request data: concurrent chat requests only share the
/// read-only config and the stateless assembler.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Server configuration (env-derived).
    pub config: Arc<Config>,
    /// Prompt pipeline bound to the configured model backend.
    pub assembler: Arc<PromptAssembler>,
}
