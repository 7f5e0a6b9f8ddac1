use async_trait::async_trait;
use engai_types::ModelTier;

use crate::error::ModelError;
use crate::prompt::PromptParts;

/// A generative-language service: one ordered input, one text reply.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    async fn generate(&self, model: &str, parts: &PromptParts) -> Result<String, ModelError>;
}

/// Model identifiers behind each [`ModelTier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelCatalog {
    pub fast: String,
    pub advanced: String,
}

impl ModelCatalog {
    pub fn new(fast: impl Into<String>, advanced: impl Into<String>) -> Self {
        Self {
            fast: fast.into(),
            advanced: advanced.into(),
        }
    }

    pub fn resolve(&self, tier: ModelTier) -> &str {
        match tier {
            ModelTier::Fast => &self.fast,
            ModelTier::Advanced => &self.advanced,
        }
    }
}

impl Default for ModelCatalog {
    fn default() -> Self {
        Self::new("gemini-1.5-flash", "gemini-1.5-pro")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_resolve_to_configured_models() {
        let catalog = ModelCatalog::new("lite", "heavy");
        assert_eq!(catalog.resolve(ModelTier::Fast), "lite");
        assert_eq!(catalog.resolve(ModelTier::Advanced), "heavy");
    }

    #[test]
    fn form_values_resolve_through_tiers() {
        let catalog = ModelCatalog::default();
        let pick = |v: Option<&str>| catalog.resolve(ModelTier::from_form_value(v)).to_owned();
        assert_eq!(pick(Some("pro")), "gemini-1.5-pro");
        assert_eq!(pick(Some("flash")), "gemini-1.5-flash");
        assert_eq!(pick(None), "gemini-1.5-flash");
        assert_eq!(pick(Some("turbo")), "gemini-1.5-flash");
    }
}
