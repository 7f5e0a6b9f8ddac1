use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Model tier selected by the user.
///
/// The string forms (`flash` / `pro`) are the values of the `model` form
/// field on `POST /api/chat`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
pub enum ModelTier {
    /// Lightweight model.
    #[default]
    #[serde(rename = "flash")]
    #[strum(serialize = "flash")]
    Fast,
    /// Higher-capability model.
    #[serde(rename = "pro")]
    #[strum(serialize = "pro")]
    Advanced,
}

impl ModelTier {
    /// Parse the `model` form field. Total: unknown or absent values select [`ModelTier::Fast`].
    pub fn from_form_value(value: Option<&str>) -> Self {
        value.and_then(|v| v.parse().ok()).unwrap_or_default()
    }

    pub fn as_form_value(&self) -> &str {
        self.as_ref()
    }
}
