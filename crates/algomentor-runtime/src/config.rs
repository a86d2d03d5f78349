//! Runtime configuration.

use serde::{Deserialize, Serialize};

use algomentor_protocols::GenerationSettings;

/// Deployment-fixed runtime configuration.
///
/// Every field has a default, so an empty document is a valid
/// configuration. Generation parameters are fixed per deployment and
/// never user-configurable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Completion model identifier.
    pub model: String,

    /// Sampling parameters handed to the completion provider.
    pub generation: GenerationSettings,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            model: "gemini-1.5-flash".to_string(),
            generation: GenerationSettings::default(),
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}
