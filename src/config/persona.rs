//! Assistant persona configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::locale::{Language, Phrases};

/// Who the assistant speaks for and how
#[derive(Debug, Clone, Deserialize)]
pub struct PersonaConfig {
    #[serde(default = "default_bot_name")]
    pub bot_name: String,

    #[serde(default = "default_organization")]
    pub organization: String,

    #[serde(default)]
    pub language: Language,

    /// Include style exemplars in every prompt
    #[serde(default = "default_true")]
    pub exemplars_enabled: bool,

    /// Answer clear event questions from the description without generation
    #[serde(default = "default_true")]
    pub event_shortcuts: bool,

    /// Open new sessions with the greeting messages
    #[serde(default = "default_true")]
    pub greet: bool,
}

impl PersonaConfig {
    pub fn phrases(&self) -> Phrases {
        Phrases::new(self.language, self.organization.trim(), self.bot_name.trim())
    }

    /// Validate persona configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.bot_name.trim().is_empty() {
            return Err(ValidationError::EmptyValue("persona.bot_name"));
        }
        if self.organization.trim().is_empty() {
            return Err(ValidationError::EmptyValue("persona.organization"));
        }
        Ok(())
    }
}

impl Default for PersonaConfig {
    fn default() -> Self {
        Self {
            bot_name: default_bot_name(),
            organization: default_organization(),
            language: Language::default(),
            exemplars_enabled: true,
            event_shortcuts: true,
            greet: true,
        }
    }
}

fn default_bot_name() -> String {
    "StarBot".to_string()
}

fn default_organization() -> String {
    "Startop".to_string()
}

fn default_true() -> bool {
    true
}
