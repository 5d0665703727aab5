use serde::{Deserialize, Serialize};

use crate::error::ChainError;

/// Languages the relay bridges. The set is closed on purpose: every stage of
/// the chain works in terms of this enum, so an unsupported code can only
/// enter through [`LanguageTag::from_code`] and fails there.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageTag {
    Ru,
    Th,
    En,
}

impl LanguageTag {
    pub const ALL: [LanguageTag; 3] = [LanguageTag::Ru, LanguageTag::Th, LanguageTag::En];

    pub fn from_code(code: &str) -> Result<Self, ChainError> {
        match code.trim().to_ascii_lowercase().as_str() {
            "ru" => Ok(LanguageTag::Ru),
            "th" => Ok(LanguageTag::Th),
            "en" => Ok(LanguageTag::En),
            other => Err(ChainError::UnsupportedLanguage(other.to_string())),
        }
    }

    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            LanguageTag::Ru => "ru",
            LanguageTag::Th => "th",
            LanguageTag::En => "en",
        }
    }

    /// Human-readable name as used inside prompts.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            LanguageTag::Ru => "Russian",
            LanguageTag::Th => "Thai",
            LanguageTag::En => "English",
        }
    }

    #[must_use]
    pub fn flag(&self) -> &'static str {
        match self {
            LanguageTag::Ru => "\u{1F1F7}\u{1F1FA}",
            LanguageTag::Th => "\u{1F1F9}\u{1F1ED}",
            LanguageTag::En => "\u{1F1EC}\u{1F1E7}",
        }
    }
}

impl std::fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}
