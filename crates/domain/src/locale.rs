//! Country and language used to reach the regional LG gateway.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub const DEFAULT_COUNTRY: &str = "US";
pub const DEFAULT_LANGUAGE: &str = "en-US";

/// A validated country/language pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locale {
    pub country: String,
    pub language: String,
}

impl Default for Locale {
    fn default() -> Self {
        Self {
            country: DEFAULT_COUNTRY.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

impl Locale {
    /// Validate and build a locale. Empty values fall back to the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidCountry`] unless the country is two
    /// or three upper-case letters, and [`ValidationError::InvalidLanguage`]
    /// unless the language looks like `en-US`.
    pub fn new(country: &str, language: &str) -> Result<Self, ValidationError> {
        let country = if country.is_empty() {
            DEFAULT_COUNTRY
        } else {
            country
        };
        if !is_upper_code(country) {
            return Err(ValidationError::InvalidCountry(country.to_string()));
        }

        let language = if language.is_empty() {
            DEFAULT_LANGUAGE
        } else {
            language
        };
        let valid_language = language
            .split_once('-')
            .is_some_and(|(lang, region)| is_lower_code(lang) && is_upper_code(region));
        if !valid_language {
            return Err(ValidationError::InvalidLanguage(language.to_string()));
        }

        Ok(Self {
            country: country.to_string(),
            language: language.to_string(),
        })
    }
}

fn is_upper_code(value: &str) -> bool {
    (2..=3).contains(&value.len()) && value.bytes().all(|b| b.is_ascii_uppercase())
}

fn is_lower_code(value: &str) -> bool {
    (2..=3).contains(&value.len()) && value.bytes().all(|b| b.is_ascii_lowercase())
}
