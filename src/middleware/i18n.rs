// src/middleware/i18n.rs

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};

use crate::common::i18n::{I18nStore, DEFAULT_LANG};

// Idiomas que temos mensagem ("tm" é o código antigo do app para tâmil)
const SUPPORTED: &[&str] = &["en", "ta", "tm", "si"];

// Nosso extrator de idioma
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale(pub String);

impl Default for Locale {
    fn default() -> Self {
        Locale(DEFAULT_LANG.to_string())
    }
}

impl Locale {
    /// Primeiro idioma suportado na ordem de preferência do cliente.
    pub fn from_header(raw: &str) -> Self {
        accept_language::intersection(raw, SUPPORTED)
            .first()
            .map(|tag| Locale(I18nStore::resolve_lang(tag).to_string()))
            .unwrap_or_default()
    }
}

impl<S> FromRequestParts<S> for Locale
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let locale = parts
            .headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|value| value.to_str().ok())
            .map(Locale::from_header)
            .unwrap_or_default();

        Ok(locale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_first_supported_language() {
        assert_eq!(Locale::from_header("fr-FR, ta;q=0.8, en;q=0.5").0, "ta");
        assert_eq!(Locale::from_header("si").0, "si");
    }

    #[test]
    fn legacy_tamil_code_maps_to_ta() {
        assert_eq!(Locale::from_header("tm").0, "ta");
    }

    #[test]
    fn unknown_languages_fall_back_to_english() {
        assert_eq!(Locale::from_header("de, fr").0, "en");
        assert_eq!(Locale::from_header("").0, "en");
    }
}
