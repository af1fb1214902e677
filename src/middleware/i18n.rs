// src/middleware/i18n.rs

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};

// Extrator de idioma (primeiro idioma do Accept-Language, sem região)
#[derive(Debug, Clone)]
pub struct Locale(pub String);

impl<S> FromRequestParts<S> for Locale
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        Ok(Locale(parse_language(
            parts
                .headers
                .get(header::ACCEPT_LANGUAGE)
                .and_then(|value| value.to_str().ok()),
        )))
    }
}

fn parse_language(header_value: Option<&str>) -> String {
    header_value
        .and_then(|header_str| {
            accept_language::parse(header_str)
                .first()
                // "pt-BR" -> "pt"
                .map(|tag| tag.split('-').next().unwrap_or(tag).to_string())
        })
        .unwrap_or_else(|| "en".to_string())
}
