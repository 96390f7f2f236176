use anicards_core::domain::model::{CardColors, CardType, StatKey};
use axum::http::StatusCode;
use serde::Serialize;

use crate::errors::ServerError;

const MAX_USERNAME_LEN: usize = 80;

/// Parsed body of `POST /:username/generate_svgs`.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    pub keys: Vec<StatKey>,
    pub colors: CardColors,
    pub card_type: CardType,
}

impl GenerateRequest {
    /// Reads an urlencoded form. `keys` may repeat and each value may itself
    /// be comma separated; colours left empty fall back to `defaults`.
    pub fn from_form(body: &[u8], defaults: &CardColors) -> Result<Self, ServerError> {
        let mut keys: Vec<StatKey> = Vec::new();
        let mut title = None;
        let mut background = None;
        let mut text = None;
        let mut circle = None;
        let mut card_type = CardType::default();

        for (name, value) in url::form_urlencoded::parse(body) {
            let value = value.trim();
            match name.as_ref() {
                "keys" => {
                    for raw in value.split(',').filter(|k| !k.trim().is_empty()) {
                        let key: StatKey = raw.parse()?;
                        if !keys.contains(&key) {
                            keys.push(key);
                        }
                    }
                }
                "titleColor" => title = non_empty(value),
                "backgroundColor" => background = non_empty(value),
                "textColor" => text = non_empty(value),
                "circleColor" => circle = non_empty(value),
                "cardType" => card_type = value.parse()?,
                _ => {}
            }
        }

        if keys.is_empty() {
            return Err(ServerError::new(
                StatusCode::BAD_REQUEST,
                "at least one stat card key is required",
            ));
        }

        let colors = CardColors::new(
            title.as_deref().unwrap_or(&defaults.title),
            background.as_deref().unwrap_or(&defaults.background),
            text.as_deref().unwrap_or(&defaults.text),
            circle.as_deref().unwrap_or(&defaults.circle),
        )?;

        Ok(Self {
            keys,
            colors,
            card_type,
        })
    }

    pub fn keys_list(&self) -> String {
        join_keys(&self.keys)
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

pub fn join_keys(keys: &[StatKey]) -> String {
    keys.iter().map(|k| k.as_str()).collect::<Vec<_>>().join(",")
}

pub fn validate_username(raw: &str) -> Result<String, ServerError> {
    let trimmed = raw.trim();
    let valid = !trimmed.is_empty()
        && trimmed.len() <= MAX_USERNAME_LEN
        && trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if !valid {
        return Err(ServerError::new(
            StatusCode::BAD_REQUEST,
            format!("invalid username '{trimmed}'"),
        ));
    }
    Ok(trimmed.to_string())
}

#[derive(Debug, sqlx::FromRow)]
pub struct StatCardRow {
    pub keys: String,
    pub colors: String,
    pub card_type: String,
}

#[derive(Debug, sqlx::FromRow)]
pub struct SvgRow {
    pub key: String,
    pub data: String,
}

/// Everything stored for one user, svgs in the order the keys were chosen.
#[derive(Debug, Clone)]
pub struct UserCards {
    pub keys: Vec<StatKey>,
    pub colors: CardColors,
    pub card_type: CardType,
    pub svgs: Vec<(StatKey, String)>,
}

#[derive(Debug, Serialize)]
pub struct StatCardResponse {
    pub username: String,
    pub keys: Vec<StatKey>,
    pub colors: CardColors,
    pub card_type: CardType,
    pub stored: Vec<StatKey>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_and_comma_separated_keys_are_merged() {
        let req = GenerateRequest::from_form(
            b"keys=animeStats&keys=mangaTags%2CanimeStats&titleColor=%23FFFFFF",
            &CardColors::default(),
        )
        .unwrap();
        assert_eq!(req.keys, vec![StatKey::AnimeStats, StatKey::MangaTags]);
        assert_eq!(req.colors.title, "#ffffff");
        assert_eq!(req.colors.background, CardColors::default().background);
        assert_eq!(req.keys_list(), "animeStats,mangaTags");
    }

    #[test]
    fn missing_keys_are_rejected() {
        let err = GenerateRequest::from_form(b"titleColor=%23fff", &CardColors::default())
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn unknown_key_and_bad_colour_are_rejected() {
        let defaults = CardColors::default();
        assert!(GenerateRequest::from_form(b"keys=animeFoo", &defaults).is_err());
        assert!(GenerateRequest::from_form(b"keys=animeStats&textColor=blue", &defaults).is_err());
        assert!(GenerateRequest::from_form(b"keys=animeStats&cardType=Fancy", &defaults).is_err());
    }

    #[test]
    fn usernames_are_restricted() {
        assert_eq!(validate_username(" Alpha49 ").unwrap(), "Alpha49");
        assert!(validate_username("").is_err());
        assert!(validate_username("a/b").is_err());
        assert!(validate_username(&"a".repeat(81)).is_err());
    }
}
