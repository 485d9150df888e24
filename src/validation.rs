//! Attribute validators, run before any request is made.
use std::sync::OnceLock;

use regex::Regex;

use crate::{transcode::VariationsKind, ValidationError};

const MAX_KEY_LENGTH: usize = 20;

fn key_regex() -> &'static Regex {
    static KEY: OnceLock<Regex> = OnceLock::new();
    KEY.get_or_init(|| Regex::new(r"^[A-Za-z0-9_\-\.]+$").expect("key pattern is valid"))
}

fn color_regex() -> &'static Regex {
    static COLOR: OnceLock<Regex> = OnceLock::new();
    COLOR.get_or_init(|| Regex::new(r"^[0-9a-fA-F]{6}$").expect("color pattern is valid"))
}

/// Project and environment keys: 1 to 20 characters out of `[A-Za-z0-9_.-]`.
pub fn validate_key(attribute: &str, value: &str) -> Result<(), ValidationError> {
    let length = value.chars().count();
    if length < 1 || length > MAX_KEY_LENGTH {
        return Err(ValidationError::KeyLength {
            attribute: attribute.to_owned(),
            value: value.to_owned(),
        });
    }
    validate_flag_key(attribute, value)
}

/// Flag keys share the key alphabet but have no length cap.
pub fn validate_flag_key(attribute: &str, value: &str) -> Result<(), ValidationError> {
    if !key_regex().is_match(value) {
        return Err(ValidationError::KeyFormat {
            attribute: attribute.to_owned(),
            value: value.to_owned(),
        });
    }
    Ok(())
}

/// Six hex digits, no leading `#`.
pub fn validate_color(attribute: &str, value: &str) -> Result<(), ValidationError> {
    if !color_regex().is_match(value) {
        return Err(ValidationError::Color {
            attribute: attribute.to_owned(),
            value: value.to_owned(),
        });
    }
    Ok(())
}

/// Variation values must be non-empty.
pub fn validate_variation_value(attribute: &str, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::Empty {
            attribute: attribute.to_owned(),
        });
    }
    Ok(())
}

/// One of `boolean`, `number` or `string`.
pub fn validate_variations_kind(attribute: &str, value: &str) -> Result<(), ValidationError> {
    value
        .parse::<VariationsKind>()
        .map(|_| ())
        .map_err(|_| ValidationError::VariationsKind {
            attribute: attribute.to_owned(),
            value: value.to_owned(),
        })
}
