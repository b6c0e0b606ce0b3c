//! Field validators shared by the request payloads (used through `#[validate(custom(...))]`).

use std::borrow::Cow;
use validator::ValidationError;

const MAX_TOUR_CODE_LEN: usize = 64;

fn error(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(error("blank", "must not be blank"));
    }
    Ok(())
}

/// `[latitude, longitude]` with latitude in [-90, 90] and longitude in [-180, 180].
pub fn coordinates(value: &[f64]) -> Result<(), ValidationError> {
    if value.len() != 2 {
        return Err(error(
            "coordinates",
            "coordinates must be [latitude, longitude]",
        ));
    }
    let (lat, lng) = (value[0], value[1]);
    if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
        return Err(error("latitude", "latitude must be between -90 and 90"));
    }
    if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
        return Err(error("longitude", "longitude must be between -180 and 180"));
    }
    Ok(())
}

/// Tour codes double as folder names, so they are restricted to upload-safe tokens.
pub fn is_tour_code(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphanumeric() => {}
        _ => return false,
    }
    value.len() <= MAX_TOUR_CODE_LEN
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

pub fn tour_code(value: &str) -> Result<(), ValidationError> {
    if !is_tour_code(value.trim()) {
        return Err(error(
            "tour_code",
            "tourCode may only contain letters, digits, '-' and '_'",
        ));
    }
    Ok(())
}

pub fn phone(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    let digits = value.chars().filter(|c| c.is_ascii_digit()).count();
    let body = value.strip_prefix('+').unwrap_or(value);
    let well_formed = body
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '-' | '(' | ')'));
    if !well_formed || !(6..=15).contains(&digits) {
        return Err(error("phone", "phone number is not valid"));
    }
    Ok(())
}
