//! Request helpers shared by handlers

pub mod upload;

use wayfarer_core::AppError;

/// A required image lookup parameter. Missing or blank values resolve to 404.
pub fn lookup_param(value: Option<&str>, name: &str) -> Result<String, AppError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
        .ok_or_else(|| AppError::NotFound(format!("Image not found: {} is required", name)))
}
