//! Multipart intake for record forms
//!
//! File parts are streamed to transient files under the upload temp dir; text parts are
//! collected into a JSON object and decoded once into the typed request.

use crate::state::UploadLimits;
use axum::extract::multipart::Field;
use axum::extract::Multipart;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tokio::io::AsyncWriteExt;
use wayfarer_core::AppError;
use wayfarer_storage::TransientFile;

/// A decoded multipart form
#[derive(Debug, Default)]
pub struct MultipartForm {
    pub fields: Map<String, Value>,
    pub files: Vec<TransientFile>,
}

impl MultipartForm {
    /// Decode the text parts into `T`. Decode failures are 400s.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, AppError> {
        serde_json::from_value(Value::Object(self.fields.clone()))
            .map_err(|e| AppError::InvalidInput(format!("Invalid form data: {}", e)))
    }
}

/// Read every part of `multipart`, enforcing the upload limits.
pub async fn read_multipart(
    mut multipart: Multipart,
    limits: &UploadLimits,
) -> Result<MultipartForm, AppError> {
    let mut form = MultipartForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Failed to read multipart: {}", e)))?
    {
        let name = field
            .name()
            .map(|n| n.trim_end_matches("[]").to_string())
            .unwrap_or_default();

        if field.file_name().is_some() {
            if form.files.len() >= limits.max_files_per_request {
                return Err(AppError::InvalidInput(format!(
                    "At most {} files may be uploaded per request",
                    limits.max_files_per_request
                )));
            }
            let file = read_file_field(field, &name, limits).await?;
            form.files.push(file);
        } else {
            let text = field
                .text()
                .await
                .map_err(|e| AppError::InvalidInput(format!("Failed to read field {}: {}", name, e)))?;
            insert_text_field(&mut form.fields, name, text);
        }
    }

    tracing::debug!(
        fields = form.fields.len(),
        files = form.files.len(),
        "Multipart form read"
    );
    Ok(form)
}

/// Text that looks like JSON (`[...]` or `{...}`) is decoded, other text stays a string.
/// A repeated field name collects its values into an array.
fn insert_text_field(fields: &mut Map<String, Value>, name: String, text: String) {
    let trimmed = text.trim();
    let value = if trimmed.starts_with('[') || trimmed.starts_with('{') {
        serde_json::from_str(trimmed).unwrap_or(Value::String(text))
    } else {
        Value::String(text)
    };

    match fields.get_mut(&name) {
        Some(Value::Array(existing)) => existing.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
        None => {
            fields.insert(name, value);
        }
    }
}

/// Normalize MIME type by stripping parameters (e.g. "image/jpeg; q=1" -> "image/jpeg").
fn normalize_mime_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .map(|s| s.trim())
        .unwrap_or(content_type)
        .to_lowercase()
}

/// Validate content type against the allow-list.
pub fn validate_content_type(content_type: &str, allowed_types: &[String]) -> Result<(), AppError> {
    let normalized = normalize_mime_type(content_type);
    if !allowed_types
        .iter()
        .any(|ct| normalized == ct.to_lowercase())
    {
        return Err(AppError::InvalidInput(format!(
            "Invalid content type {}. Allowed types: {}",
            normalized,
            allowed_types.join(", ")
        )));
    }
    Ok(())
}

/// Declared part type, or a guess from the file name when the client sent none.
fn part_content_type(declared: Option<&str>, file_name: &str) -> String {
    match declared {
        Some(ct) if !ct.trim().is_empty() && ct != "application/octet-stream" => ct.to_string(),
        _ => mime_guess::from_path(file_name)
            .first_or_octet_stream()
            .essence_str()
            .to_string(),
    }
}

async fn read_file_field(
    mut field: Field<'_>,
    field_name: &str,
    limits: &UploadLimits,
) -> Result<TransientFile, AppError> {
    let original_name = field.file_name().unwrap_or("upload").to_string();
    let content_type = part_content_type(field.content_type(), &original_name);
    validate_content_type(&content_type, &limits.allowed_content_types)?;

    let temp = tempfile::Builder::new()
        .prefix("upload-")
        .tempfile_in(&limits.temp_dir)
        .map_err(|e| AppError::StorageWrite(format!("Failed to create upload temp file: {}", e)))?;
    let (std_file, temp_path) = temp.into_parts();
    let mut file = tokio::fs::File::from_std(std_file);

    let mut written: usize = 0;
    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Failed to read file data: {}", e)))?
    {
        written += chunk.len();
        if written > limits.max_file_size_bytes {
            return Err(AppError::PayloadTooLarge(format!(
                "File {} exceeds maximum allowed size of {} MB",
                original_name,
                limits.max_file_size_bytes / 1024 / 1024
            )));
        }
        file.write_all(&chunk)
            .await
            .map_err(|e| AppError::StorageWrite(format!("Failed to buffer upload: {}", e)))?;
    }
    file.flush()
        .await
        .map_err(|e| AppError::StorageWrite(format!("Failed to buffer upload: {}", e)))?;

    if written == 0 {
        return Err(AppError::InvalidInput(format!(
            "File {} is empty",
            original_name
        )));
    }

    tracing::debug!(
        field = field_name,
        file_name = %original_name,
        content_type = %content_type,
        size = written,
        "Upload buffered"
    );
    Ok(TransientFile::new(temp_path, original_name, field_name))
}
