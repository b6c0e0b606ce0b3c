//! Generated file names for ingested uploads.

use crate::root::NamingPolicy;
use crate::sanitize::clean_component;
use std::path::Path;

const DEFAULT_FIELD_LABEL: &str = "image";
const DEFAULT_ORIGINAL_NAME: &str = "file";

/// Build the `seq`-th candidate name for an upload. `seq == 0` has no suffix.
pub(crate) fn candidate_name(
    policy: NamingPolicy,
    field_name: &str,
    original_name: &str,
    millis: i64,
    seq: u32,
) -> String {
    let suffix = if seq == 0 {
        String::new()
    } else {
        format!("-{}", seq)
    };

    match policy {
        NamingPolicy::FieldLabel => {
            let label =
                clean_component(field_name).unwrap_or_else(|| DEFAULT_FIELD_LABEL.to_string());
            format!("{}-{}{}{}", label, millis, suffix, extension(original_name))
        }
        NamingPolicy::Original => {
            let original = clean_component(original_name)
                .unwrap_or_else(|| DEFAULT_ORIGINAL_NAME.to_string());
            format!("{}{}-{}", millis, suffix, original)
        }
    }
}

/// Lower-cased extension with its dot, or empty.
fn extension(original_name: &str) -> String {
    Path::new(original_name.trim())
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(clean_component)
        .map(|ext| format!(".{}", ext.to_lowercase()))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_label_names() {
        assert_eq!(
            candidate_name(NamingPolicy::FieldLabel, "images", "Beach.JPG", 1700000000000, 0),
            "images-1700000000000.jpg"
        );
        assert_eq!(
            candidate_name(NamingPolicy::FieldLabel, "images", "Beach.JPG", 1700000000000, 2),
            "images-1700000000000-2.jpg"
        );
        assert_eq!(
            candidate_name(NamingPolicy::FieldLabel, "", "noext", 5, 0),
            "image-5"
        );
    }

    #[test]
    fn test_original_names() {
        assert_eq!(
            candidate_name(NamingPolicy::Original, "images", "sunset view.png", 42, 0),
            "42-sunset_view.png"
        );
        assert_eq!(
            candidate_name(NamingPolicy::Original, "images", "sunset view.png", 42, 1),
            "42-1-sunset_view.png"
        );
        assert_eq!(
            candidate_name(NamingPolicy::Original, "images", "../", 42, 0),
            "42-file"
        );
    }
}
