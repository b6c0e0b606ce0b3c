use crate::sanitize::{sanitize_segment, validate_segment};
use crate::traits::StorageResult;
use std::fmt;

/// How a raw entity key becomes a folder segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentPolicy {
    /// Whitespace runs become a single `_` (free-text names such as states).
    Underscore,
    /// Kept as typed, after trimming (theme names, tour codes).
    Verbatim,
}

/// How an ingested file is named inside its folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamingPolicy {
    /// `{field}-{millis}[-n]{ext}`
    FieldLabel,
    /// `{millis}[-n]-{original}`
    Original,
}

/// What happens to existing images when an update uploads new ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageUpdatePolicy {
    Replace,
    Append,
}

/// Per-entity-type media namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaRoot {
    Addresses,
    Places,
    Themes,
    TourPlans,
}

impl MediaRoot {
    pub const ALL: [MediaRoot; 4] = [
        MediaRoot::Addresses,
        MediaRoot::Places,
        MediaRoot::Themes,
        MediaRoot::TourPlans,
    ];

    /// Directory name under the media base directory.
    pub fn dir_name(self) -> &'static str {
        match self {
            MediaRoot::Addresses => "addresses",
            MediaRoot::Places => "places",
            MediaRoot::Themes => "themes",
            MediaRoot::TourPlans => "tourPlans",
        }
    }

    pub fn segment_policy(self) -> SegmentPolicy {
        match self {
            MediaRoot::Addresses | MediaRoot::Places => SegmentPolicy::Underscore,
            MediaRoot::Themes | MediaRoot::TourPlans => SegmentPolicy::Verbatim,
        }
    }

    pub fn naming_policy(self) -> NamingPolicy {
        match self {
            MediaRoot::Addresses | MediaRoot::TourPlans => NamingPolicy::FieldLabel,
            MediaRoot::Places | MediaRoot::Themes => NamingPolicy::Original,
        }
    }

    pub fn update_policy(self) -> ImageUpdatePolicy {
        match self {
            MediaRoot::TourPlans => ImageUpdatePolicy::Append,
            _ => ImageUpdatePolicy::Replace,
        }
    }

    /// Turn a raw entity key into this root's folder segment.
    ///
    /// Fails with `InvalidKey` for blank keys and anything that could leave the root.
    pub fn sanitize(self, raw_key: &str) -> StorageResult<String> {
        sanitize_segment(raw_key, self.segment_policy())
    }

    /// Check a stored path belongs to this root's layout and split it.
    pub fn split_stored_path(self, stored: &str) -> StorageResult<(&str, &str)> {
        let (segment, file_name) = stored.split_once('/').ok_or_else(|| {
            crate::StorageError::InvalidKey(format!("Malformed stored path: {}", stored))
        })?;
        validate_segment(segment)?;
        crate::sanitize::validate_file_name(file_name)?;
        Ok((segment, file_name))
    }
}

impl fmt::Display for MediaRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}
