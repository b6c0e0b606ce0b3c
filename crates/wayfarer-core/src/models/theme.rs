use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Theme names the catalog knows about. Stored upper-case.
pub const THEME_NAMES: [&str; 7] = [
    "TOP DESTINATIONS",
    "HONEYMOON",
    "WILDLIFE",
    "HILL STATIONS",
    "HERITAGE",
    "PILGRIMAGE",
    "BEACH",
];

/// Normalize a theme name (trim, collapse inner whitespace, upper-case) and check it is known.
pub fn normalize_theme_name(raw: &str) -> Option<String> {
    let name = raw
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase();
    THEME_NAMES.contains(&name.as_str()).then_some(name)
}

/// A travel theme (honeymoon, wildlife, ...). The name is the media folder key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct CreateThemeRequest {
    #[validate(custom(function = "crate::validation::not_blank", message = "name is required"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 2000, message = "description must be at most 2000 characters"))]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateThemeRequest {
    #[validate(custom(function = "crate::validation::not_blank", message = "name must not be blank"))]
    pub name: Option<String>,
    #[validate(length(max = 2000, message = "description must be at most 2000 characters"))]
    pub description: Option<String>,
}

impl Theme {
    /// `name` must already be normalized.
    pub fn new(name: String, description: Option<String>, images: Vec<String>) -> Self {
        let now = Utc::now();
        Theme {
            id: Uuid::new_v4(),
            name,
            description,
            images,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn summary(&self) -> ThemeSummary {
        ThemeSummary {
            id: self.id,
            name: self.name.clone(),
            description: self.description.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ThemeSummary {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
