use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::common::lenient;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStatus {
    #[default]
    Pending,
    Completed,
}

/// A custom trip quote request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub email: String,
    pub phone: String,
    pub destination: String,
    pub start_date: String,
    pub duration: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub travellers: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub status: QuoteStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuoteRequest {
    pub name: Option<String>,
    #[validate(email(message = "email is not valid"))]
    pub email: String,
    #[validate(custom(function = "crate::validation::phone"))]
    pub phone: String,
    #[validate(custom(function = "crate::validation::not_blank", message = "destination is required"))]
    pub destination: String,
    #[validate(custom(function = "crate::validation::not_blank", message = "startDate is required"))]
    pub start_date: String,
    #[validate(custom(function = "crate::validation::not_blank", message = "duration is required"))]
    pub duration: String,
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub travellers: Option<u32>,
    #[validate(length(max = 5000, message = "message must be at most 5000 characters"))]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateQuoteStatusRequest {
    pub status: QuoteStatus,
}

impl Quote {
    pub fn new(req: CreateQuoteRequest) -> Self {
        let now = Utc::now();
        Quote {
            id: Uuid::new_v4(),
            name: req.name,
            email: req.email.trim().to_string(),
            phone: req.phone.trim().to_string(),
            destination: req.destination.trim().to_string(),
            start_date: req.start_date.trim().to_string(),
            duration: req.duration.trim().to_string(),
            travellers: req.travellers,
            message: req.message,
            status: QuoteStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }
}
