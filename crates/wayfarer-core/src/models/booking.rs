use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

pub const DEFAULT_BOOKING_STATUS: &str = "pending";

/// A booking of a tour plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Booked tour plan
    pub package_id: Uuid,
    pub price: f64,
    pub adult_count: u32,
    #[serde(default)]
    pub child_count: u32,
    pub date: String,
    pub username: String,
    pub email: String,
    pub phone_number: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub order_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub user_id: Option<String>,
    pub package_id: Uuid,
    #[validate(range(min = 0.0, message = "price must not be negative"))]
    pub price: f64,
    #[validate(range(min = 1, message = "adultCount must be at least 1"))]
    pub adult_count: u32,
    #[serde(default)]
    pub child_count: u32,
    #[validate(custom(function = "crate::validation::not_blank", message = "date is required"))]
    pub date: String,
    #[validate(custom(function = "crate::validation::not_blank", message = "username is required"))]
    pub username: String,
    #[validate(email(message = "email is not valid"))]
    pub email: String,
    #[validate(custom(function = "crate::validation::phone"))]
    pub phone_number: String,
    pub status: Option<String>,
    pub address: Option<String>,
    pub order_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookingRequest {
    #[validate(range(min = 0.0, message = "price must not be negative"))]
    pub price: Option<f64>,
    #[validate(range(min = 1, message = "adultCount must be at least 1"))]
    pub adult_count: Option<u32>,
    pub child_count: Option<u32>,
    #[validate(custom(function = "crate::validation::not_blank", message = "date must not be blank"))]
    pub date: Option<String>,
    #[validate(custom(
        function = "crate::validation::not_blank",
        message = "username must not be blank"
    ))]
    pub username: Option<String>,
    #[validate(email(message = "email is not valid"))]
    pub email: Option<String>,
    #[validate(custom(function = "crate::validation::phone"))]
    pub phone_number: Option<String>,
    #[validate(custom(function = "crate::validation::not_blank", message = "status must not be blank"))]
    pub status: Option<String>,
    pub address: Option<String>,
}

/// `ORD-` followed by 12 upper-case hex characters.
pub fn generate_order_id() -> String {
    let hex = Uuid::new_v4().simple().to_string().to_uppercase();
    format!("ORD-{}", &hex[..12])
}

impl Booking {
    pub fn new(req: CreateBookingRequest) -> Self {
        let now = Utc::now();
        Booking {
            id: Uuid::new_v4(),
            user_id: req.user_id,
            package_id: req.package_id,
            price: req.price,
            adult_count: req.adult_count,
            child_count: req.child_count,
            date: req.date.trim().to_string(),
            username: req.username.trim().to_string(),
            email: req.email.trim().to_string(),
            phone_number: req.phone_number.trim().to_string(),
            status: req
                .status
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_BOOKING_STATUS.to_string()),
            address: req.address,
            order_id: req
                .order_id
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(generate_order_id),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, req: UpdateBookingRequest) {
        if let Some(v) = req.price {
            self.price = v;
        }
        if let Some(v) = req.adult_count {
            self.adult_count = v;
        }
        if let Some(v) = req.child_count {
            self.child_count = v;
        }
        if let Some(v) = req.date {
            self.date = v.trim().to_string();
        }
        if let Some(v) = req.username {
            self.username = v.trim().to_string();
        }
        if let Some(v) = req.email {
            self.email = v.trim().to_string();
        }
        if let Some(v) = req.phone_number {
            self.phone_number = v.trim().to_string();
        }
        if let Some(v) = req.status {
            self.status = v.trim().to_string();
        }
        if req.address.is_some() {
            self.address = req.address;
        }
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct BookingQuery {
    pub user_id: Option<String>,
    pub package_id: Option<Uuid>,
    pub status: Option<String>,
    pub email: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_id_format() {
        let id = generate_order_id();
        assert!(id.starts_with("ORD-"));
        assert_eq!(id.len(), 16);
        assert!(id[4..].chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_lowercase()));
    }

    #[test]
    fn test_defaults_applied() {
        let booking = Booking::new(CreateBookingRequest {
            package_id: Uuid::new_v4(),
            price: 100.0,
            adult_count: 2,
            date: "2026-12-01".to_string(),
            username: "ravi".to_string(),
            email: "ravi@example.com".to_string(),
            phone_number: "9876543210".to_string(),
            status: Some(" ".to_string()),
            ..Default::default()
        });
        assert_eq!(booking.status, DEFAULT_BOOKING_STATUS);
        assert!(booking.order_id.starts_with("ORD-"));
    }

    #[test]
    fn test_adult_count_required() {
        let req = CreateBookingRequest {
            package_id: Uuid::new_v4(),
            adult_count: 0,
            date: "2026-12-01".to_string(),
            username: "ravi".to_string(),
            email: "ravi@example.com".to_string(),
            phone_number: "9876543210".to_string(),
            ..Default::default()
        };
        assert!(req.validate().is_err());
    }
}
