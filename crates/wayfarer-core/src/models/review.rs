use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

/// A traveller review of a tour plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: Uuid,
    pub tour_rating: u8,
    pub recommend: bool,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booking_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewRequest {
    #[validate(range(min = 1, max = 5, message = "tourRating must be between 1 and 5"))]
    pub tour_rating: u8,
    #[serde(default)]
    pub recommend: bool,
    #[validate(custom(function = "crate::validation::not_blank", message = "name is required"))]
    pub name: String,
    #[validate(email(message = "email is not valid"))]
    pub email: String,
    pub user_id: Option<String>,
    pub booking_id: Option<Uuid>,
    pub package_id: Option<Uuid>,
    #[validate(length(max = 5000, message = "comments must be at most 5000 characters"))]
    pub comments: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReviewRequest {
    #[validate(range(min = 1, max = 5, message = "tourRating must be between 1 and 5"))]
    pub tour_rating: Option<u8>,
    pub recommend: Option<bool>,
    #[validate(custom(function = "crate::validation::not_blank", message = "name must not be blank"))]
    pub name: Option<String>,
    #[validate(email(message = "email is not valid"))]
    pub email: Option<String>,
    #[validate(length(max = 5000, message = "comments must be at most 5000 characters"))]
    pub comments: Option<String>,
}

impl Review {
    pub fn new(req: CreateReviewRequest) -> Self {
        let now = Utc::now();
        Review {
            id: Uuid::new_v4(),
            tour_rating: req.tour_rating,
            recommend: req.recommend,
            name: req.name.trim().to_string(),
            email: req.email.trim().to_string(),
            user_id: req.user_id,
            booking_id: req.booking_id,
            package_id: req.package_id,
            comments: req.comments,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, req: UpdateReviewRequest) {
        if let Some(v) = req.tour_rating {
            self.tour_rating = v;
        }
        if let Some(v) = req.recommend {
            self.recommend = v;
        }
        if let Some(v) = req.name {
            self.name = v.trim().to_string();
        }
        if let Some(v) = req.email {
            self.email = v.trim().to_string();
        }
        if req.comments.is_some() {
            self.comments = req.comments;
        }
        self.updated_at = Utc::now();
    }

    pub fn summary(&self) -> ReviewSummary {
        ReviewSummary {
            id: self.id,
            tour_rating: self.tour_rating,
            recommend: self.recommend,
            comments: self.comments.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSummary {
    pub id: Uuid,
    pub tour_rating: u8,
    pub recommend: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// 1-based page number
    pub page: Option<u32>,
    /// Page size (1..=100)
    pub limit: Option<u32>,
}

impl PageQuery {
    /// Clamp to a valid `(page, limit)` pair.
    pub fn resolve(self) -> (u32, u32) {
        let page = self.page.unwrap_or(1).max(1);
        let limit = self
            .limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        (page, limit)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewListItem {
    #[serde(flatten)]
    pub review: Review,
    /// Title of the tour plan the review's booking refers to, when resolvable
    pub tour_plan_title: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewPage {
    pub reviews: Vec<ReviewListItem>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u64,
}
