use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::address::AddressSummary;
use super::common::{lenient, Flag};
use super::place::PlaceSummary;
use super::review::ReviewSummary;
use super::theme::ThemeSummary;

/// Domestic or international tour
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum TourType {
    #[default]
    #[serde(rename = "D", alias = "d")]
    Domestic,
    #[serde(rename = "I", alias = "i")]
    International,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct ItineraryDay {
    #[serde(deserialize_with = "lenient::opt_u32")]
    pub day: Option<u32>,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub places: Vec<String>,
}

/// A bookable tour package. The tour code is the media folder key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TourPlan {
    pub id: Uuid,
    pub tour_code: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub it_summary_title: Option<String>,
    pub address_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_place: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_place: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_fare: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orig_fare: Option<f64>,
    #[serde(default)]
    pub tour_type: TourType,
    #[serde(default)]
    pub it_popular: Flag,
    #[serde(default)]
    pub it_top: Flag,
    #[serde(default)]
    pub it_tour_plan: Flag,
    #[serde(default)]
    pub itinerary: Vec<ItineraryDay>,
    #[serde(default)]
    pub inclusions: Vec<String>,
    #[serde(default)]
    pub exclusions: Vec<String>,
    #[serde(default)]
    pub optional: Vec<String>,
    #[serde(default)]
    pub theme_ids: Vec<Uuid>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub reviews: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTourPlanRequest {
    #[validate(custom(function = "crate::validation::tour_code"))]
    pub tour_code: String,
    #[validate(custom(function = "crate::validation::not_blank", message = "title is required"))]
    pub title: String,
    #[serde(default)]
    pub it_summary_title: Option<String>,
    pub address_id: Uuid,
    #[serde(default, deserialize_with = "lenient::opt_uuid")]
    pub start_place: Option<Uuid>,
    #[serde(default, deserialize_with = "lenient::opt_uuid")]
    pub end_place: Option<Uuid>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub enable_icon: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    #[validate(range(min = 0.0, message = "baseFare must not be negative"))]
    pub base_fare: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    #[validate(range(min = 0.0, message = "origFare must not be negative"))]
    pub orig_fare: Option<f64>,
    #[serde(default)]
    pub tour_type: TourType,
    #[serde(default)]
    pub it_popular: Flag,
    #[serde(default)]
    pub it_top: Flag,
    #[serde(default)]
    pub it_tour_plan: Flag,
    #[serde(default)]
    pub itinerary: Vec<ItineraryDay>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub inclusions: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub exclusions: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub optional: Vec<String>,
    #[serde(default, alias = "themeId", deserialize_with = "lenient::uuid_list")]
    pub theme_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTourPlanRequest {
    #[validate(custom(function = "crate::validation::tour_code"))]
    pub tour_code: Option<String>,
    #[validate(custom(function = "crate::validation::not_blank", message = "title must not be blank"))]
    pub title: Option<String>,
    pub it_summary_title: Option<String>,
    pub address_id: Option<Uuid>,
    #[serde(default, deserialize_with = "lenient::opt_uuid")]
    pub start_place: Option<Uuid>,
    #[serde(default, deserialize_with = "lenient::opt_uuid")]
    pub end_place: Option<Uuid>,
    pub duration: Option<String>,
    pub enable_icon: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    #[validate(range(min = 0.0, message = "baseFare must not be negative"))]
    pub base_fare: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    #[validate(range(min = 0.0, message = "origFare must not be negative"))]
    pub orig_fare: Option<f64>,
    pub tour_type: Option<TourType>,
    pub it_popular: Option<Flag>,
    pub it_top: Option<Flag>,
    pub it_tour_plan: Option<Flag>,
    pub itinerary: Option<Vec<ItineraryDay>>,
    #[serde(default, deserialize_with = "lenient::opt_string_list")]
    pub inclusions: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient::opt_string_list")]
    pub exclusions: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient::opt_string_list")]
    pub optional: Option<Vec<String>>,
    #[serde(default, alias = "themeId", deserialize_with = "lenient::opt_uuid_list")]
    pub theme_ids: Option<Vec<Uuid>>,
}

/// Tour codes are compared and stored upper-case.
pub fn normalize_tour_code(raw: &str) -> String {
    raw.trim().to_uppercase()
}

impl TourPlan {
    pub fn new(req: CreateTourPlanRequest, images: Vec<String>) -> Self {
        let now = Utc::now();
        TourPlan {
            id: Uuid::new_v4(),
            tour_code: normalize_tour_code(&req.tour_code),
            title: req.title.trim().to_string(),
            it_summary_title: req.it_summary_title,
            address_id: req.address_id,
            start_place: req.start_place,
            end_place: req.end_place,
            duration: req.duration,
            enable_icon: req.enable_icon,
            base_fare: req.base_fare,
            orig_fare: req.orig_fare,
            tour_type: req.tour_type,
            it_popular: req.it_popular,
            it_top: req.it_top,
            it_tour_plan: req.it_tour_plan,
            itinerary: req.itinerary,
            inclusions: req.inclusions,
            exclusions: req.exclusions,
            optional: req.optional,
            theme_ids: dedup(req.theme_ids),
            images,
            reviews: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, req: UpdateTourPlanRequest) {
        if let Some(code) = req.tour_code {
            self.tour_code = normalize_tour_code(&code);
        }
        if let Some(title) = req.title {
            self.title = title.trim().to_string();
        }
        if req.it_summary_title.is_some() {
            self.it_summary_title = req.it_summary_title;
        }
        if let Some(id) = req.address_id {
            self.address_id = id;
        }
        if req.start_place.is_some() {
            self.start_place = req.start_place;
        }
        if req.end_place.is_some() {
            self.end_place = req.end_place;
        }
        if req.duration.is_some() {
            self.duration = req.duration;
        }
        if req.enable_icon.is_some() {
            self.enable_icon = req.enable_icon;
        }
        if req.base_fare.is_some() {
            self.base_fare = req.base_fare;
        }
        if req.orig_fare.is_some() {
            self.orig_fare = req.orig_fare;
        }
        if let Some(v) = req.tour_type {
            self.tour_type = v;
        }
        if let Some(v) = req.it_popular {
            self.it_popular = v;
        }
        if let Some(v) = req.it_top {
            self.it_top = v;
        }
        if let Some(v) = req.it_tour_plan {
            self.it_tour_plan = v;
        }
        if let Some(v) = req.itinerary {
            self.itinerary = v;
        }
        if let Some(v) = req.inclusions {
            self.inclusions = v;
        }
        if let Some(v) = req.exclusions {
            self.exclusions = v;
        }
        if let Some(v) = req.optional {
            self.optional = v;
        }
        if let Some(v) = req.theme_ids {
            self.theme_ids = dedup(v);
        }
        self.updated_at = Utc::now();
    }
}

fn dedup(ids: Vec<Uuid>) -> Vec<Uuid> {
    let mut out: Vec<Uuid> = Vec::with_capacity(ids.len());
    for id in ids {
        if !out.contains(&id) {
            out.push(id);
        }
    }
    out
}

/// A tour plan with its references resolved to summaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TourPlanView {
    #[serde(flatten)]
    pub plan: TourPlan,
    pub address_details: Option<AddressSummary>,
    pub start_place_details: Option<PlaceSummary>,
    pub end_place_details: Option<PlaceSummary>,
    pub themes: Vec<ThemeSummary>,
    pub review_details: Vec<ReviewSummary>,
}

/// List filters for tour plans.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct TourPlanQuery {
    /// Case-insensitive
    pub tour_code: Option<String>,
    pub address_id: Option<Uuid>,
    pub tour_type: Option<TourType>,
    pub it_top: Option<Flag>,
    pub it_popular: Option<Flag>,
}
