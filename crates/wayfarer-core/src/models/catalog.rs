use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::tour_plan::TourPlanView;

/// Storefront categories, in first-match order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum TourCategory {
    #[serde(rename = "Top_destinations")]
    TopDestinations,
    Honeymoon,
    Wildlife,
    #[serde(rename = "Hill_stations")]
    HillStations,
    Heritage,
    Pilgrimage,
    Beach,
}

impl TourCategory {
    pub const ORDERED: [TourCategory; 7] = [
        TourCategory::TopDestinations,
        TourCategory::Honeymoon,
        TourCategory::Wildlife,
        TourCategory::HillStations,
        TourCategory::Heritage,
        TourCategory::Pilgrimage,
        TourCategory::Beach,
    ];

    /// Lower-case theme name that selects this category.
    pub fn theme_name(self) -> &'static str {
        match self {
            TourCategory::TopDestinations => "top destinations",
            TourCategory::Honeymoon => "honeymoon",
            TourCategory::Wildlife => "wildlife",
            TourCategory::HillStations => "hill stations",
            TourCategory::Heritage => "heritage",
            TourCategory::Pilgrimage => "pilgrimage",
            TourCategory::Beach => "beach",
        }
    }
}

/// One state inside a category bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StateBucket {
    pub state: String,
    /// Lowest starting price seen for the state
    pub starting_price: Option<f64>,
    pub image: String,
    pub tour_plan_count: usize,
    pub tour_plans: Vec<TourPlanView>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrendingState {
    pub state: String,
    pub starting_price: Option<f64>,
    pub image: String,
    pub tour_plans: Vec<TourPlanView>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CategoryGroup {
    pub category: TourCategory,
    pub states: Vec<StateBucket>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TourCatalog {
    pub trending_categories: Vec<TrendingState>,
    pub data: Vec<CategoryGroup>,
}
