use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::common::lenient;
use super::tour_plan::TourPlan;

/// A destination address (country / state / city). The state is the media folder key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: Uuid,
    pub country: String,
    pub state: String,
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starting_price: Option<f64>,
    /// `[latitude, longitude]`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Vec<f64>>)]
    pub coordinates: Option<[f64; 2]>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAddressRequest {
    #[validate(custom(function = "crate::validation::not_blank", message = "country is required"))]
    pub country: String,
    #[validate(custom(function = "crate::validation::not_blank", message = "state is required"))]
    pub state: String,
    #[validate(custom(function = "crate::validation::not_blank", message = "city is required"))]
    pub city: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    #[validate(range(min = 0.0, message = "startingPrice must not be negative"))]
    pub starting_price: Option<f64>,
    #[serde(default)]
    #[validate(custom(function = "crate::validation::coordinates"))]
    pub coordinates: Option<Vec<f64>>,
}

/// Partial update; absent fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAddressRequest {
    #[validate(custom(function = "crate::validation::not_blank", message = "country must not be blank"))]
    pub country: Option<String>,
    #[validate(custom(function = "crate::validation::not_blank", message = "state must not be blank"))]
    pub state: Option<String>,
    #[validate(custom(function = "crate::validation::not_blank", message = "city must not be blank"))]
    pub city: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    #[validate(range(min = 0.0, message = "startingPrice must not be negative"))]
    pub starting_price: Option<f64>,
    #[serde(default)]
    #[validate(custom(function = "crate::validation::coordinates"))]
    pub coordinates: Option<Vec<f64>>,
}

fn to_pair(values: &[f64]) -> Option<[f64; 2]> {
    match values {
        [lat, lng] => Some([*lat, *lng]),
        _ => None,
    }
}

impl Address {
    /// Build a new record; `images` are the stored paths already ingested for it.
    pub fn new(req: CreateAddressRequest, images: Vec<String>) -> Self {
        let now = Utc::now();
        Address {
            id: Uuid::new_v4(),
            country: req.country.trim().to_string(),
            state: req.state.trim().to_string(),
            city: req.city.trim().to_string(),
            description: req.description,
            images,
            starting_price: req.starting_price,
            coordinates: req.coordinates.as_deref().and_then(to_pair),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, req: UpdateAddressRequest) {
        if let Some(country) = req.country {
            self.country = country.trim().to_string();
        }
        if let Some(state) = req.state {
            self.state = state.trim().to_string();
        }
        if let Some(city) = req.city {
            self.city = city.trim().to_string();
        }
        if req.description.is_some() {
            self.description = req.description;
        }
        if req.starting_price.is_some() {
            self.starting_price = req.starting_price;
        }
        if let Some(pair) = req.coordinates.as_deref().and_then(to_pair) {
            self.coordinates = Some(pair);
        }
        self.updated_at = Utc::now();
    }

    pub fn summary(&self) -> AddressSummary {
        AddressSummary {
            id: self.id,
            country: self.country.clone(),
            state: self.state.clone(),
            city: self.city.clone(),
            images: self.images.clone(),
            starting_price: self.starting_price,
        }
    }
}

/// Address fields embedded into joined views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddressSummary {
    pub id: Uuid,
    pub country: String,
    pub state: String,
    pub city: String,
    pub images: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starting_price: Option<f64>,
}

/// Map pin view of an address.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddressPin {
    pub id: Uuid,
    pub city_name: String,
    #[schema(value_type = Vec<f64>)]
    pub coordinates: [f64; 2],
    pub starting_price: f64,
}

impl AddressPin {
    /// `None` unless the address has a city, coordinates and a starting price.
    pub fn from_address(address: &Address) -> Option<Self> {
        if address.city.is_empty() {
            return None;
        }
        Some(AddressPin {
            id: address.id,
            city_name: address.city.clone(),
            coordinates: address.coordinates?,
            starting_price: address.starting_price?,
        })
    }
}

/// Addresses grouped by the tour type of the plans linked to them.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct AddressesByTourType {
    pub domestic: Vec<Address>,
    pub international: Vec<Address>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddressWithTourPlans {
    #[serde(flatten)]
    pub address: Address,
    pub tour_plans: Vec<TourPlan>,
}

/// List filters for addresses (exact matches).
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AddressQuery {
    pub country: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
}
