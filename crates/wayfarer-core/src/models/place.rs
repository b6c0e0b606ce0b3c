use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::address::AddressSummary;
use super::common::{lenient, Flag};

/// Position of a place in the city / sub-place hierarchy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PlaceType {
    #[default]
    City,
    SubPlace,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct TransportOption {
    pub mode: Option<String>,
    pub from: Option<String>,
    pub end: Option<String>,
    pub distance: Option<String>,
    pub duration: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct NetworkSettings {
    pub internet_availability: String,
    pub std_code: Option<String>,
    pub language_spoken: Vec<String>,
    pub major_festivals: Vec<String>,
    pub notes_or_tips: Option<String>,
}

impl Default for NetworkSettings {
    fn default() -> Self {
        NetworkSettings {
            internet_availability: "Moderate".to_string(),
            std_code: None,
            language_spoken: Vec::new(),
            major_festivals: Vec::new(),
            notes_or_tips: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct Season {
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct WeatherInfo {
    pub season: Vec<Season>,
    pub nearest_city: Option<String>,
    pub peak_season: Option<String>,
}

/// A city or a sub-place inside a city. The name is the media folder key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub id: Uuid,
    pub name: String,
    pub place_title: String,
    pub ideal_trip_duration: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub place_type: PlaceType,
    /// Address the place belongs to
    pub state: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_place: Option<Uuid>,
    /// Denormalized child set, maintained with add-to-set / pull semantics
    #[serde(default)]
    pub sub_places: Vec<Uuid>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_time_to_visit: Option<String>,
    #[serde(default)]
    pub transport: Vec<TransportOption>,
    #[serde(default)]
    pub network_settings: NetworkSettings,
    #[serde(default)]
    pub weather_info: WeatherInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub travel_tips: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transport_option: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub must_visit: Option<String>,
    #[serde(default)]
    pub place_popular: Flag,
    #[serde(default)]
    pub place_top: Flag,
    #[serde(default)]
    pub most_popular: Flag,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlaceRequest {
    #[validate(custom(function = "crate::validation::not_blank", message = "name is required"))]
    pub name: String,
    #[validate(custom(function = "crate::validation::not_blank", message = "placeTitle is required"))]
    pub place_title: String,
    #[validate(custom(
        function = "crate::validation::not_blank",
        message = "idealTripDuration is required"
    ))]
    pub ideal_trip_duration: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "type")]
    pub place_type: PlaceType,
    pub state: Uuid,
    #[serde(default, deserialize_with = "lenient::opt_uuid")]
    pub parent_place: Option<Uuid>,
    #[serde(default, alias = "bestTimetoVisit")]
    pub best_time_to_visit: Option<String>,
    #[serde(default)]
    pub transport: Vec<TransportOption>,
    #[serde(default)]
    pub network_settings: Option<NetworkSettings>,
    #[serde(default)]
    pub weather_info: Option<WeatherInfo>,
    #[serde(default)]
    pub distance: Option<String>,
    #[serde(default)]
    pub place_location: Option<String>,
    #[serde(default, alias = "travelTipes")]
    pub travel_tips: Option<String>,
    #[serde(default)]
    pub transport_option: Option<String>,
    #[serde(default)]
    pub must_visit: Option<String>,
    #[serde(default)]
    pub place_popular: Flag,
    #[serde(default)]
    pub place_top: Flag,
    #[serde(default)]
    pub most_popular: Flag,
}

/// Partial update. `type` and `parentPlace` are accepted only when they repeat the current value.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePlaceRequest {
    #[validate(custom(function = "crate::validation::not_blank", message = "name must not be blank"))]
    pub name: Option<String>,
    #[validate(custom(
        function = "crate::validation::not_blank",
        message = "placeTitle must not be blank"
    ))]
    pub place_title: Option<String>,
    #[validate(custom(
        function = "crate::validation::not_blank",
        message = "idealTripDuration must not be blank"
    ))]
    pub ideal_trip_duration: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub place_type: Option<PlaceType>,
    pub state: Option<Uuid>,
    #[serde(default, deserialize_with = "lenient::opt_uuid")]
    pub parent_place: Option<Uuid>,
    #[serde(alias = "bestTimetoVisit")]
    pub best_time_to_visit: Option<String>,
    pub transport: Option<Vec<TransportOption>>,
    pub network_settings: Option<NetworkSettings>,
    pub weather_info: Option<WeatherInfo>,
    pub distance: Option<String>,
    pub place_location: Option<String>,
    #[serde(alias = "travelTipes")]
    pub travel_tips: Option<String>,
    pub transport_option: Option<String>,
    pub must_visit: Option<String>,
    pub place_popular: Option<Flag>,
    pub place_top: Option<Flag>,
    pub most_popular: Option<Flag>,
}

impl Place {
    pub fn new(req: CreatePlaceRequest, images: Vec<String>) -> Self {
        let now = Utc::now();
        Place {
            id: Uuid::new_v4(),
            name: req.name.trim().to_string(),
            place_title: req.place_title,
            ideal_trip_duration: req.ideal_trip_duration,
            description: req.description,
            place_type: req.place_type,
            state: req.state,
            parent_place: match req.place_type {
                PlaceType::City => None,
                PlaceType::SubPlace => req.parent_place,
            },
            sub_places: Vec::new(),
            images,
            best_time_to_visit: req.best_time_to_visit,
            transport: req.transport,
            network_settings: req.network_settings.unwrap_or_default(),
            weather_info: req.weather_info.unwrap_or_default(),
            distance: req.distance,
            place_location: req.place_location,
            travel_tips: req.travel_tips,
            transport_option: req.transport_option,
            must_visit: req.must_visit,
            place_popular: req.place_popular,
            place_top: req.place_top,
            most_popular: req.most_popular,
            created_at: now,
            updated_at: now,
        }
    }

    /// Merge an update. Hierarchy fields are never touched here.
    pub fn apply(&mut self, req: UpdatePlaceRequest) {
        if let Some(name) = req.name {
            self.name = name.trim().to_string();
        }
        if let Some(v) = req.place_title {
            self.place_title = v;
        }
        if let Some(v) = req.ideal_trip_duration {
            self.ideal_trip_duration = v;
        }
        if req.description.is_some() {
            self.description = req.description;
        }
        if let Some(state) = req.state {
            self.state = state;
        }
        if req.best_time_to_visit.is_some() {
            self.best_time_to_visit = req.best_time_to_visit;
        }
        if let Some(v) = req.transport {
            self.transport = v;
        }
        if let Some(v) = req.network_settings {
            self.network_settings = v;
        }
        if let Some(v) = req.weather_info {
            self.weather_info = v;
        }
        if req.distance.is_some() {
            self.distance = req.distance;
        }
        if req.place_location.is_some() {
            self.place_location = req.place_location;
        }
        if req.travel_tips.is_some() {
            self.travel_tips = req.travel_tips;
        }
        if req.transport_option.is_some() {
            self.transport_option = req.transport_option;
        }
        if req.must_visit.is_some() {
            self.must_visit = req.must_visit;
        }
        if let Some(v) = req.place_popular {
            self.place_popular = v;
        }
        if let Some(v) = req.place_top {
            self.place_top = v;
        }
        if let Some(v) = req.most_popular {
            self.most_popular = v;
        }
        self.updated_at = Utc::now();
    }

    pub fn is_city(&self) -> bool {
        self.place_type == PlaceType::City
    }

    pub fn summary(&self) -> PlaceSummary {
        PlaceSummary {
            id: self.id,
            name: self.name.clone(),
            description: self.description.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PlaceSummary {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A city with its address resolved.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CityView {
    #[serde(flatten)]
    pub place: Place,
    pub state_details: Option<AddressSummary>,
}

/// List filters for places.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PlaceQuery {
    #[serde(rename = "type")]
    pub place_type: Option<PlaceType>,
    /// Address id
    pub state: Option<Uuid>,
    pub parent_place: Option<Uuid>,
    pub name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_from_minimal_payload() {
        let req: CreatePlaceRequest = serde_json::from_value(json!({
            "name": "Jaipur",
            "placeTitle": "Pink City",
            "idealTripDuration": "3 days",
            "state": Uuid::new_v4(),
        }))
        .unwrap();
        assert_eq!(req.place_type, PlaceType::City);
        assert!(req.validate().is_ok());

        let place = Place::new(req, vec![]);
        assert_eq!(place.network_settings.internet_availability, "Moderate");
        assert_eq!(place.most_popular, Flag::No);
        assert!(place.parent_place.is_none());
    }

    #[test]
    fn test_legacy_field_aliases() {
        let req: CreatePlaceRequest = serde_json::from_value(json!({
            "name": "Amer Fort",
            "placeTitle": "Fort",
            "idealTripDuration": "half day",
            "state": Uuid::new_v4(),
            "type": "sub_place",
            "parentPlace": Uuid::new_v4(),
            "bestTimetoVisit": "Winter",
            "travelTipes": "Start early",
        }))
        .unwrap();
        assert_eq!(req.place_type, PlaceType::SubPlace);
        assert_eq!(req.best_time_to_visit.as_deref(), Some("Winter"));
        assert_eq!(req.travel_tips.as_deref(), Some("Start early"));
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let result = serde_json::from_value::<CreatePlaceRequest>(json!({
            "name": "X",
            "placeTitle": "X",
            "idealTripDuration": "1 day",
            "state": Uuid::new_v4(),
            "type": "country",
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_city_never_keeps_parent() {
        let req = CreatePlaceRequest {
            name: "Jaipur".to_string(),
            place_title: "Pink City".to_string(),
            ideal_trip_duration: "2 days".to_string(),
            state: Uuid::new_v4(),
            parent_place: Some(Uuid::new_v4()),
            ..Default::default()
        };
        assert!(Place::new(req, vec![]).parent_place.is_none());
    }
}
