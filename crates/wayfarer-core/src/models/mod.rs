//! Domain models
//!
//! Records are stored as camelCase JSON documents, which is also their wire format.

pub mod address;
pub mod booking;
pub mod catalog;
pub mod common;
pub mod place;
pub mod quote;
pub mod review;
pub mod theme;
pub mod tour_plan;

pub use address::{
    Address, AddressPin, AddressQuery, AddressSummary, AddressWithTourPlans, AddressesByTourType,
    CreateAddressRequest, UpdateAddressRequest,
};
pub use booking::{Booking, BookingQuery, CreateBookingRequest, UpdateBookingRequest};
pub use catalog::{CategoryGroup, StateBucket, TourCatalog, TourCategory, TrendingState};
pub use common::{DeleteResponse, Flag};
pub use place::{
    CityView, CreatePlaceRequest, NetworkSettings, Place, PlaceQuery, PlaceSummary, PlaceType, Season,
    TransportOption, UpdatePlaceRequest, WeatherInfo,
};
pub use quote::{CreateQuoteRequest, Quote, QuoteStatus, UpdateQuoteStatusRequest};
pub use review::{
    CreateReviewRequest, PageQuery, Review, ReviewListItem, ReviewPage, ReviewSummary,
    UpdateReviewRequest,
};
pub use theme::{CreateThemeRequest, Theme, ThemeSummary, UpdateThemeRequest};
pub use tour_plan::{
    CreateTourPlanRequest, ItineraryDay, TourPlan, TourPlanQuery, TourPlanView, TourType,
    UpdateTourPlanRequest,
};
