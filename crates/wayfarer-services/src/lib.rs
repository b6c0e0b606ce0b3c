//! Wayfarer Services Layer
//!
//! The entity record store: one service per record type, each composing the document
//! store with the entity-scoped media store on create, update and delete. The API crate
//! depends on the [`Services`] facade and keeps HTTP handling thin.

pub mod address;
pub mod booking;
pub mod catalog;
pub mod media;
pub mod place;
pub mod quote;
pub mod review;
pub mod theme;
pub mod tour_plan;

#[cfg(test)]
pub(crate) mod testing;

use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use wayfarer_core::AppError;
use wayfarer_db::DocumentStore;
use wayfarer_storage::MediaStore;

pub use address::AddressService;
pub use booking::BookingService;
pub use catalog::build_catalog;
pub use media::MediaService;
pub use place::PlaceService;
pub use quote::QuoteService;
pub use review::ReviewService;
pub use theme::ThemeService;
pub use tour_plan::TourPlanService;

/// Stored JSON form of a value, for use in filters.
pub(crate) fn wire<T: Serialize>(value: &T) -> Result<Value, AppError> {
    serde_json::to_value(value)
        .map_err(|e| AppError::Internal(format!("Failed to encode filter value: {}", e)))
}

/// All entity services sharing one document store and one media store.
#[derive(Clone)]
pub struct Services {
    pub media: MediaService,
    pub addresses: AddressService,
    pub places: PlaceService,
    pub themes: ThemeService,
    pub tour_plans: TourPlanService,
    pub bookings: BookingService,
    pub reviews: ReviewService,
    pub quotes: QuoteService,
}

impl Services {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        media_store: Arc<dyn MediaStore>,
        trending_states: Vec<String>,
    ) -> Self {
        let media = MediaService::new(media_store);
        Services {
            addresses: AddressService::new(store.clone(), media.clone()),
            places: PlaceService::new(store.clone(), media.clone()),
            themes: ThemeService::new(store.clone(), media.clone()),
            tour_plans: TourPlanService::new(store.clone(), media.clone(), trending_states),
            bookings: BookingService::new(store.clone()),
            reviews: ReviewService::new(store.clone()),
            quotes: QuoteService::new(store),
            media,
        }
    }
}
