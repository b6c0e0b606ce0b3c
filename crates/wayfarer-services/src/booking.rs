use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;
use wayfarer_core::models::{
    Booking, BookingQuery, CreateBookingRequest, TourPlan, UpdateBookingRequest,
};
use wayfarer_core::AppError;
use wayfarer_db::{DocumentStore, Filter, FindOptions, Repository};

#[derive(Clone)]
pub struct BookingService {
    bookings: Repository<Booking>,
    tour_plans: Repository<TourPlan>,
}

impl BookingService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            bookings: Repository::new(store.clone()),
            tour_plans: Repository::new(store),
        }
    }

    #[tracing::instrument(skip(self, req), fields(db.table = "bookings", db.operation = "insert"))]
    pub async fn create(&self, req: CreateBookingRequest) -> Result<Booking, AppError> {
        req.validate()?;
        if self.tour_plans.get(req.package_id).await?.is_none() {
            return Err(AppError::InvalidInput(format!(
                "packageId references unknown tour plan {}",
                req.package_id
            )));
        }

        let booking = Booking::new(req);
        self.bookings.insert(&booking).await?;
        tracing::info!(booking_id = %booking.id, order_id = %booking.order_id, "Booking created");
        Ok(booking)
    }

    /// Newest bookings first.
    pub async fn list(&self, query: BookingQuery) -> Result<Vec<Booking>, AppError> {
        let filter = Filter::new()
            .eq_opt("userId", query.user_id)
            .eq_opt("packageId", query.package_id.map(|id| id.to_string()))
            .eq_opt("status", query.status)
            .eq_opt("email", query.email);
        self.bookings
            .find_with(&filter, FindOptions::newest_first())
            .await
    }

    pub async fn get(&self, id: Uuid) -> Result<Booking, AppError> {
        self.bookings
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found("Booking", id))
    }

    #[tracing::instrument(skip(self, req), fields(db.table = "bookings", db.operation = "update"))]
    pub async fn update(&self, id: Uuid, req: UpdateBookingRequest) -> Result<Booking, AppError> {
        req.validate()?;
        let mut booking = self.get(id).await?;
        booking.apply(req);
        if !self.bookings.replace(&booking).await? {
            return Err(AppError::not_found("Booking", id));
        }
        Ok(booking)
    }

    #[tracing::instrument(skip(self), fields(db.table = "bookings", db.operation = "delete"))]
    pub async fn delete(&self, id: Uuid) -> Result<Booking, AppError> {
        self.bookings
            .delete(id)
            .await?
            .ok_or_else(|| AppError::not_found("Booking", id))
    }
}
