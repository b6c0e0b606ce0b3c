//! Reviews. A review with a `packageId` is also listed in that tour plan's `reviews` set.

use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;
use wayfarer_core::models::{
    Booking, CreateReviewRequest, PageQuery, Review, ReviewListItem, ReviewPage, TourPlan,
    UpdateReviewRequest,
};
use wayfarer_core::AppError;
use wayfarer_db::{DocumentStore, Filter, FindOptions, Repository};

const REVIEWS_FIELD: &str = "reviews";

#[derive(Clone)]
pub struct ReviewService {
    reviews: Repository<Review>,
    bookings: Repository<Booking>,
    tour_plans: Repository<TourPlan>,
}

impl ReviewService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            reviews: Repository::new(store.clone()),
            bookings: Repository::new(store.clone()),
            tour_plans: Repository::new(store),
        }
    }

    #[tracing::instrument(skip(self, req), fields(db.table = "reviews", db.operation = "insert"))]
    pub async fn create(&self, req: CreateReviewRequest) -> Result<Review, AppError> {
        req.validate()?;
        if let Some(package_id) = req.package_id {
            if self.tour_plans.get(package_id).await?.is_none() {
                return Err(AppError::InvalidInput(format!(
                    "packageId references unknown tour plan {}",
                    package_id
                )));
            }
        }
        if let Some(booking_id) = req.booking_id {
            if self.bookings.get(booking_id).await?.is_none() {
                return Err(AppError::InvalidInput(format!(
                    "bookingId references unknown booking {}",
                    booking_id
                )));
            }
        }

        let review = Review::new(req);
        self.reviews.insert(&review).await?;
        if let Some(package_id) = review.package_id {
            self.tour_plans
                .add_to_set(package_id, REVIEWS_FIELD, review.id)
                .await?;
        }

        tracing::info!(review_id = %review.id, rating = review.tour_rating, "Review created");
        Ok(review)
    }

    /// One page of reviews, newest first, with the reviewed tour plan's title.
    pub async fn list(&self, query: PageQuery) -> Result<ReviewPage, AppError> {
        let (page, limit) = query.resolve();
        let all = Filter::new();
        let total = self.reviews.count(&all).await?;
        let offset = u64::from(page - 1) * u64::from(limit);
        let reviews = self
            .reviews
            .find_with(
                &all,
                FindOptions::newest_first().page(offset, u64::from(limit)),
            )
            .await?;

        let mut booking_ids: Vec<Uuid> = reviews.iter().filter_map(|r| r.booking_id).collect();
        booking_ids.sort();
        booking_ids.dedup();
        let bookings: HashMap<Uuid, Uuid> = self
            .bookings
            .get_many(&booking_ids)
            .await?
            .into_iter()
            .map(|b| (b.id, b.package_id))
            .collect();

        let package_of = |review: &Review| {
            review
                .booking_id
                .and_then(|id| bookings.get(&id).copied())
                .or(review.package_id)
        };
        let mut plan_ids: Vec<Uuid> = reviews.iter().filter_map(package_of).collect();
        plan_ids.sort();
        plan_ids.dedup();
        let titles: HashMap<Uuid, String> = self
            .tour_plans
            .get_many(&plan_ids)
            .await?
            .into_iter()
            .map(|p| (p.id, p.title))
            .collect();

        let items = reviews
            .into_iter()
            .map(|review| ReviewListItem {
                tour_plan_title: package_of(&review).and_then(|id| titles.get(&id).cloned()),
                review,
            })
            .collect();

        Ok(ReviewPage {
            reviews: items,
            total,
            page,
            limit,
            total_pages: total.div_ceil(u64::from(limit)),
        })
    }

    /// Reviews of one tour plan, newest first.
    pub async fn by_tour_plan(&self, plan_id: Uuid) -> Result<Vec<Review>, AppError> {
        if self.tour_plans.get(plan_id).await?.is_none() {
            return Err(AppError::not_found("Tour plan", plan_id));
        }
        self.reviews
            .find_with(
                &Filter::new().eq("packageId", plan_id.to_string()),
                FindOptions::newest_first(),
            )
            .await
    }

    pub async fn get(&self, id: Uuid) -> Result<Review, AppError> {
        self.reviews
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found("Review", id))
    }

    #[tracing::instrument(skip(self, req), fields(db.table = "reviews", db.operation = "update"))]
    pub async fn update(&self, id: Uuid, req: UpdateReviewRequest) -> Result<Review, AppError> {
        req.validate()?;
        let mut review = self.get(id).await?;
        review.apply(req);
        if !self.reviews.replace(&review).await? {
            return Err(AppError::not_found("Review", id));
        }
        Ok(review)
    }

    #[tracing::instrument(skip(self), fields(db.table = "reviews", db.operation = "delete"))]
    pub async fn delete(&self, id: Uuid) -> Result<Review, AppError> {
        let review = self
            .reviews
            .delete(id)
            .await?
            .ok_or_else(|| AppError::not_found("Review", id))?;
        if let Some(package_id) = review.package_id {
            if let Err(e) = self.tour_plans.pull(package_id, REVIEWS_FIELD, review.id).await {
                tracing::warn!(review_id = %id, tour_plan_id = %package_id, error = %e, "Failed to unlink deleted review from tour plan");
            }
        }
        Ok(review)
    }
}
