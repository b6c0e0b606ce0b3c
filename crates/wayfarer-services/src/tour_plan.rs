//! Tour plans. The upper-cased tour code keys the `tourPlans` media root.

use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;
use wayfarer_core::models::tour_plan::normalize_tour_code;
use wayfarer_core::models::{
    Address, CreateTourPlanRequest, Place, Review, Theme, TourCatalog, TourPlan, TourPlanQuery,
    TourPlanView, UpdateTourPlanRequest,
};
use wayfarer_core::AppError;
use wayfarer_db::{Document, DocumentStore, Filter, Repository};
use wayfarer_storage::{MediaFile, MediaRoot, TransientFile};

use crate::catalog::build_catalog;
use crate::media::{folder_users, merge_images, MediaService};
use crate::wire;

const ROOT: MediaRoot = MediaRoot::TourPlans;
const KEY_FIELD: &str = "tourCode";

fn unique(ids: impl IntoIterator<Item = Uuid>) -> Vec<Uuid> {
    let mut ids: Vec<Uuid> = ids.into_iter().collect();
    ids.sort();
    ids.dedup();
    ids
}

fn by_id<T: Document>(records: Vec<T>) -> HashMap<Uuid, T> {
    records.into_iter().map(|r| (r.id(), r)).collect()
}

#[derive(Clone)]
pub struct TourPlanService {
    tour_plans: Repository<TourPlan>,
    addresses: Repository<Address>,
    places: Repository<Place>,
    themes: Repository<Theme>,
    reviews: Repository<Review>,
    media: MediaService,
    trending_states: Arc<Vec<String>>,
}

impl TourPlanService {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        media: MediaService,
        trending_states: Vec<String>,
    ) -> Self {
        Self {
            tour_plans: Repository::new(store.clone()),
            addresses: Repository::new(store.clone()),
            places: Repository::new(store.clone()),
            themes: Repository::new(store.clone()),
            reviews: Repository::new(store),
            media,
            trending_states: Arc::new(trending_states),
        }
    }

    /// Every referenced record must exist.
    async fn check_references(&self, plan: &TourPlan) -> Result<(), AppError> {
        if self.addresses.get(plan.address_id).await?.is_none() {
            return Err(AppError::InvalidInput(format!(
                "addressId references unknown address {}",
                plan.address_id
            )));
        }

        let place_ids = unique(plan.start_place.into_iter().chain(plan.end_place));
        if self.places.get_many(&place_ids).await?.len() != place_ids.len() {
            return Err(AppError::InvalidInput(
                "startPlace or endPlace references an unknown place".to_string(),
            ));
        }

        let theme_ids = unique(plan.theme_ids.iter().copied());
        if self.themes.get_many(&theme_ids).await?.len() != theme_ids.len() {
            return Err(AppError::InvalidInput(
                "themeIds references an unknown theme".to_string(),
            ));
        }
        Ok(())
    }

    /// Resolve references into summaries, one lookup per referenced collection.
    async fn join(&self, plans: Vec<TourPlan>) -> Result<Vec<TourPlanView>, AppError> {
        let addresses = by_id(
            self.addresses
                .get_many(&unique(plans.iter().map(|p| p.address_id)))
                .await?,
        );
        let places = by_id(
            self.places
                .get_many(&unique(
                    plans
                        .iter()
                        .flat_map(|p| p.start_place.into_iter().chain(p.end_place)),
                ))
                .await?,
        );
        let themes = by_id(
            self.themes
                .get_many(&unique(plans.iter().flat_map(|p| p.theme_ids.iter().copied())))
                .await?,
        );
        let reviews = by_id(
            self.reviews
                .get_many(&unique(plans.iter().flat_map(|p| p.reviews.iter().copied())))
                .await?,
        );

        Ok(plans
            .into_iter()
            .map(|plan| TourPlanView {
                address_details: addresses.get(&plan.address_id).map(Address::summary),
                start_place_details: plan
                    .start_place
                    .and_then(|id| places.get(&id))
                    .map(Place::summary),
                end_place_details: plan
                    .end_place
                    .and_then(|id| places.get(&id))
                    .map(Place::summary),
                themes: plan
                    .theme_ids
                    .iter()
                    .filter_map(|id| themes.get(id))
                    .map(Theme::summary)
                    .collect(),
                review_details: plan
                    .reviews
                    .iter()
                    .filter_map(|id| reviews.get(id))
                    .map(Review::summary)
                    .collect(),
                plan,
            })
            .collect())
    }

    async fn join_one(&self, plan: TourPlan) -> Result<TourPlanView, AppError> {
        let id = plan.id;
        self.join(vec![plan])
            .await?
            .pop()
            .ok_or_else(|| AppError::not_found("Tour plan", id))
    }

    #[tracing::instrument(skip(self, req, files), fields(db.table = "tour_plans", db.operation = "insert", files = files.len()))]
    pub async fn create(
        &self,
        req: CreateTourPlanRequest,
        files: Vec<TransientFile>,
    ) -> Result<TourPlan, AppError> {
        req.validate()?;
        let tour_code = normalize_tour_code(&req.tour_code);
        let mut plan = TourPlan::new(req, Vec::new());
        self.check_references(&plan).await?;

        plan.images = self.media.store_images(ROOT, &tour_code, files).await?;
        self.tour_plans.insert(&plan).await?;

        tracing::info!(tour_plan_id = %plan.id, tour_code = %plan.tour_code, images = plan.images.len(), "Tour plan created");
        Ok(plan)
    }

    pub async fn list(&self, query: TourPlanQuery) -> Result<Vec<TourPlanView>, AppError> {
        let mut filter = Filter::new().eq_opt("addressId", query.address_id.map(|id| id.to_string()));
        if let Some(code) = query.tour_code {
            filter = filter.eq_ignore_case("tourCode", code.trim());
        }
        if let Some(tour_type) = query.tour_type {
            filter = filter.eq("tourType", wire(&tour_type)?);
        }
        if let Some(flag) = query.it_top {
            filter = filter.eq("itTop", wire(&flag)?);
        }
        if let Some(flag) = query.it_popular {
            filter = filter.eq("itPopular", wire(&flag)?);
        }
        let plans = self.tour_plans.find(&filter).await?;
        self.join(plans).await
    }

    pub async fn get(&self, id: Uuid) -> Result<TourPlan, AppError> {
        self.tour_plans
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found("Tour plan", id))
    }

    pub async fn get_view(&self, id: Uuid) -> Result<TourPlanView, AppError> {
        let plan = self.get(id).await?;
        self.join_one(plan).await
    }

    /// Plans of every address in `state` (case-insensitive).
    pub async fn by_state(&self, state: &str) -> Result<Vec<TourPlanView>, AppError> {
        let addresses = self
            .addresses
            .find(&Filter::new().eq_ignore_case("state", state.trim()))
            .await?;
        if addresses.is_empty() {
            return Err(AppError::NotFound(format!(
                "No address found for state {}",
                state
            )));
        }

        let mut plans = Vec::new();
        for address in &addresses {
            plans.extend(
                self.tour_plans
                    .find(&Filter::new().eq("addressId", address.id.to_string()))
                    .await?,
            );
        }
        if plans.is_empty() {
            return Err(AppError::NotFound(format!(
                "No tour plans found for state {}",
                state
            )));
        }
        self.join(plans).await
    }

    pub async fn by_tour_code(&self, tour_code: &str) -> Result<TourPlanView, AppError> {
        let plan = self
            .tour_plans
            .find(&Filter::new().eq_ignore_case("tourCode", tour_code.trim()))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::not_found("Tour plan", tour_code))?;
        self.join_one(plan).await
    }

    /// Category and trending-state catalog over every plan.
    #[tracing::instrument(skip(self), fields(db.table = "tour_plans", db.operation = "catalog"))]
    pub async fn catalog(&self) -> Result<TourCatalog, AppError> {
        let plans = self.tour_plans.all().await?;
        let views = self.join(plans).await?;
        Ok(build_catalog(&views, &self.trending_states))
    }

    #[tracing::instrument(skip(self, req, files), fields(db.table = "tour_plans", db.operation = "update", files = files.len()))]
    pub async fn update(
        &self,
        id: Uuid,
        req: UpdateTourPlanRequest,
        files: Vec<TransientFile>,
    ) -> Result<TourPlan, AppError> {
        req.validate()?;
        let mut plan = self.get(id).await?;
        let old_segment = self.media.segment(ROOT, &plan.tour_code)?;

        plan.apply(req);
        self.check_references(&plan).await?;
        let new_segment = self.media.segment(ROOT, &plan.tour_code)?;

        let added = self.media.store_images(ROOT, &plan.tour_code, files).await?;
        let dropped = merge_images(ROOT, &mut plan.images, added);

        if !self.tour_plans.replace(&plan).await? {
            return Err(AppError::not_found("Tour plan", id));
        }
        self.media.discard(ROOT, &dropped).await;

        if new_segment != old_segment {
            self.release(vec![old_segment]).await;
        }
        Ok(plan)
    }

    #[tracing::instrument(skip(self), fields(db.table = "tour_plans", db.operation = "delete"))]
    pub async fn delete(&self, id: Uuid) -> Result<TourPlan, AppError> {
        let plan = self
            .tour_plans
            .delete(id)
            .await?
            .ok_or_else(|| AppError::not_found("Tour plan", id))?;

        self.release(self.media.occupied_segments(ROOT, &plan.tour_code, &plan.images))
            .await;
        tracing::info!(tour_plan_id = %id, tour_code = %plan.tour_code, "Tour plan deleted");
        Ok(plan)
    }

    pub async fn image(&self, tour_code: &str, file_name: &str) -> Result<MediaFile, AppError> {
        self.media
            .resolve(ROOT, &normalize_tour_code(tour_code), file_name)
            .await
    }

    /// Reap `segments` that no remaining record uses. Runs after the change is committed.
    async fn release(&self, segments: Vec<String>) {
        let tour_plans = &self.tour_plans;
        self.media
            .release(ROOT, segments, |segment| async move {
                tour_plans.exists(&folder_users(ROOT, KEY_FIELD, &segment)).await
            })
            .await;
    }
}
