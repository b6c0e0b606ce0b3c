//! Address records. The `state` field keys the `addresses` media root.

use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;
use wayfarer_core::models::{
    Address, AddressPin, AddressQuery, AddressWithTourPlans, AddressesByTourType,
    CreateAddressRequest, TourPlan, TourType, UpdateAddressRequest,
};
use wayfarer_core::AppError;
use wayfarer_db::{DocumentStore, Filter, Repository};
use wayfarer_storage::{MediaFile, MediaRoot, TransientFile};

use crate::media::{folder_users, merge_images, MediaService};

const ROOT: MediaRoot = MediaRoot::Addresses;
const KEY_FIELD: &str = "state";

#[derive(Clone)]
pub struct AddressService {
    addresses: Repository<Address>,
    tour_plans: Repository<TourPlan>,
    media: MediaService,
}

impl AddressService {
    pub fn new(store: Arc<dyn DocumentStore>, media: MediaService) -> Self {
        Self {
            addresses: Repository::new(store.clone()),
            tour_plans: Repository::new(store),
            media,
        }
    }

    #[tracing::instrument(skip(self, req, files), fields(db.table = "addresses", db.operation = "insert", files = files.len()))]
    pub async fn create(
        &self,
        req: CreateAddressRequest,
        files: Vec<TransientFile>,
    ) -> Result<Address, AppError> {
        req.validate()?;
        let images = self.media.store_images(ROOT, req.state.trim(), files).await?;
        let address = Address::new(req, images);
        self.addresses.insert(&address).await?;

        tracing::info!(address_id = %address.id, state = %address.state, images = address.images.len(), "Address created");
        Ok(address)
    }

    pub async fn list(&self, query: AddressQuery) -> Result<Vec<Address>, AppError> {
        let filter = Filter::new()
            .eq_opt("country", query.country)
            .eq_opt("state", query.state)
            .eq_opt("city", query.city);
        self.addresses.find(&filter).await
    }

    pub async fn get(&self, id: Uuid) -> Result<Address, AppError> {
        self.addresses
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found("Address", id))
    }

    #[tracing::instrument(skip(self, req, files), fields(db.table = "addresses", db.operation = "update", files = files.len()))]
    pub async fn update(
        &self,
        id: Uuid,
        req: UpdateAddressRequest,
        files: Vec<TransientFile>,
    ) -> Result<Address, AppError> {
        req.validate()?;
        let mut address = self.get(id).await?;
        let old_segment = self.media.segment(ROOT, &address.state)?;

        address.apply(req);
        let new_segment = self.media.segment(ROOT, &address.state)?;

        let added = self.media.store_images(ROOT, &address.state, files).await?;
        let dropped = merge_images(ROOT, &mut address.images, added);

        if !self.addresses.replace(&address).await? {
            return Err(AppError::not_found("Address", id));
        }
        self.media.discard(ROOT, &dropped).await;

        if new_segment != old_segment {
            self.release(vec![old_segment]).await;
        }
        Ok(address)
    }

    #[tracing::instrument(skip(self), fields(db.table = "addresses", db.operation = "delete"))]
    pub async fn delete(&self, id: Uuid) -> Result<Address, AppError> {
        let address = self
            .addresses
            .delete(id)
            .await?
            .ok_or_else(|| AppError::not_found("Address", id))?;

        self.release(self.media.occupied_segments(ROOT, &address.state, &address.images))
            .await;
        tracing::info!(address_id = %id, state = %address.state, "Address deleted");
        Ok(address)
    }

    pub async fn image(&self, state: &str, file_name: &str) -> Result<MediaFile, AppError> {
        self.media.resolve(ROOT, state, file_name).await
    }

    /// Map pins for the addresses that can be placed on a map and priced.
    pub async fn summaries(&self) -> Result<Vec<AddressPin>, AppError> {
        let addresses = self.addresses.all().await?;
        Ok(addresses.iter().filter_map(AddressPin::from_address).collect())
    }

    /// Addresses grouped by the tour types of the plans that reference them.
    pub async fn by_tour_type(&self) -> Result<AddressesByTourType, AppError> {
        let addresses = self.addresses.all().await?;
        let plans = self.tour_plans.all().await?;

        let mut grouped = AddressesByTourType::default();
        for address in addresses {
            let linked = plans.iter().filter(|p| p.address_id == address.id);
            let (mut domestic, mut international) = (false, false);
            for plan in linked {
                match plan.tour_type {
                    TourType::Domestic => domestic = true,
                    TourType::International => international = true,
                }
            }
            if domestic {
                grouped.domestic.push(address.clone());
            }
            if international {
                grouped.international.push(address);
            }
        }
        Ok(grouped)
    }

    pub async fn with_tour_plans(&self) -> Result<Vec<AddressWithTourPlans>, AppError> {
        let addresses = self.addresses.all().await?;
        let plans = self.tour_plans.all().await?;

        Ok(addresses
            .into_iter()
            .map(|address| {
                let tour_plans = plans
                    .iter()
                    .filter(|p| p.address_id == address.id)
                    .cloned()
                    .collect();
                AddressWithTourPlans {
                    address,
                    tour_plans,
                }
            })
            .collect())
    }

    /// Reap `segments` that no remaining record uses. Runs after the change is committed.
    async fn release(&self, segments: Vec<String>) {
        let addresses = &self.addresses;
        self.media
            .release(ROOT, segments, |segment| async move {
                addresses.exists(&folder_users(ROOT, KEY_FIELD, &segment)).await
            })
            .await;
    }
}
