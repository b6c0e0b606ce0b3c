//! Places: cities and the sub-places inside them. The place name keys the `places` media root.
//!
//! The child→parent pointer (`parentPlace`) is authoritative; the parent's `subPlaces` set is
//! a denormalized copy maintained with add-to-set / pull so retries never duplicate entries.

use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;
use wayfarer_core::models::{
    Address, CityView, CreatePlaceRequest, Place, PlaceQuery, PlaceType, UpdatePlaceRequest,
};
use wayfarer_core::AppError;
use wayfarer_db::{DocumentStore, Filter, Repository};
use wayfarer_storage::{MediaFile, MediaRoot, TransientFile};

use crate::media::{folder_users, merge_images, MediaService};
use crate::wire;

const ROOT: MediaRoot = MediaRoot::Places;
const KEY_FIELD: &str = "name";
const SUB_PLACES_FIELD: &str = "subPlaces";

#[derive(Clone)]
pub struct PlaceService {
    places: Repository<Place>,
    addresses: Repository<Address>,
    media: MediaService,
}

impl PlaceService {
    pub fn new(store: Arc<dyn DocumentStore>, media: MediaService) -> Self {
        Self {
            places: Repository::new(store.clone()),
            addresses: Repository::new(store),
            media,
        }
    }

    async fn require_address(&self, id: Uuid) -> Result<(), AppError> {
        match self.addresses.get(id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::InvalidInput(format!(
                "state references unknown address {}",
                id
            ))),
        }
    }

    async fn require_city(&self, id: Uuid) -> Result<Place, AppError> {
        match self.places.get(id).await? {
            Some(parent) if parent.is_city() => Ok(parent),
            Some(_) => Err(AppError::InvalidInput(format!(
                "parentPlace {} is not a city",
                id
            ))),
            None => Err(AppError::InvalidInput(format!(
                "parentPlace references unknown place {}",
                id
            ))),
        }
    }

    #[tracing::instrument(skip(self, req, files), fields(db.table = "places", db.operation = "insert", files = files.len()))]
    pub async fn create(
        &self,
        req: CreatePlaceRequest,
        files: Vec<TransientFile>,
    ) -> Result<Place, AppError> {
        req.validate()?;
        match (req.place_type, req.parent_place) {
            (PlaceType::SubPlace, None) => {
                return Err(AppError::InvalidInput(
                    "parentPlace is required for a sub_place".to_string(),
                ))
            }
            (PlaceType::SubPlace, Some(parent)) => {
                self.require_city(parent).await?;
            }
            (PlaceType::City, Some(_)) => {
                return Err(AppError::InvalidInput(
                    "a city cannot have a parentPlace".to_string(),
                ))
            }
            (PlaceType::City, None) => {}
        }
        self.require_address(req.state).await?;

        let images = self.media.store_images(ROOT, req.name.trim(), files).await?;
        let place = Place::new(req, images);
        self.places.insert(&place).await?;

        if let Some(parent) = place.parent_place {
            self.places
                .add_to_set(parent, SUB_PLACES_FIELD, place.id)
                .await?;
        }

        tracing::info!(place_id = %place.id, name = %place.name, place_type = ?place.place_type, "Place created");
        Ok(place)
    }

    pub async fn list(&self, query: PlaceQuery) -> Result<Vec<Place>, AppError> {
        let mut filter = Filter::new()
            .eq_opt("state", query.state.map(|id| id.to_string()))
            .eq_opt("parentPlace", query.parent_place.map(|id| id.to_string()))
            .eq_opt("name", query.name);
        if let Some(place_type) = query.place_type {
            filter = filter.eq("type", wire(&place_type)?);
        }
        self.places.find(&filter).await
    }

    /// Every city with its address summary joined.
    pub async fn cities(&self) -> Result<Vec<CityView>, AppError> {
        let cities = self
            .places
            .find(&Filter::new().eq("type", wire(&PlaceType::City)?))
            .await?;

        let mut state_ids: Vec<Uuid> = cities.iter().map(|c| c.state).collect();
        state_ids.sort();
        state_ids.dedup();
        let addresses = self.addresses.get_many(&state_ids).await?;

        Ok(cities
            .into_iter()
            .map(|place| {
                let state_details = addresses
                    .iter()
                    .find(|a| a.id == place.state)
                    .map(Address::summary);
                CityView {
                    place,
                    state_details,
                }
            })
            .collect())
    }

    pub async fn get(&self, id: Uuid) -> Result<Place, AppError> {
        self.places
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found("Place", id))
    }

    /// Children of a city, derived from their parent pointers.
    pub async fn sub_places(&self, city_id: Uuid) -> Result<Vec<Place>, AppError> {
        match self.places.get(city_id).await? {
            Some(city) if city.is_city() => {}
            _ => return Err(AppError::not_found("City", city_id)),
        }
        self.places
            .find(&Filter::new().eq("parentPlace", city_id.to_string()))
            .await
    }

    #[tracing::instrument(skip(self, req, files), fields(db.table = "places", db.operation = "update", files = files.len()))]
    pub async fn update(
        &self,
        id: Uuid,
        req: UpdatePlaceRequest,
        files: Vec<TransientFile>,
    ) -> Result<Place, AppError> {
        req.validate()?;
        let mut place = self.get(id).await?;

        if req.place_type.is_some_and(|t| t != place.place_type) {
            return Err(AppError::InvalidInput(
                "type cannot be changed after creation".to_string(),
            ));
        }
        if req.parent_place.is_some() && req.parent_place != place.parent_place {
            return Err(AppError::InvalidInput(
                "parentPlace cannot be changed after creation".to_string(),
            ));
        }
        if let Some(state) = req.state {
            self.require_address(state).await?;
        }

        let old_segment = self.media.segment(ROOT, &place.name)?;
        place.apply(req);
        let new_segment = self.media.segment(ROOT, &place.name)?;

        let added = self.media.store_images(ROOT, &place.name, files).await?;
        let dropped = merge_images(ROOT, &mut place.images, added);

        if !self.places.replace(&place).await? {
            return Err(AppError::not_found("Place", id));
        }
        self.media.discard(ROOT, &dropped).await;

        if new_segment != old_segment {
            self.release(vec![old_segment]).await;
        }
        Ok(place)
    }

    /// Delete a place. A sub-place leaves its parent's set; a city's children are kept as is.
    #[tracing::instrument(skip(self), fields(db.table = "places", db.operation = "delete"))]
    pub async fn delete(&self, id: Uuid) -> Result<Place, AppError> {
        let place = self
            .places
            .delete(id)
            .await?
            .ok_or_else(|| AppError::not_found("Place", id))?;

        if let Some(parent) = place.parent_place {
            if let Err(e) = self.places.pull(parent, SUB_PLACES_FIELD, place.id).await {
                tracing::warn!(place_id = %id, parent_id = %parent, error = %e, "Failed to unlink deleted place from its parent");
            }
        }
        if place.is_city() && !place.sub_places.is_empty() {
            tracing::warn!(place_id = %id, orphaned = place.sub_places.len(), "City deleted with sub-places still attached");
        }

        self.release(self.media.occupied_segments(ROOT, &place.name, &place.images))
            .await;
        tracing::info!(place_id = %id, name = %place.name, "Place deleted");
        Ok(place)
    }

    pub async fn image(&self, place_name: &str, file_name: &str) -> Result<MediaFile, AppError> {
        self.media.resolve(ROOT, place_name, file_name).await
    }

    /// Reap `segments` that no remaining record uses. Runs after the change is committed.
    async fn release(&self, segments: Vec<String>) {
        let places = &self.places;
        self.media
            .release(ROOT, segments, |segment| async move {
                places.exists(&folder_users(ROOT, KEY_FIELD, &segment)).await
            })
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{upload, BrokenPullStore, Fixture};
    use wayfarer_core::models::CreateAddressRequest;

    async fn address(fx: &Fixture) -> Uuid {
        fx.services
            .addresses
            .create(
                CreateAddressRequest {
                    country: "India".to_string(),
                    state: "Rajasthan".to_string(),
                    city: "Jaipur".to_string(),
                    ..Default::default()
                },
                vec![],
            )
            .await
            .unwrap()
            .id
    }

    fn request(name: &str, state: Uuid, parent: Option<Uuid>) -> CreatePlaceRequest {
        CreatePlaceRequest {
            name: name.to_string(),
            place_title: name.to_string(),
            ideal_trip_duration: "2 days".to_string(),
            place_type: if parent.is_some() {
                PlaceType::SubPlace
            } else {
                PlaceType::City
            },
            state,
            parent_place: parent,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_sub_place_joins_parent_set_once() {
        let fx = Fixture::new().await;
        let service = &fx.services.places;
        let state = address(&fx).await;
        let city = service.create(request("Jaipur", state, None), vec![]).await.unwrap();

        let child = service
            .create(request("Amer Fort", state, Some(city.id)), vec![])
            .await
            .unwrap();
        // a retried link after a transient failure must not duplicate the entry
        service
            .places
            .add_to_set(city.id, SUB_PLACES_FIELD, child.id)
            .await
            .unwrap();

        let city = service.get(city.id).await.unwrap();
        assert_eq!(city.sub_places, vec![child.id]);

        let derived = service.sub_places(city.id).await.unwrap();
        assert_eq!(derived.len(), 1);
        assert_eq!(derived[0].id, child.id);
    }

    #[tokio::test]
    async fn test_delete_sub_place_pulls_and_city_delete_keeps_children() {
        let fx = Fixture::new().await;
        let service = &fx.services.places;
        let state = address(&fx).await;
        let city = service.create(request("Jaipur", state, None), vec![]).await.unwrap();
        let fort = service
            .create(request("Amer Fort", state, Some(city.id)), vec![])
            .await
            .unwrap();
        let palace = service
            .create(request("City Palace", state, Some(city.id)), vec![])
            .await
            .unwrap();

        service.delete(fort.id).await.unwrap();
        assert_eq!(service.get(city.id).await.unwrap().sub_places, vec![palace.id]);

        service.delete(city.id).await.unwrap();
        let orphan = service.get(palace.id).await.unwrap();
        assert_eq!(orphan.parent_place, Some(city.id));
    }

    #[tokio::test]
    async fn test_hierarchy_validation() {
        let fx = Fixture::new().await;
        let service = &fx.services.places;
        let state = address(&fx).await;

        let mut missing_parent = request("Fort", state, None);
        missing_parent.place_type = PlaceType::SubPlace;
        assert!(matches!(
            service.create(missing_parent, vec![]).await,
            Err(AppError::InvalidInput(_))
        ));

        let city = service.create(request("Jaipur", state, None), vec![]).await.unwrap();
        let fort = service
            .create(request("Fort", state, Some(city.id)), vec![])
            .await
            .unwrap();
        assert!(matches!(
            service.create(request("Gate", state, Some(fort.id)), vec![]).await,
            Err(AppError::InvalidInput(_))
        ));
        assert!(matches!(
            service
                .create(request("Nowhere", Uuid::new_v4(), None), vec![])
                .await,
            Err(AppError::InvalidInput(_))
        ));
        assert!(matches!(
            service.sub_places(fort.id).await,
            Err(AppError::NotFound(_))
        ));

        let change_type = UpdatePlaceRequest {
            place_type: Some(PlaceType::City),
            ..Default::default()
        };
        assert!(matches!(
            service.update(fort.id, change_type, vec![]).await,
            Err(AppError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_place_folder_reaped_only_when_unused() {
        let fx = Fixture::new().await;
        let service = &fx.services.places;
        let state = address(&fx).await;

        let first = service
            .create(
                request("Jaipur", state, None),
                vec![upload(&fx, "images", "hawa mahal.jpg", b"1")],
            )
            .await
            .unwrap();
        assert!(first.images[0].starts_with("Jaipur/"));
        assert!(first.images[0].ends_with("-hawa_mahal.jpg"));
        let second = service
            .create(request("Jaipur", state, None), vec![])
            .await
            .unwrap();

        service.delete(first.id).await.unwrap();
        assert!(fx.folder(MediaRoot::Places, "Jaipur").exists());

        service.delete(second.id).await.unwrap();
        assert!(!fx.folder(MediaRoot::Places, "Jaipur").exists());
    }

    #[tokio::test]
    async fn test_delete_completes_when_parent_unlink_fails() {
        let fx = Fixture::with_store(Arc::new(BrokenPullStore::default())).await;
        let service = &fx.services.places;
        let state = address(&fx).await;
        let city = service.create(request("Jaipur", state, None), vec![]).await.unwrap();
        let fort = service
            .create(
                request("Amer Fort", state, Some(city.id)),
                vec![upload(&fx, "images", "gate.jpg", b"x")],
            )
            .await
            .unwrap();
        assert!(fx.folder(MediaRoot::Places, "Amer_Fort").exists());

        let deleted = service.delete(fort.id).await.unwrap();
        assert_eq!(deleted.id, fort.id);
        assert!(matches!(service.get(fort.id).await, Err(AppError::NotFound(_))));
        assert!(!fx.folder(MediaRoot::Places, "Amer_Fort").exists());
    }
}
