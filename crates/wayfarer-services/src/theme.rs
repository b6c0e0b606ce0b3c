//! Travel themes. The normalized theme name keys the `themes` media root.

use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;
use wayfarer_core::models::theme::normalize_theme_name;
use wayfarer_core::models::{CreateThemeRequest, Theme, TourPlan, UpdateThemeRequest};
use wayfarer_core::AppError;
use wayfarer_db::{DocumentStore, Filter, Repository};
use wayfarer_storage::{MediaFile, MediaRoot, TransientFile};

use crate::media::{folder_users, merge_images, MediaService};

const ROOT: MediaRoot = MediaRoot::Themes;
const KEY_FIELD: &str = "name";

fn theme_name(raw: &str) -> Result<String, AppError> {
    normalize_theme_name(raw).ok_or_else(|| {
        AppError::InvalidInput(format!("'{}' is not a supported theme", raw.trim()))
    })
}

#[derive(Clone)]
pub struct ThemeService {
    themes: Repository<Theme>,
    tour_plans: Repository<TourPlan>,
    media: MediaService,
}

impl ThemeService {
    pub fn new(store: Arc<dyn DocumentStore>, media: MediaService) -> Self {
        Self {
            themes: Repository::new(store.clone()),
            tour_plans: Repository::new(store),
            media,
        }
    }

    async fn ensure_unique(&self, name: &str, except: Option<Uuid>) -> Result<(), AppError> {
        let mut filter = Filter::new().eq("name", name);
        if let Some(id) = except {
            filter = filter.not_id(id);
        }
        if self.themes.exists(&filter).await? {
            return Err(AppError::InvalidInput(format!(
                "Theme {} already exists",
                name
            )));
        }
        Ok(())
    }

    #[tracing::instrument(skip(self, req, files), fields(db.table = "themes", db.operation = "insert", files = files.len()))]
    pub async fn create(
        &self,
        req: CreateThemeRequest,
        files: Vec<TransientFile>,
    ) -> Result<Theme, AppError> {
        req.validate()?;
        let name = theme_name(&req.name)?;
        self.ensure_unique(&name, None).await?;

        let images = self.media.store_images(ROOT, &name, files).await?;
        let theme = Theme::new(name, req.description, images);
        self.themes.insert(&theme).await?;

        tracing::info!(theme_id = %theme.id, name = %theme.name, "Theme created");
        Ok(theme)
    }

    pub async fn list(&self) -> Result<Vec<Theme>, AppError> {
        self.themes.all().await
    }

    pub async fn get(&self, id: Uuid) -> Result<Theme, AppError> {
        self.themes
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found("Theme", id))
    }

    #[tracing::instrument(skip(self, req, files), fields(db.table = "themes", db.operation = "update", files = files.len()))]
    pub async fn update(
        &self,
        id: Uuid,
        req: UpdateThemeRequest,
        files: Vec<TransientFile>,
    ) -> Result<Theme, AppError> {
        req.validate()?;
        let mut theme = self.get(id).await?;
        let old_segment = self.media.segment(ROOT, &theme.name)?;

        if let Some(raw) = req.name.as_deref() {
            let name = theme_name(raw)?;
            self.ensure_unique(&name, Some(id)).await?;
            theme.name = name;
        }
        if req.description.is_some() {
            theme.description = req.description;
        }

        let new_segment = self.media.segment(ROOT, &theme.name)?;

        let added = self.media.store_images(ROOT, &theme.name, files).await?;
        let dropped = merge_images(ROOT, &mut theme.images, added);
        theme.updated_at = chrono::Utc::now();

        if !self.themes.replace(&theme).await? {
            return Err(AppError::not_found("Theme", id));
        }
        self.media.discard(ROOT, &dropped).await;

        if new_segment != old_segment {
            self.release(vec![old_segment]).await;
        }
        Ok(theme)
    }

    /// Delete a theme and drop it from every tour plan that lists it.
    #[tracing::instrument(skip(self), fields(db.table = "themes", db.operation = "delete"))]
    pub async fn delete(&self, id: Uuid) -> Result<Theme, AppError> {
        let theme = self
            .themes
            .delete(id)
            .await?
            .ok_or_else(|| AppError::not_found("Theme", id))?;

        let linked = self
            .tour_plans
            .find(&Filter::new().contains("themeIds", id.to_string()))
            .await?;
        for plan in &linked {
            if let Err(e) = self.tour_plans.pull(plan.id, "themeIds", id).await {
                tracing::warn!(theme_id = %id, tour_plan_id = %plan.id, error = %e, "Failed to unlink deleted theme from tour plan");
            }
        }

        self.release(self.media.occupied_segments(ROOT, &theme.name, &theme.images))
            .await;
        tracing::info!(theme_id = %id, name = %theme.name, unlinked_plans = linked.len(), "Theme deleted");
        Ok(theme)
    }

    pub async fn image(&self, theme_name: &str, file_name: &str) -> Result<MediaFile, AppError> {
        let key = normalize_theme_name(theme_name).unwrap_or_else(|| theme_name.to_string());
        self.media.resolve(ROOT, &key, file_name).await
    }

    /// Reap `segments` that no remaining record uses. Runs after the change is committed.
    async fn release(&self, segments: Vec<String>) {
        let themes = &self.themes;
        self.media
            .release(ROOT, segments, |segment| async move {
                themes.exists(&folder_users(ROOT, KEY_FIELD, &segment)).await
            })
            .await;
    }
}
