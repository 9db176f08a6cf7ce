//! Listing Catalog

use shared::featured::featured_rigs;
use shared::{Rig, RigDraft, RigStatus, RigUpdate};

use super::Mirror;
use crate::http::HttpClient;
use crate::image::{self, ImageSource};
use crate::store::StoreClient;
use crate::{ClientResult, NetworkHttpClient};

/// Rigs mirrored from the store
///
/// Every mutation ends with a full refetch, so [`RigCatalog::rigs`] always
/// reflects what the server holds.
#[derive(Debug)]
pub struct RigCatalog<C = NetworkHttpClient> {
    store: StoreClient<C>,
    mirror: Mirror<Rig>,
}

impl<C: HttpClient> RigCatalog<C> {
    /// Empty until [`refresh`](Self::refresh) runs.
    pub fn new(store: StoreClient<C>) -> Self {
        Self {
            store,
            mirror: Mirror::new(),
        }
    }

    /// Create and load in one go.
    pub async fn load(store: StoreClient<C>) -> Self {
        let catalog = Self::new(store);
        catalog.refresh().await;
        catalog
    }

    pub fn store(&self) -> &StoreClient<C> {
        &self.store
    }

    /// Snapshot of all rigs, in server order
    pub fn rigs(&self) -> Vec<Rig> {
        self.mirror.snapshot()
    }

    pub fn is_loading(&self) -> bool {
        self.mirror.is_loading()
    }

    /// Replace the mirror with the server's collection.
    ///
    /// On failure the mirror is emptied rather than left stale.
    pub async fn refresh(&self) {
        self.mirror.set_loading(true);
        match self.store.list_rigs().await {
            Ok(rigs) => {
                tracing::debug!(count = rigs.len(), "Fetched rigs");
                self.mirror.replace(rigs);
            }
            Err(e) => {
                tracing::error!(endpoint = "/rigs", error = %e, "Failed to fetch rigs");
                self.mirror.replace(Vec::new());
            }
        }
    }

    /// Look a rig up by id, then by slug.
    pub fn find(&self, key: &str) -> Option<Rig> {
        let state = self.mirror.read();
        state
            .items
            .iter()
            .find(|r| r.id == key)
            .or_else(|| state.items.iter().find(|r| r.slug() == key))
            .cloned()
    }

    /// Featured rigs, oldest first
    pub fn featured(&self) -> Vec<Rig> {
        let state = self.mirror.read();
        featured_rigs(&state.items).into_iter().cloned().collect()
    }

    pub fn with_status(&self, status: RigStatus) -> Vec<Rig> {
        self.mirror
            .read()
            .items
            .iter()
            .filter(|r| r.status == status)
            .cloned()
            .collect()
    }

    /// Rigs still for sale
    pub fn available(&self) -> Vec<Rig> {
        self.with_status(RigStatus::Available)
    }

    /// Submit a new listing.
    ///
    /// `draft.gallery_images` must already hold compressed data URLs.
    /// Errors propagate so the form can keep its input.
    pub async fn add_rig(&self, draft: RigDraft) -> ClientResult<Rig> {
        let draft = draft.normalized();
        draft.validate()?;

        let created = match self.store.create_rig(&draft).await {
            Ok(rig) => rig,
            Err(e) => {
                tracing::error!(endpoint = "/rigs", title = %draft.title, error = %e, "Failed to create rig");
                return Err(e);
            }
        };
        tracing::info!(rig_id = %created.id, "Rig created");
        self.refresh().await;
        Ok(created)
    }

    /// Compress `photos` with the listing preset, then [`add_rig`](Self::add_rig).
    ///
    /// Photos are appended after any images already in the draft.
    pub async fn add_rig_with_photos(
        &self,
        mut draft: RigDraft,
        photos: Vec<ImageSource>,
    ) -> ClientResult<Rig> {
        for photo in photos {
            draft
                .gallery_images
                .push(image::compress_listing_photo(photo).await?);
        }
        self.add_rig(draft).await
    }

    /// Full edit. Errors propagate.
    pub async fn update_rig(&self, id: &str, patch: RigUpdate) -> ClientResult<Rig> {
        let patch = patch.normalized();
        patch.validate()?;

        let updated = match self.store.update_rig(id, &patch).await {
            Ok(rig) => rig,
            Err(e) => {
                tracing::error!(endpoint = "/rigs/{id}", rig_id = id, error = %e, "Failed to update rig");
                return Err(e);
            }
        };
        self.refresh().await;
        Ok(updated)
    }

    /// Errors are logged, not returned.
    pub async fn update_rig_status(&self, id: &str, status: RigStatus) {
        if let Err(e) = self.store.set_rig_status(id, status).await {
            tracing::error!(endpoint = "/rigs/{id}/status", rig_id = id, %status, error = %e, "Failed to update rig status");
        }
        self.refresh().await;
    }

    /// Flip the featured flag; the backend evicts the oldest featured rig
    /// when all slots are taken. Errors are logged, not returned.
    pub async fn toggle_featured(&self, id: &str) {
        match self.store.toggle_rig_featured(id).await {
            Ok(rig) => {
                tracing::info!(rig_id = id, featured = rig.featured, "Toggled featured");
            }
            Err(e) => {
                tracing::error!(endpoint = "/rigs/{id}/featured", rig_id = id, error = %e, "Failed to toggle featured");
            }
        }
        self.refresh().await;
    }

    /// Errors are logged, not returned.
    pub async fn delete_rig(&self, id: &str) {
        if let Err(e) = self.store.delete_rig(id).await {
            tracing::error!(endpoint = "/rigs/{id}", rig_id = id, error = %e, "Failed to delete rig");
        }
        self.refresh().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ClientError;
    use crate::oneshot::OneshotHttpClient;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;

    fn catalog(router: Router) -> RigCatalog<OneshotHttpClient> {
        RigCatalog::new(StoreClient::new(OneshotHttpClient::new(router)))
    }

    fn listing_router() -> Router {
        Router::new().route(
            "/rigs",
            get(|| async {
                Json(json!({
                    "rigs": [
                        { "id": "rig-1", "title": "1998 Blue Bird School Bus!", "sold": true },
                        { "id": "rig-2", "title": "Sprinter Van", "status": "pending",
                          "featured": true, "featuredOrder": 20 },
                        { "id": "rig-3", "title": "Box Truck", "featured": true, "featuredOrder": 10 }
                    ]
                }))
            }),
        )
    }

    #[tokio::test]
    async fn test_refresh_and_lookup() {
        let catalog = catalog(listing_router());
        assert!(catalog.rigs().is_empty());
        catalog.refresh().await;
        assert!(!catalog.is_loading());
        assert_eq!(catalog.rigs().len(), 3);

        assert_eq!(catalog.find("rig-2").unwrap().title, "Sprinter Van");
        assert_eq!(catalog.find("1998-blue-bird-school-bus").unwrap().id, "rig-1");
        assert!(catalog.find("nope").is_none());

        let featured: Vec<_> = catalog.featured().into_iter().map(|r| r.id).collect();
        assert_eq!(featured, vec!["rig-3", "rig-2"]);
        assert_eq!(catalog.with_status(RigStatus::Sold).len(), 1);
    }

    #[tokio::test]
    async fn test_failed_refresh_empties_mirror() {
        let catalog = catalog(Router::new());
        catalog.mirror.replace(vec![catalog_rig()]);
        catalog.refresh().await;
        assert!(catalog.rigs().is_empty());
        assert!(!catalog.is_loading());
    }

    #[tokio::test]
    async fn test_invalid_draft_never_reaches_network() {
        let catalog = catalog(Router::new());
        let err = catalog.add_rig(RigDraft::default()).await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
    }

    #[tokio::test]
    async fn test_toggle_failure_is_swallowed() {
        let catalog = catalog(listing_router());
        catalog.toggle_featured("rig-1").await;
        catalog.delete_rig("rig-1").await;
        assert_eq!(catalog.rigs().len(), 3);
    }

    fn catalog_rig() -> Rig {
        serde_json::from_value(json!({ "id": "stale", "title": "Stale" })).unwrap()
    }
}
