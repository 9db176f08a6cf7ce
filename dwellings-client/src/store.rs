//! Remote Store Client
//!
//! One method per endpoint of the store API. Every call is a single round
//! trip with no retry; callers decide what a failure means.

use shared::response::{
    DealEntry, ProductResponse, RigResponse, RigsResponse, SuccessResponse, UploadImageRequest,
    UploadImageResponse, VerifyAdminRequest, VerifyAdminResponse,
};
use shared::{
    FeatureSubmission, Product, ProductCreate, ProductUpdate, Rig, RigDraft, RigStatus, RigUpdate,
    StatusUpdate,
};

use urlencoding::encode;

use crate::http::HttpClient;
use crate::{ClientError, ClientResult, NetworkHttpClient};

/// Typed wrapper over the store endpoints
#[derive(Debug, Clone)]
pub struct StoreClient<C = NetworkHttpClient> {
    http: C,
}

impl<C: HttpClient> StoreClient<C> {
    pub fn new(http: C) -> Self {
        Self { http }
    }

    /// Underlying transport
    pub fn http(&self) -> &C {
        &self.http
    }

    // ========== Rigs ==========

    pub async fn list_rigs(&self) -> ClientResult<Vec<Rig>> {
        let response: RigsResponse = self.http.get("/rigs").await?;
        Ok(response.rigs)
    }

    pub async fn create_rig(&self, draft: &RigDraft) -> ClientResult<Rig> {
        let response: RigResponse = self.http.post("/rigs", draft).await?;
        expect_rig(response, "create rig")
    }

    pub async fn update_rig(&self, id: &str, patch: &RigUpdate) -> ClientResult<Rig> {
        let response: RigResponse = self.http.put(&format!("/rigs/{}", encode(id)), patch).await?;
        expect_rig(response, "update rig")
    }

    pub async fn set_rig_status(&self, id: &str, status: RigStatus) -> ClientResult<Rig> {
        let response: RigResponse = self
            .http
            .put(&format!("/rigs/{}/status", encode(id)), &StatusUpdate { status })
            .await?;
        expect_rig(response, "update rig status")
    }

    /// The backend applies the featured rotation.
    pub async fn toggle_rig_featured(&self, id: &str) -> ClientResult<Rig> {
        let response: RigResponse = self.http.put_empty(&format!("/rigs/{}/featured", encode(id))).await?;
        expect_rig(response, "toggle featured")
    }

    pub async fn delete_rig(&self, id: &str) -> ClientResult<()> {
        let response: SuccessResponse = self.http.delete(&format!("/rigs/{}", encode(id))).await?;
        expect_success(response, "delete rig")
    }

    // ========== Products ==========

    /// Accepts both bare products and legacy `{ key, value }` rows.
    pub async fn list_products(&self) -> ClientResult<Vec<Product>> {
        let entries: Vec<DealEntry> = self.http.get("/deals").await?;
        Ok(entries.into_iter().map(DealEntry::into_product).collect())
    }

    pub async fn create_product(&self, product: &ProductCreate) -> ClientResult<Product> {
        let response: ProductResponse = self.http.post("/deals", product).await?;
        expect_product(response, "create product")
    }

    pub async fn update_product(&self, id: &str, patch: &ProductUpdate) -> ClientResult<Product> {
        let response: ProductResponse = self.http.put(&format!("/deals/{}", encode(id)), patch).await?;
        expect_product(response, "update product")
    }

    pub async fn delete_product(&self, id: &str) -> ClientResult<()> {
        let response: SuccessResponse = self.http.delete(&format!("/deals/{}", encode(id))).await?;
        expect_success(response, "delete product")
    }

    // ========== Utilities ==========

    /// Upload one encoded image and return its durable URL.
    ///
    /// A refusal by the server yields `Ok(None)`; only a failed round trip
    /// is an error.
    pub async fn upload_image(
        &self,
        encoded_image: &str,
        owner_id: Option<&str>,
    ) -> ClientResult<Option<String>> {
        let request = UploadImageRequest {
            base64_image: encoded_image.to_string(),
            product_id: owner_id.map(str::to_string),
        };
        match self
            .http
            .post::<UploadImageResponse, _>("/deals/upload-image", &request)
            .await
        {
            Ok(response) if response.success => {
                Ok(response.url.filter(|url| !url.is_empty()))
            }
            Ok(_) => Ok(None),
            Err(e) if e.is_transport() => Err(e),
            Err(e) => {
                tracing::warn!(endpoint = "/deals/upload-image", error = %e, "Image upload refused");
                Ok(None)
            }
        }
    }

    /// Check the admin password.
    ///
    /// On success the issued admin token is attached to every later request
    /// made through this transport.
    pub async fn verify_admin_password(&self, password: &str) -> ClientResult<bool> {
        let request = VerifyAdminRequest {
            password: password.to_string(),
        };
        let response: VerifyAdminResponse = self.http.post("/verify-admin", &request).await?;
        if response.success {
            if let Some(token) = response.token {
                self.http.set_admin_token(Some(token));
            }
        }
        Ok(response.success)
    }

    /// Revoke the admin token held by this transport.
    ///
    /// The token is dropped locally even when the backend cannot be reached.
    pub async fn revoke_admin_token(&self) -> ClientResult<()> {
        if self.http.admin_token().is_none() {
            return Ok(());
        }
        let result = self.http.post_empty::<SuccessResponse>("/logout").await;
        self.http.set_admin_token(None);
        expect_success(result?, "logout")
    }

    pub async fn submit_feature_request(&self, payload: &FeatureSubmission) -> ClientResult<bool> {
        let response: SuccessResponse = self.http.post("/feature-submission", payload).await?;
        if let Some(error) = response.error.as_deref() {
            tracing::warn!(endpoint = "/feature-submission", error, "Feature submission rejected");
        }
        Ok(response.success)
    }
}

fn expect_rig(response: RigResponse, action: &str) -> ClientResult<Rig> {
    match response {
        RigResponse {
            success: true,
            rig: Some(rig),
        } => Ok(rig),
        _ => Err(ClientError::Rejected(format!("{} returned no rig", action))),
    }
}

fn expect_product(response: ProductResponse, action: &str) -> ClientResult<Product> {
    match response {
        ProductResponse {
            success: true,
            product: Some(product),
        } => Ok(product),
        _ => Err(ClientError::Rejected(format!("{} returned no product", action))),
    }
}

fn expect_success(response: SuccessResponse, action: &str) -> ClientResult<()> {
    if response.success {
        Ok(())
    } else {
        Err(ClientError::Rejected(
            response.error.unwrap_or_else(|| format!("{} failed", action)),
        ))
    }
}
