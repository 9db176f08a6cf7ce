//! Feature-Submission Relay
//!
//! Sends a visitor's story and two photos to the notification endpoint.
//! Nothing is kept locally; a failed submission is retried by submitting
//! the form again.

use shared::{FeatureDetails, FeatureSubmission};

use crate::http::HttpClient;
use crate::image::{self, ImageSource};
use crate::store::StoreClient;
use crate::{ClientResult, NetworkHttpClient};

#[derive(Debug, Clone)]
pub struct FeatureRelay<C = NetworkHttpClient> {
    store: StoreClient<C>,
}

impl<C: HttpClient> FeatureRelay<C> {
    pub fn new(store: StoreClient<C>) -> Self {
        Self { store }
    }

    /// Validate, compress both photos, then POST once.
    ///
    /// Returns the server's success flag. Local failures (bad form, bad
    /// image) and transport failures are errors; nothing is sent in the
    /// local case.
    pub async fn submit(
        &self,
        details: FeatureDetails,
        exterior: ImageSource,
        interior: ImageSource,
    ) -> ClientResult<bool> {
        details.validate()?;

        let exterior_image = image::compress_listing_photo(exterior).await?;
        let interior_image = image::compress_listing_photo(interior).await?;

        let payload = FeatureSubmission {
            details,
            exterior_image,
            interior_image,
        };
        let accepted = self
            .store
            .submit_feature_request(&payload)
            .await
            .inspect_err(|e| {
                tracing::error!(endpoint = "/feature-submission", error = %e, "Feature submission failed");
            })?;
        if accepted {
            tracing::info!(dwelling_type = %payload.details.dwelling_type, "Feature submission sent");
        }
        Ok(accepted)
    }
}
