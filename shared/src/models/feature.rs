//! Feature Submission Model
//!
//! A visitor asking to have their dwelling featured in a video.

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

/// Text part of a submission, as entered in the form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureDetails {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub location: String,
    pub dwelling_type: String,
    pub story: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub socials: Option<String>,
}

impl FeatureDetails {
    pub fn validate(&self) -> ModelResult<()> {
        if self.name.trim().is_empty() {
            return Err(ModelError::MissingField("name"));
        }
        if self.email.trim().is_empty() {
            return Err(ModelError::MissingField("email"));
        }
        if !self.email.contains('@') {
            return Err(ModelError::invalid("email", "missing '@'"));
        }
        if self.dwelling_type.trim().is_empty() {
            return Err(ModelError::MissingField("dwellingType"));
        }
        if self.story.trim().is_empty() {
            return Err(ModelError::MissingField("story"));
        }
        Ok(())
    }
}

/// Wire payload of `POST /feature-submission`
///
/// Both images are compressed JPEG `data:` URLs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureSubmission {
    #[serde(flatten)]
    pub details: FeatureDetails,
    pub exterior_image: String,
    pub interior_image: String,
}
