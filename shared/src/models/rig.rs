//! Rig Model
//!
//! A for-sale dwelling or vehicle conversion. Records written by older
//! clients may carry a boolean `sold` instead of `status`; both shapes are
//! folded into [`RigStatus`] when a record is read.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ModelError, ModelResult};
use crate::util::{slugify, youtube_video_id};

/// Listing lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RigStatus {
    #[default]
    Available,
    Pending,
    Sold,
}

impl RigStatus {
    pub const ALL: [RigStatus; 3] = [Self::Available, Self::Pending, Self::Sold];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Pending => "pending",
            Self::Sold => "sold",
        }
    }

    /// Fold the canonical `status` and the legacy `sold` flag into one value.
    ///
    /// `status` wins whenever it is present.
    pub fn resolve(status: Option<RigStatus>, legacy_sold: Option<bool>) -> RigStatus {
        match (status, legacy_sold) {
            (Some(status), _) => status,
            (None, Some(true)) => Self::Sold,
            (None, _) => Self::Available,
        }
    }
}

impl fmt::Display for RigStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RigStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "available" => Ok(Self::Available),
            "pending" => Ok(Self::Pending),
            "sold" => Ok(Self::Sold),
            other => Err(ModelError::invalid("status", format!("unknown status '{other}'"))),
        }
    }
}

/// Rig entity (canonical form)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RigRecord")]
pub struct Rig {
    pub id: String,
    pub title: String,
    /// Free-text category label (e.g. "School Bus / Skoolie")
    #[serde(rename = "type")]
    pub rig_type: String,
    /// Display price, not a number
    pub price: String,
    pub location: String,
    pub thumbnail: String,
    /// Ordered image URLs; the first one is the cover
    pub gallery_images: Vec<String>,
    pub external_link: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mileage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub story: Option<String>,
    /// Bare YouTube video id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub youtube_video: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    /// Seller name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub highlights: Vec<String>,
    pub status: RigStatus,
    pub featured: bool,
    /// Millisecond timestamp of when the rig was featured; lower is older
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured_order: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Rig {
    /// URL slug, always derived from the current title
    pub fn slug(&self) -> String {
        slugify(&self.title)
    }

    pub fn is_sold(&self) -> bool {
        self.status == RigStatus::Sold
    }

    pub fn is_available(&self) -> bool {
        self.status == RigStatus::Available
    }

    /// Does `key` name this rig, either by id or by slug?
    pub fn matches_key(&self, key: &str) -> bool {
        self.id == key || self.slug() == key
    }

    /// Keep `thumbnail` pinned to the first gallery image.
    pub fn sync_thumbnail(&mut self) {
        if let Some(cover) = self.gallery_images.first() {
            self.thumbnail = cover.clone();
        }
    }
}

/// Stored shape of a rig, as written by any client generation.
///
/// Every field is optional so that old records never fail to load.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RigRecord {
    id: String,
    title: Option<String>,
    #[serde(rename = "type")]
    rig_type: Option<String>,
    price: Option<String>,
    location: Option<String>,
    thumbnail: Option<String>,
    gallery_images: Option<Vec<String>>,
    external_link: Option<String>,
    year: Option<String>,
    mileage: Option<String>,
    length: Option<String>,
    build_description: Option<String>,
    story: Option<String>,
    youtube_video: Option<String>,
    instagram: Option<String>,
    name: Option<String>,
    highlights: Option<Vec<String>>,
    status: Option<String>,
    sold: Option<bool>,
    featured: Option<bool>,
    featured_order: Option<i64>,
    created_at: Option<String>,
}

impl From<RigRecord> for Rig {
    fn from(record: RigRecord) -> Self {
        let status = record.status.as_deref().and_then(|s| match s.parse() {
            Ok(status) => Some(status),
            Err(_) => {
                tracing::warn!(rig_id = %record.id, status = s, "Ignoring unknown rig status");
                None
            }
        });
        let featured = record.featured.unwrap_or(false);

        Self {
            status: RigStatus::resolve(status, record.sold),
            id: record.id,
            title: record.title.unwrap_or_default(),
            rig_type: record.rig_type.unwrap_or_default(),
            price: record.price.unwrap_or_default(),
            location: record.location.unwrap_or_default(),
            thumbnail: record.thumbnail.unwrap_or_default(),
            gallery_images: record.gallery_images.unwrap_or_default(),
            external_link: record.external_link.unwrap_or_default(),
            year: record.year,
            mileage: record.mileage,
            length: record.length,
            build_description: record.build_description,
            story: record.story,
            youtube_video: record.youtube_video,
            instagram: record.instagram,
            name: record.name,
            highlights: record.highlights.unwrap_or_default(),
            featured,
            featured_order: if featured { record.featured_order } else { None },
            created_at: record.created_at,
        }
    }
}

/// Create rig payload (buyer/seller submission)
///
/// `gallery_images` holds compressed `data:` URLs; the backend turns them
/// into durable URLs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RigDraft {
    pub title: String,
    #[serde(rename = "type", default)]
    pub rig_type: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default)]
    pub gallery_images: Vec<String>,
    #[serde(default)]
    pub external_link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mileage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub story: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub youtube_video: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub highlights: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<RigStatus>,
}

impl RigDraft {
    /// Clean up form input before it is submitted.
    pub fn normalized(mut self) -> Self {
        self.title = self.title.trim().to_string();
        self.external_link = self.external_link.trim().to_string();
        self.price = normalize_price(&self.price);
        self.youtube_video = self.youtube_video.as_deref().and_then(youtube_video_id);
        self.year = non_blank(self.year);
        self.mileage = non_blank(self.mileage);
        self.length = non_blank(self.length);
        self.build_description = non_blank(self.build_description);
        self.story = non_blank(self.story);
        self.instagram = non_blank(self.instagram);
        self.name = non_blank(self.name);
        self.highlights = clean_highlights(self.highlights);
        if let Some(cover) = self.gallery_images.first() {
            self.thumbnail = cover.clone();
        }
        self
    }

    pub fn validate(&self) -> ModelResult<()> {
        if self.title.trim().is_empty() {
            return Err(ModelError::MissingField("title"));
        }
        if self.external_link.trim().is_empty() {
            return Err(ModelError::MissingField("externalLink"));
        }
        if self.gallery_images.is_empty() {
            return Err(ModelError::MissingField("galleryImages"));
        }
        Ok(())
    }
}

/// Update rig payload
///
/// Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RigUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub rig_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gallery_images: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mileage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub story: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub youtube_video: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlights: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<RigStatus>,
}

impl RigUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Normalize the video reference and pin the thumbnail to the new cover.
    pub fn normalized(mut self) -> Self {
        if let Some(video) = self.youtube_video.take() {
            self.youtube_video = Some(youtube_video_id(&video).unwrap_or_default());
        }
        if let Some(cover) = self.gallery_images.as_ref().and_then(|g| g.first()) {
            self.thumbnail = Some(cover.clone());
        }
        self
    }

    pub fn validate(&self) -> ModelResult<()> {
        if matches!(self.title.as_deref(), Some(t) if t.trim().is_empty()) {
            return Err(ModelError::MissingField("title"));
        }
        if matches!(self.external_link.as_deref(), Some(l) if l.trim().is_empty()) {
            return Err(ModelError::MissingField("externalLink"));
        }
        Ok(())
    }

    /// Merge this patch into `rig`.
    pub fn apply_to(&self, rig: &mut Rig) {
        fn set<T: Clone>(slot: &mut T, value: &Option<T>) {
            if let Some(v) = value {
                *slot = v.clone();
            }
        }
        fn set_opt<T: Clone>(slot: &mut Option<T>, value: &Option<T>) {
            if value.is_some() {
                *slot = value.clone();
            }
        }

        set(&mut rig.title, &self.title);
        set(&mut rig.rig_type, &self.rig_type);
        set(&mut rig.price, &self.price);
        set(&mut rig.location, &self.location);
        set(&mut rig.thumbnail, &self.thumbnail);
        set(&mut rig.gallery_images, &self.gallery_images);
        set(&mut rig.external_link, &self.external_link);
        set_opt(&mut rig.year, &self.year);
        set_opt(&mut rig.mileage, &self.mileage);
        set_opt(&mut rig.length, &self.length);
        set_opt(&mut rig.build_description, &self.build_description);
        set_opt(&mut rig.story, &self.story);
        set_opt(&mut rig.youtube_video, &self.youtube_video);
        set_opt(&mut rig.instagram, &self.instagram);
        set_opt(&mut rig.name, &self.name);
        set(&mut rig.highlights, &self.highlights);
        set(&mut rig.status, &self.status);
        if self.gallery_images.is_some() {
            rig.sync_thumbnail();
        }
    }
}

/// Status change payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: RigStatus,
}

/// Prefix bare prices with a dollar sign.
fn normalize_price(price: &str) -> String {
    let price = price.trim();
    if price.is_empty() || price.starts_with('$') {
        price.to_string()
    } else {
        format!("${price}")
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Trim tags, split comma lists, drop empties
fn clean_highlights(highlights: Vec<String>) -> Vec<String> {
    highlights
        .iter()
        .flat_map(|h| h.split(','))
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .map(String::from)
        .collect()
}
