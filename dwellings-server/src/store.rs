//! In-memory storage
//!
//! [`KvStore`] holds JSON records under string keys and answers prefix
//! scans (`rig:`, `deal:`). [`BlobStore`] holds uploaded images.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;

use crate::error::{AppError, AppResult};

/// Key-value store of JSON records
#[derive(Debug, Default)]
pub struct KvStore {
    entries: RwLock<BTreeMap<String, Value>>,
}

impl KvStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, key: &str) -> Option<Value> {
        self.entries.read().await.get(key).cloned()
    }

    pub async fn set(&self, key: impl Into<String>, value: Value) {
        self.entries.write().await.insert(key.into(), value);
    }

    /// Returns whether the key existed.
    pub async fn del(&self, key: &str) -> bool {
        self.entries.write().await.remove(key).is_some()
    }

    /// Values whose key starts with `prefix`, in key order
    pub async fn get_by_prefix(&self, prefix: &str) -> Vec<Value> {
        self.entries
            .read()
            .await
            .range(prefix.to_string()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(_, v)| v.clone())
            .collect()
    }

    /// Typed read; an unreadable record is logged and treated as missing.
    pub async fn get_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.get(key).await?;
        match serde_json::from_value(value) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(key, error = %e, "Skipping unreadable record");
                None
            }
        }
    }

    /// Typed prefix scan; unreadable records are skipped.
    pub async fn list_as<T: DeserializeOwned>(&self, prefix: &str) -> Vec<T> {
        self.get_by_prefix(prefix)
            .await
            .into_iter()
            .filter_map(|value| match serde_json::from_value(value) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!(prefix, error = %e, "Skipping unreadable record");
                    None
                }
            })
            .collect()
    }

    pub async fn set_as<T: Serialize>(&self, key: impl Into<String>, record: &T) -> AppResult<()> {
        let value = serde_json::to_value(record)
            .map_err(|e| AppError::internal("Failed to encode record", e))?;
        self.set(key, value).await;
        Ok(())
    }
}

/// A stored image
#[derive(Debug, Clone)]
pub struct Blob {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Blob store keyed by path
#[derive(Debug, Default)]
pub struct BlobStore {
    blobs: RwLock<HashMap<String, Blob>>,
}

impl BlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `blob` at `path`. Returns false when the path is taken and
    /// `upsert` is off.
    pub async fn put(&self, path: &str, blob: Blob, upsert: bool) -> bool {
        let mut blobs = self.blobs.write().await;
        if !upsert && blobs.contains_key(path) {
            return false;
        }
        blobs.insert(path.to_string(), blob);
        true
    }

    pub async fn get(&self, path: &str) -> Option<Blob> {
        self.blobs.read().await.get(path).cloned()
    }

    pub async fn len(&self) -> usize {
        self.blobs.read().await.len()
    }
}

/// Decode an uploaded image.
///
/// Accepts `data:<mime>;base64,<payload>` or a bare base64 payload, which is
/// taken to be a JPEG.
pub fn decode_image_payload(payload: &str) -> Result<Blob, String> {
    let payload = payload.trim();
    let (content_type, data) = match payload.strip_prefix("data:") {
        Some(rest) => {
            let (meta, data) = rest.split_once(',').ok_or("missing ',' in data URL")?;
            let mime = meta
                .strip_suffix(";base64")
                .ok_or("data URL is not base64")?;
            if !mime.starts_with("image/") {
                return Err(format!("unsupported content type '{mime}'"));
            }
            (mime.to_string(), data)
        }
        None => ("image/jpeg".to_string(), payload),
    };
    let bytes = STANDARD.decode(data).map_err(|e| e.to_string())?;
    if bytes.is_empty() {
        return Err("empty image".into());
    }
    Ok(Blob {
        content_type,
        bytes,
    })
}
