use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Serialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::package::ImageRef;

#[derive(Debug, Clone)]
pub struct StoredImage {
    pub id: Uuid,
    pub title: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
    pub uploaded_at: DateTime<Utc>,
}

/// In-process blob store standing in for the external media
/// collaborator. Enforces the per-file size ceiling; everything else
/// about a blob is opaque to the core.
pub struct MediaStore {
    max_image_bytes: usize,
    blobs: DashMap<Uuid, StoredImage>,
}

impl MediaStore {
    pub fn new(max_image_bytes: usize) -> Self {
        Self {
            max_image_bytes,
            blobs: DashMap::new(),
        }
    }

    pub fn max_image_bytes(&self) -> usize {
        self.max_image_bytes
    }

    pub fn store(
        &self,
        title: &str,
        content_type: Option<String>,
        bytes: Vec<u8>,
    ) -> Result<ImageRef, AppError> {
        if bytes.len() > self.max_image_bytes {
            return Err(AppError::Upload(format!(
                "{title}: {} bytes exceeds the {} byte ceiling",
                bytes.len(),
                self.max_image_bytes
            )));
        }

        let id = Uuid::new_v4();
        let image_ref = ImageRef {
            url: format!("/media/{id}"),
            title: title.to_string(),
            size_bytes: bytes.len(),
        };

        self.blobs.insert(
            id,
            StoredImage {
                id,
                title: title.to_string(),
                content_type,
                bytes,
                uploaded_at: Utc::now(),
            },
        );

        Ok(image_ref)
    }

    pub fn get(&self, id: &Uuid) -> Option<StoredImage> {
        self.blobs.get(id).map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }
}

/// Per-item attachment results: oversized or unreadable entries are
/// reported individually instead of failing the whole batch.
#[derive(Debug, Serialize)]
pub struct AttachOutcome {
    pub attached: Vec<ImageRef>,
    pub rejected: Vec<RejectedImage>,
}

#[derive(Debug, Serialize)]
pub struct RejectedImage {
    pub title: String,
    pub error: String,
}
