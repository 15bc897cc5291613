//! Video metadata plus the stored binaries behind it

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use common::{
    error::BackendResult,
    models::{NewVideo, VideoCategory, VideoChanges, VideoFilter, VideoRecord},
    storage::ObjectStorage,
    store::Table,
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use super::{CallState, Repository};

/// A file handed over for upload
#[derive(Debug, Clone)]
pub struct VideoUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
    /// Display name; the file name when absent
    pub name: Option<String>,
}

/// Outcome of deleting a video
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum VideoDeletion {
    /// Row and stored object are gone
    Removed,
    /// Row is gone but the stored object could not be removed
    StorageOrphaned { key: String, reason: String },
}

/// Result of a sequential multi-file upload
#[derive(Debug, Clone, Default, Serialize)]
pub struct UploadBatch {
    pub uploaded: Vec<VideoRecord>,
    /// First failure; files after it were not attempted
    pub failure: Option<UploadFailure>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UploadFailure {
    pub file_name: String,
    pub error: String,
}

#[derive(Clone)]
pub struct VideoRepository {
    records: Repository<VideoRecord>,
    storage: Arc<dyn ObjectStorage>,
}

impl VideoRepository {
    pub fn new(table: Arc<dyn Table<VideoRecord>>, storage: Arc<dyn ObjectStorage>) -> Self {
        Self {
            records: Repository::new(table),
            storage,
        }
    }

    pub fn state(&self) -> CallState {
        self.records.state()
    }

    pub async fn list(&self, filter: &VideoFilter) -> BackendResult<Vec<VideoRecord>> {
        self.records.list(filter).await
    }

    pub async fn find(&self, id: Uuid) -> BackendResult<Option<VideoRecord>> {
        self.records.find(id).await
    }

    /// Portfolio videos, newest first
    pub async fn portfolio(&self) -> BackendResult<Vec<VideoRecord>> {
        self.list(&VideoFilter::category(VideoCategory::Portfolio))
            .await
    }

    /// The most recently uploaded hero video
    pub async fn hero(&self) -> BackendResult<Option<VideoRecord>> {
        let heroes = self.list(&VideoFilter::category(VideoCategory::Hero)).await?;
        Ok(heroes.into_iter().next())
    }

    /// Store the binary, then record its metadata
    pub async fn upload(
        &self,
        category: VideoCategory,
        file: VideoUpload,
    ) -> BackendResult<VideoRecord> {
        let key = object_key(category, &file.file_name, Utc::now().timestamp_millis());
        let name = file.name.unwrap_or_else(|| file.file_name.clone());

        self.records
            .tracker()
            .track(async {
                self.storage
                    .upload(&key, file.bytes, &file.content_type)
                    .await?;

                let stored = self
                    .records
                    .table
                    .insert(NewVideo {
                        name,
                        file_path: self.storage.public_url(&key),
                        video_type: category,
                    })
                    .await;

                match stored {
                    Ok(video) => {
                        info!(id = %video.id, %key, "Uploaded {} video", category);
                        Ok(video)
                    }
                    Err(e) => {
                        if let Err(cleanup) = self.storage.remove(&key).await {
                            warn!(%key, "Failed to remove object after insert failure: {}", cleanup);
                        }
                        Err(e)
                    }
                }
            })
            .await
    }

    /// Upload one file after another, stopping at the first failure
    pub async fn upload_many(&self, category: VideoCategory, files: Vec<VideoUpload>) -> UploadBatch {
        let mut batch = UploadBatch::default();

        for file in files {
            let file_name = file.file_name.clone();
            match self.upload(category, file).await {
                Ok(video) => batch.uploaded.push(video),
                Err(e) => {
                    batch.failure = Some(UploadFailure {
                        file_name,
                        error: e.to_string(),
                    });
                    break;
                }
            }
        }

        batch
    }

    pub async fn rename(&self, id: Uuid, name: String) -> BackendResult<VideoRecord> {
        self.records
            .update(id, VideoChanges { name: Some(name) })
            .await
    }

    /// Remove the stored object, then the row. A storage failure does not
    /// stop the row from being deleted; it is reported in the outcome.
    pub async fn delete(&self, video: &VideoRecord) -> BackendResult<VideoDeletion> {
        let outcome = match storage_key_from_url(&video.file_path) {
            Some(key) => match self.storage.remove(&key).await {
                Ok(()) => VideoDeletion::Removed,
                Err(e) => {
                    warn!(id = %video.id, %key, "Storage deletion error: {}", e);
                    VideoDeletion::StorageOrphaned {
                        key,
                        reason: e.to_string(),
                    }
                }
            },
            None => {
                warn!(id = %video.id, file_path = %video.file_path, "No storage key in file path");
                VideoDeletion::StorageOrphaned {
                    key: String::new(),
                    reason: format!("no storage key in '{}'", video.file_path),
                }
            }
        };

        self.records.delete(video.id).await?;
        Ok(outcome)
    }
}

/// `<category>/<millis>-<uuid>.<ext>`
fn object_key(category: VideoCategory, file_name: &str, millis: i64) -> String {
    let stem = format!("{}/{}-{}", category, millis, Uuid::new_v4());
    match Path::new(file_name).extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{stem}.{}", ext.to_lowercase()),
        None => stem,
    }
}

/// Storage key of a public URL: its last two path segments
pub fn storage_key_from_url(url: &str) -> Option<String> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let mut segments = path.rsplit('/').filter(|s| !s.is_empty());
    let file = segments.next()?;
    let folder = segments.next()?;
    if folder.contains(':') {
        return None;
    }
    Some(format!("{folder}/{file}"))
}
