//! Object storage for uploaded videos
//!
//! Videos are pushed to a bucket through the S3 API (Supabase storage, MinIO
//! and AWS all speak it) and served from a public base URL. Removal can fail
//! independently of anything done to the metadata rows.

use std::collections::HashMap;

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::{Client, primitives::ByteStream};
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::info;

use crate::error::{BackendError, BackendResult};

/// Upload / public URL / remove operations on one bucket
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    async fn upload(&self, key: &str, body: Vec<u8>, content_type: &str) -> BackendResult<()>;

    /// Public URL an object is served from
    fn public_url(&self, key: &str) -> String;

    async fn remove(&self, key: &str) -> BackendResult<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    S3,
    Memory,
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_kind")]
    pub kind: StorageKind,
    /// Bucket holding the videos
    #[serde(default = "default_bucket")]
    pub bucket: String,
    /// Base URL objects are publicly served from; the key is appended
    pub public_base_url: String,
    /// Custom S3 endpoint (Supabase, MinIO); AWS when absent
    #[serde(default)]
    pub endpoint_url: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
}

fn default_kind() -> StorageKind {
    StorageKind::S3
}

fn default_bucket() -> String {
    "videos".to_string()
}

fn join_url(base: &str, key: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), key.trim_start_matches('/'))
}

/// S3-compatible bucket
#[derive(Clone)]
pub struct S3Storage {
    client: Client,
    bucket: String,
    public_base_url: String,
}

impl S3Storage {
    pub fn new(client: Client, bucket: String, public_base_url: String) -> Self {
        Self {
            client,
            bucket,
            public_base_url,
        }
    }

    /// Build a client from the default AWS credential chain, honouring a
    /// custom endpoint and region from the configuration
    pub async fn from_config(config: &StorageConfig) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &config.region {
            loader = loader.region(aws_sdk_s3::config::Region::new(region.clone()));
        }
        let sdk_config = loader.load().await;

        let mut builder = aws_sdk_s3::config::Builder::from(&sdk_config);
        if let Some(endpoint) = &config.endpoint_url {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        info!(bucket = %config.bucket, "S3 storage client initialized");

        Self::new(
            Client::from_conf(builder.build()),
            config.bucket.clone(),
            config.public_base_url.clone(),
        )
    }
}

#[async_trait]
impl ObjectStorage for S3Storage {
    async fn upload(&self, key: &str, body: Vec<u8>, content_type: &str) -> BackendResult<()> {
        info!("Uploading object to S3: {}", key);

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| BackendError::Storage(format!("upload of {key} failed: {e}")))?;

        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        join_url(&self.public_base_url, key)
    }

    async fn remove(&self, key: &str) -> BackendResult<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| BackendError::Storage(format!("removal of {key} failed: {e}")))?;

        Ok(())
    }
}

/// A stored object kept in memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub body: Vec<u8>,
    pub content_type: String,
}

/// Bucket kept in process memory. Removing a missing key is an error, the
/// way a strict object store reports it.
pub struct MemoryStorage {
    public_base_url: String,
    objects: RwLock<HashMap<String, StoredObject>>,
}

impl MemoryStorage {
    pub fn new(public_base_url: impl Into<String>) -> Self {
        Self {
            public_base_url: public_base_url.into(),
            objects: RwLock::new(HashMap::new()),
        }
    }

    pub async fn get(&self, key: &str) -> Option<StoredObject> {
        self.objects.read().await.get(key).cloned()
    }

    pub async fn keys(&self) -> Vec<String> {
        let mut keys: Vec<_> = self.objects.read().await.keys().cloned().collect();
        keys.sort();
        keys
    }
}

#[async_trait]
impl ObjectStorage for MemoryStorage {
    async fn upload(&self, key: &str, body: Vec<u8>, content_type: &str) -> BackendResult<()> {
        self.objects.write().await.insert(
            key.to_string(),
            StoredObject {
                body,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        join_url(&self.public_base_url, key)
    }

    async fn remove(&self, key: &str) -> BackendResult<()> {
        self.objects
            .write()
            .await
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| BackendError::Storage(format!("object {key} not found")))
    }
}
