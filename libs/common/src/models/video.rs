//! Portfolio and hero video metadata

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::text_enum;

text_enum! {
    /// Where a video is shown on the site
    VideoCategory as "video category" {
        Portfolio => "portfolio",
        Hero => "hero",
    }
}

/// Metadata row for a video stored in the `videos` bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoRecord {
    pub id: Uuid,
    pub name: String,
    /// Public URL of the stored object
    pub file_path: String,
    pub video_type: VideoCategory,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewVideo {
    pub name: String,
    pub file_path: String,
    pub video_type: VideoCategory,
}

/// Partial update; `updated_at` is always refreshed
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VideoChanges {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VideoFilter {
    pub video_type: Option<VideoCategory>,
}

impl VideoFilter {
    pub fn category(category: VideoCategory) -> Self {
        Self {
            video_type: Some(category),
        }
    }
}
