use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Video metadata record.
///
/// The upload pipelines only ever read `user_id` and write one of the two URL
/// fields; everything else is carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Video {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub thumbnail_url: Option<String>,
    pub video_url: Option<String>,
    pub title: String,
    pub description: String,
    pub user_id: Uuid,
}

impl Video {
    pub fn new(user_id: Uuid, params: CreateVideoParams) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            thumbnail_url: None,
            video_url: None,
            title: params.title,
            description: params.description,
            user_id,
        }
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }

    /// Copy of this record with only the video URL replaced.
    pub fn with_video_url(&self, url: String) -> Self {
        Self {
            video_url: Some(url),
            ..self.clone()
        }
    }

    /// Copy of this record with only the thumbnail URL replaced.
    pub fn with_thumbnail_url(&self, url: String) -> Self {
        Self {
            thumbnail_url: Some(url),
            ..self.clone()
        }
    }
}

/// Parameters supplied when a draft video record is created.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateVideoParams {
    pub title: String,
    #[serde(default)]
    pub description: String,
}
