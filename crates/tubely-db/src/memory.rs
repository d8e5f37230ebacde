//! In-process video repository
//!
//! Used by the pipeline and HTTP tests so they run without PostgreSQL.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tubely_core::models::{CreateVideoParams, Video};
use tubely_core::AppError;
use uuid::Uuid;

use crate::video::{not_found, VideoRepository};

#[derive(Clone, Default)]
pub struct InMemoryVideoRepository {
    videos: Arc<Mutex<HashMap<Uuid, Video>>>,
    fail_updates: Arc<AtomicBool>,
}

impl InMemoryVideoRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a record as-is, replacing any existing record with the same id.
    pub fn insert(&self, video: Video) -> Result<(), AppError> {
        self.lock()?.insert(video.id, video);
        Ok(())
    }

    /// Make every subsequent `update` fail with a database-style error.
    pub fn set_fail_updates(&self, fail: bool) {
        self.fail_updates.store(fail, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.lock().map(|videos| videos.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<Uuid, Video>>, AppError> {
        self.videos
            .lock()
            .map_err(|_| AppError::Internal("video store lock poisoned".to_string()))
    }
}

#[async_trait]
impl VideoRepository for InMemoryVideoRepository {
    async fn create(&self, user_id: Uuid, params: CreateVideoParams) -> Result<Video, AppError> {
        let video = Video::new(user_id, params);
        self.lock()?.insert(video.id, video.clone());
        Ok(video)
    }

    async fn get(&self, id: Uuid) -> Result<Video, AppError> {
        self.lock()?.get(&id).cloned().ok_or_else(|| not_found(id))
    }

    async fn update(&self, video: &Video) -> Result<Video, AppError> {
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(AppError::Internal("simulated update failure".to_string()));
        }

        let mut videos = self.lock()?;
        let stored = videos.get_mut(&video.id).ok_or_else(|| not_found(video.id))?;
        stored.title = video.title.clone();
        stored.description = video.description.clone();
        stored.thumbnail_url = video.thumbnail_url.clone();
        stored.video_url = video.video_url.clone();
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Video>, AppError> {
        let mut videos: Vec<Video> = self
            .lock()?
            .values()
            .filter(|v| v.user_id == user_id)
            .cloned()
            .collect();
        videos.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(videos)
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.lock()?.remove(&id).map(|_| ()).ok_or_else(|| not_found(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn params(title: &str) -> CreateVideoParams {
        CreateVideoParams {
            title: title.to_string(),
            description: String::new(),
        }
    }

    #[tokio::test]
    async fn test_get_unknown_is_not_found() {
        let repo = InMemoryVideoRepository::new();
        let err = repo.get(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_preserves_identity_and_bumps_timestamp() {
        let repo = InMemoryVideoRepository::new();
        let owner = Uuid::new_v4();
        let video = repo.create(owner, params("Boots")).await.unwrap();

        let changed = video.with_video_url("https://example.com/v.mp4".to_string());
        let updated = repo.update(&changed).await.unwrap();

        assert_eq!(updated.id, video.id);
        assert_eq!(updated.user_id, owner);
        assert_eq!(updated.created_at, video.created_at);
        assert!(updated.updated_at >= video.updated_at);
        assert_eq!(updated.video_url.as_deref(), Some("https://example.com/v.mp4"));
        assert_eq!(repo.get(video.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_update_unknown_is_not_found() {
        let repo = InMemoryVideoRepository::new();
        let ghost = Video::new(Uuid::new_v4(), params("Ghost"));
        assert!(matches!(
            repo.update(&ghost).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_list_for_user_newest_first() {
        let repo = InMemoryVideoRepository::new();
        let owner = Uuid::new_v4();

        let mut older = Video::new(owner, params("older"));
        older.created_at = Utc::now() - Duration::hours(1);
        repo.insert(older.clone()).unwrap();
        let newer = repo.create(owner, params("newer")).await.unwrap();
        repo.create(Uuid::new_v4(), params("someone else")).await.unwrap();

        let listed = repo.list_for_user(owner).await.unwrap();
        let ids: Vec<Uuid> = listed.iter().map(|v| v.id).collect();
        assert_eq!(ids, vec![newer.id, older.id]);
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = InMemoryVideoRepository::new();
        let video = repo.create(Uuid::new_v4(), params("gone")).await.unwrap();
        repo.delete(video.id).await.unwrap();
        assert!(repo.is_empty());
        assert!(repo.delete(video.id).await.is_err());
    }

    #[tokio::test]
    async fn test_failing_updates() {
        let repo = InMemoryVideoRepository::new();
        let video = repo.create(Uuid::new_v4(), params("x")).await.unwrap();
        repo.set_fail_updates(true);
        assert!(repo.update(&video).await.is_err());
    }
}
