use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use tubely_core::models::{CreateVideoParams, Video};
use tubely_core::AppError;

/// Narrow persistence contract for video records.
///
/// The upload pipeline only ever fetches a record by identity and sets its
/// storage locator; the trait keeps those operations substitutable with an
/// in-memory fake in tests.
#[async_trait]
pub trait VideoRepository: Send + Sync {
    async fn create_video(
        &self,
        user_id: Uuid,
        params: CreateVideoParams,
    ) -> Result<Video, AppError>;

    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, AppError>;

    /// Set the storage locator on a record. Called only after the
    /// corresponding bytes are durably present in the object store.
    async fn set_video_url(&self, id: Uuid, url: &str) -> Result<Video, AppError>;
}

#[derive(Debug, sqlx::FromRow)]
struct VideoRow {
    id: Uuid,
    user_id: Uuid,
    title: String,
    description: String,
    thumbnail_url: Option<String>,
    video_url: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<VideoRow> for Video {
    fn from(row: VideoRow) -> Self {
        Video {
            id: row.id,
            user_id: row.user_id,
            title: row.title,
            description: row.description,
            thumbnail_url: row.thumbnail_url,
            video_url: row.video_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Postgres-backed video repository.
#[derive(Clone)]
pub struct PgVideoRepository {
    pool: PgPool,
}

impl PgVideoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VideoRepository for PgVideoRepository {
    async fn create_video(
        &self,
        user_id: Uuid,
        params: CreateVideoParams,
    ) -> Result<Video, AppError> {
        let row = sqlx::query_as::<_, VideoRow>(
            r#"
            INSERT INTO videos (id, user_id, title, description)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, title, description, thumbnail_url, video_url,
                      created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(&params.title)
        .bind(&params.description)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, AppError> {
        let row = sqlx::query_as::<_, VideoRow>(
            r#"
            SELECT id, user_id, title, description, thumbnail_url, video_url,
                   created_at, updated_at
            FROM videos
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn set_video_url(&self, id: Uuid, url: &str) -> Result<Video, AppError> {
        let row = sqlx::query_as::<_, VideoRow>(
            r#"
            UPDATE videos
            SET video_url = $2, updated_at = now()
            WHERE id = $1
            RETURNING id, user_id, title, description, thumbnail_url, video_url,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(url)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Video {} not found", id)))?;

        tracing::info!(video_id = %id, "Video record updated with storage locator");
        Ok(row.into())
    }
}
