//! Test helpers: build the router with in-memory fakes.
//!
//! The repository, object store, and media tools all sit behind traits, so
//! integration tests run the full HTTP pipeline without Postgres, S3, or the
//! ffmpeg binaries.

#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::TestServer;
use chrono::{Duration, Utc};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tubely_api::auth::issue_token;
use tubely_api::setup::routes::setup_routes;
use tubely_api::state::AppState;
use tubely_core::{AppError, Config, CreateVideoParams, StorageBackend, Video};
use tubely_db::VideoRepository;
use tubely_processing::{MediaTools, ProbeOutput, ProcessingError, StreamInfo};
use tubely_storage::{ObjectStorage, StorageError, StorageResult};
use uuid::Uuid;

pub const TEST_JWT_SECRET: &str = "integration-test-secret-0123456789abcdef";

/// In-memory video repository.
pub struct FakeVideoRepo {
    videos: Mutex<HashMap<Uuid, Video>>,
    pub update_calls: AtomicUsize,
    pub fail_updates: AtomicBool,
}

impl FakeVideoRepo {
    pub fn new() -> Self {
        Self {
            videos: Mutex::new(HashMap::new()),
            update_calls: AtomicUsize::new(0),
            fail_updates: AtomicBool::new(false),
        }
    }

    pub fn get(&self, id: Uuid) -> Option<Video> {
        self.videos.lock().unwrap().get(&id).cloned()
    }
}

#[async_trait]
impl VideoRepository for FakeVideoRepo {
    async fn create_video(
        &self,
        user_id: Uuid,
        params: CreateVideoParams,
    ) -> Result<Video, AppError> {
        let now = Utc::now();
        let video = Video {
            id: Uuid::new_v4(),
            user_id,
            title: params.title,
            description: params.description,
            thumbnail_url: None,
            video_url: None,
            created_at: now,
            updated_at: now,
        };
        self.videos.lock().unwrap().insert(video.id, video.clone());
        Ok(video)
    }

    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, AppError> {
        Ok(self.videos.lock().unwrap().get(&id).cloned())
    }

    async fn set_video_url(&self, id: Uuid, url: &str) -> Result<Video, AppError> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(AppError::Database(sqlx::Error::PoolClosed));
        }
        let mut guard = self.videos.lock().unwrap();
        let video = guard
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Video {} not found", id)))?;
        video.video_url = Some(url.to_string());
        video.updated_at = Utc::now();
        Ok(video.clone())
    }
}

/// Object store fake that records every put.
pub struct FakeStorage {
    pub puts: Mutex<Vec<(String, String, usize)>>,
    pub fail_puts: AtomicBool,
}

impl FakeStorage {
    pub fn new() -> Self {
        Self {
            puts: Mutex::new(Vec::new()),
            fail_puts: AtomicBool::new(false),
        }
    }

    pub fn put_count(&self) -> usize {
        self.puts.lock().unwrap().len()
    }
}

#[async_trait]
impl ObjectStorage for FakeStorage {
    async fn put(&self, key: &str, content_type: &str, data: Vec<u8>) -> StorageResult<String> {
        if self.fail_puts.load(Ordering::SeqCst) {
            return Err(StorageError::UploadFailed("simulated outage".to_string()));
        }
        self.puts
            .lock()
            .unwrap()
            .push((key.to_string(), content_type.to_string(), data.len()));
        Ok(format!("https://cdn.test/{}", key))
    }
}

/// Media tools fake. `rewrite` copies its input so the pipeline has a real
/// file to read back; `probe` reports a configurable aspect ratio.
pub struct FakeTools {
    ratio: Option<String>,
    pub fail_rewrite: AtomicBool,
    pub rewrite_calls: AtomicUsize,
    pub probe_calls: AtomicUsize,
}

impl FakeTools {
    pub fn new(ratio: Option<&str>) -> Self {
        Self {
            ratio: ratio.map(String::from),
            fail_rewrite: AtomicBool::new(false),
            rewrite_calls: AtomicUsize::new(0),
            probe_calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl MediaTools for FakeTools {
    async fn probe(&self, _path: &Path) -> Result<ProbeOutput, ProcessingError> {
        self.probe_calls.fetch_add(1, Ordering::SeqCst);
        Ok(ProbeOutput {
            streams: vec![StreamInfo {
                display_aspect_ratio: self.ratio.clone(),
            }],
        })
    }

    async fn rewrite(&self, path: &Path) -> Result<PathBuf, ProcessingError> {
        self.rewrite_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_rewrite.load(Ordering::SeqCst) {
            return Err(ProcessingError::ToolFailed {
                tool: "ffmpeg",
                stderr: "moov atom not found".to_string(),
            });
        }
        let out = PathBuf::from(format!("{}.faststart.mp4", path.display()));
        tokio::fs::copy(path, &out).await?;
        Ok(out)
    }
}

/// Test application: server, fakes, and owned temp directories.
pub struct TestApp {
    pub server: TestServer,
    pub repo: Arc<FakeVideoRepo>,
    pub storage: Arc<FakeStorage>,
    pub tools: Arc<FakeTools>,
    pub staging_dir: TempDir,
    _assets_dir: TempDir,
}

impl TestApp {
    /// Seed a video record with no media attached.
    pub async fn seed_video(&self, user_id: Uuid) -> Video {
        self.repo
            .create_video(
                user_id,
                CreateVideoParams {
                    title: "Boots on parade".to_string(),
                    description: "A tour of the talking bear's estate".to_string(),
                },
            )
            .await
            .unwrap()
    }

    /// Number of files left behind in the staging directory.
    pub fn staged_file_count(&self) -> usize {
        std::fs::read_dir(self.staging_dir.path()).unwrap().count()
    }
}

pub struct TestAppBuilder {
    ratio: Option<String>,
    max_upload_bytes: usize,
}

impl TestAppBuilder {
    pub fn new() -> Self {
        Self {
            ratio: Some("16:9".to_string()),
            max_upload_bytes: 1 << 30,
        }
    }

    pub fn ratio(mut self, ratio: Option<&str>) -> Self {
        self.ratio = ratio.map(String::from);
        self
    }

    pub fn max_upload_bytes(mut self, max: usize) -> Self {
        self.max_upload_bytes = max;
        self
    }

    pub fn build(self) -> TestApp {
        let staging_dir = tempfile::tempdir().unwrap();
        let assets_dir = tempfile::tempdir().unwrap();

        let config = Config {
            server_port: 8091,
            environment: "test".to_string(),
            jwt_secret: TEST_JWT_SECRET.to_string(),
            database_url: "postgres://unused".to_string(),
            storage_backend: StorageBackend::Local,
            s3_bucket: None,
            s3_region: None,
            s3_endpoint: None,
            assets_root: assets_dir.path().to_path_buf(),
            staging_dir: staging_dir.path().to_path_buf(),
            max_upload_bytes: self.max_upload_bytes,
            video_content_type: "video/mp4".to_string(),
            ffmpeg_path: "ffmpeg".to_string(),
            ffprobe_path: "ffprobe".to_string(),
        };

        let repo = Arc::new(FakeVideoRepo::new());
        let storage = Arc::new(FakeStorage::new());
        let tools = Arc::new(FakeTools::new(self.ratio.as_deref()));

        let state = Arc::new(AppState::new(
            config.clone(),
            repo.clone(),
            storage.clone(),
            tools.clone(),
        ));
        let router = setup_routes(&config, state);
        let server = TestServer::new(router).unwrap();

        TestApp {
            server,
            repo,
            storage,
            tools,
            staging_dir,
            _assets_dir: assets_dir,
        }
    }
}

pub fn setup_test_app() -> TestApp {
    TestAppBuilder::new().build()
}

/// Authorization header value for `user_id`.
pub fn bearer(user_id: Uuid) -> String {
    let token = issue_token(TEST_JWT_SECRET, user_id, Duration::hours(1)).unwrap();
    format!("Bearer {}", token)
}

/// A minimal MP4-shaped byte string: an `ftyp` box followed by padding.
pub fn mp4_bytes() -> Vec<u8> {
    let mut data = vec![
        0x00, 0x00, 0x00, 0x18, b'f', b't', b'y', b'p', b'i', b's', b'o', b'm', 0x00, 0x00, 0x02,
        0x00, b'i', b's', b'o', b'm', b'm', b'p', b'4', b'1',
    ];
    data.extend(std::iter::repeat(0u8).take(1024));
    data
}
