//! Configuration module
//!
//! Immutable application configuration, constructed once at startup from the
//! environment and passed by handle into the pipeline. No ambient global state.

use std::env;
use std::path::PathBuf;

const DEFAULT_PORT: u16 = 8091;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 1 << 30; // 1 GiB
const DEFAULT_VIDEO_CONTENT_TYPE: &str = "video/mp4";

/// Storage backend selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageBackend {
    S3,
    Local,
}

impl StorageBackend {
    fn parse(s: &str) -> Result<Self, anyhow::Error> {
        match s.to_lowercase().as_str() {
            "s3" => Ok(StorageBackend::S3),
            "local" => Ok(StorageBackend::Local),
            other => Err(anyhow::anyhow!(
                "Invalid STORAGE_BACKEND '{}': expected 's3' or 'local'",
                other
            )),
        }
    }
}

/// Application configuration (read-only after startup).
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    pub jwt_secret: String,
    pub database_url: String,
    pub storage_backend: StorageBackend,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers
    pub assets_root: PathBuf,
    pub staging_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub video_content_type: String,
    pub ffmpeg_path: String,
    pub ffprobe_path: String,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let server_port = env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET must be set"))?;

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;

        let storage_backend = match env::var("STORAGE_BACKEND") {
            Ok(s) => StorageBackend::parse(&s)?,
            Err(_) => StorageBackend::S3,
        };

        let assets_root = env::var("ASSETS_ROOT")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./assets"));

        let staging_dir = env::var("STAGING_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| env::temp_dir());

        let max_upload_bytes = env::var("MAX_UPLOAD_BYTES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES);

        let config = Config {
            server_port,
            environment,
            jwt_secret,
            database_url,
            storage_backend,
            s3_bucket: env::var("S3_BUCKET").ok(),
            s3_region: env::var("S3_REGION")
                .or_else(|_| env::var("AWS_REGION"))
                .ok(),
            s3_endpoint: env::var("S3_ENDPOINT").ok(),
            assets_root,
            staging_dir,
            max_upload_bytes,
            video_content_type: env::var("VIDEO_CONTENT_TYPE")
                .unwrap_or_else(|_| DEFAULT_VIDEO_CONTENT_TYPE.to_string()),
            ffmpeg_path: env::var("FFMPEG_PATH").unwrap_or_else(|_| "ffmpeg".to_string()),
            ffprobe_path: env::var("FFPROBE_PATH").unwrap_or_else(|_| "ffprobe".to_string()),
        };

        config.validate()?;
        Ok(config)
    }

    /// Fail fast on misconfiguration instead of surfacing it on the first upload.
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.jwt_secret.len() < 32 {
            return Err(anyhow::anyhow!(
                "JWT_SECRET must be at least 32 bytes (got {})",
                self.jwt_secret.len()
            ));
        }
        if self.storage_backend == StorageBackend::S3 {
            if self.s3_bucket.is_none() {
                return Err(anyhow::anyhow!("S3_BUCKET must be set for the s3 backend"));
            }
            if self.s3_region.is_none() {
                return Err(anyhow::anyhow!(
                    "S3_REGION or AWS_REGION must be set for the s3 backend"
                ));
            }
        }
        if self.max_upload_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_UPLOAD_BYTES must be non-zero"));
        }
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }
}
