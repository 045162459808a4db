//! Video upload pipeline.
//!
//! POST /api/videos/{video_id} accepts a multipart form with a `video` field,
//! stages the body to a local temp file, rewrites it for fast-start playback,
//! classifies its aspect ratio, writes it to object storage under a
//! collision-resistant key, and records the resulting locator on the video
//! row. Ownership is checked before any body bytes are read.

use crate::auth::AuthContext;
use crate::error::HttpAppError;
use crate::state::AppState;
use axum::{
    extract::{multipart::Field, Multipart, Path, State},
    Json,
};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempPath;
use tokio::io::AsyncWriteExt;
use tubely_core::{AppError, Aspect, VideoResponse};
use tubely_processing::classify_file;
use tubely_storage::keys;
use uuid::Uuid;

const UPLOAD_FIELD: &str = "video";
const STAGING_PREFIX: &str = "tubely-upload";

// Bounds on worst-case request latency. Subprocess invocations and the
// object store write are otherwise unbounded blocking calls.
const TOOL_TIMEOUT: Duration = Duration::from_secs(600);
const STORE_TIMEOUT: Duration = Duration::from_secs(300);

pub async fn upload_video(
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<String>,
    auth: AuthContext,
    mut multipart: Multipart,
) -> Result<Json<VideoResponse>, HttpAppError> {
    let video_id = Uuid::parse_str(&video_id)
        .map_err(|_| AppError::InvalidInput(format!("Invalid video ID: {}", video_id)))?;

    // Ownership is established before a single body byte is read.
    let video = state
        .videos
        .get_video(video_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Video {} not found", video_id)))?;

    if video.user_id != auth.user_id {
        return Err(HttpAppError(AppError::Forbidden(
            "Not the owner of this video".to_string(),
        )));
    }

    tracing::info!(video_id = %video_id, user_id = %auth.user_id, "Uploading video");

    let (media_type, staging_path) = receive_upload(&state, &mut multipart).await?;

    // Fast-start rewrite is mandatory: a failure here fails the upload.
    let processed_path = tokio::time::timeout(TOOL_TIMEOUT, state.tools.rewrite(&staging_path))
        .await
        .map_err(|_| AppError::Processing("Fast-start rewrite timed out".to_string()))?
        .map_err(|e| AppError::Processing(format!("Fast-start rewrite failed: {}", e)))?;
    // Owned as a temp path so the rewritten file is removed on every exit.
    let processed_path = TempPath::try_from_path(processed_path)
        .map_err(|e| AppError::Internal(format!("Failed to own processed file: {}", e)))?;

    // Classification is best-effort; a stalled probe falls back to Other.
    let aspect = match tokio::time::timeout(
        TOOL_TIMEOUT,
        classify_file(state.tools.as_ref(), &processed_path),
    )
    .await
    {
        Ok(aspect) => aspect,
        Err(_) => {
            tracing::warn!(video_id = %video_id, "Aspect probe timed out");
            Aspect::Other
        }
    };

    let token = keys::generate_token().map_err(HttpAppError::from)?;
    let extension = keys::extension_for_media_type(&media_type);
    let key = keys::build_key(aspect, &token, &extension);

    let data = tokio::fs::read(&processed_path)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to read processed file: {}", e)))?;
    let size_bytes = data.len();

    let url = tokio::time::timeout(STORE_TIMEOUT, state.storage.put(&key, &media_type, data))
        .await
        .map_err(|_| AppError::Storage("Object store write timed out".to_string()))?
        .map_err(HttpAppError::from)?;

    let video = state.videos.set_video_url(video_id, &url).await?;

    tracing::info!(
        video_id = %video_id,
        key = %key,
        aspect = %aspect,
        size_bytes = size_bytes,
        "Video upload complete"
    );

    Ok(Json(VideoResponse::from(video)))
}

/// Pull the `video` field out of the multipart body and stage it on disk.
///
/// Returns the declared media type and the staging file path. The path is a
/// `TempPath`, so the staging file is deleted when the handler returns,
/// whatever the outcome.
async fn receive_upload(
    state: &AppState,
    multipart: &mut Multipart,
) -> Result<(String, TempPath), HttpAppError> {
    loop {
        let field = multipart
            .next_field()
            .await
            .map_err(|e| AppError::InvalidInput(format!("Malformed multipart body: {}", e)))?;
        let Some(field) = field else {
            return Err(HttpAppError(AppError::InvalidInput(format!(
                "Missing multipart field '{}'",
                UPLOAD_FIELD
            ))));
        };

        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let media_type = normalize_media_type(field.content_type());
        if media_type.as_deref() != Some(state.config.video_content_type.as_str()) {
            return Err(HttpAppError(AppError::InvalidInput(format!(
                "Unsupported media type, expected {}",
                state.config.video_content_type
            ))));
        }
        let media_type = media_type.unwrap_or_default();

        let staging_path = stage_field(state, field).await?;
        return Ok((media_type, staging_path));
    }
}

/// Stream a multipart field to a temp file in the staging directory,
/// enforcing the upload size cap as bytes arrive.
async fn stage_field(state: &AppState, mut field: Field<'_>) -> Result<TempPath, HttpAppError> {
    let staging = tempfile::Builder::new()
        .prefix(STAGING_PREFIX)
        .suffix(".mp4")
        .tempfile_in(&state.config.staging_dir)
        .map_err(|e| AppError::Internal(format!("Failed to create staging file: {}", e)))?;
    let staging_path = staging.into_temp_path();

    let mut file = tokio::fs::File::create(&staging_path)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to open staging file: {}", e)))?;

    let mut written: usize = 0;
    loop {
        let chunk = field
            .chunk()
            .await
            .map_err(|e| AppError::InvalidInput(format!("Failed to read upload body: {}", e)))?;
        let Some(chunk) = chunk else { break };

        written += chunk.len();
        if written > state.config.max_upload_bytes {
            return Err(HttpAppError(AppError::PayloadTooLarge(format!(
                "Upload exceeds {} bytes",
                state.config.max_upload_bytes
            ))));
        }
        file.write_all(&chunk)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to write staging file: {}", e)))?;
    }

    file.flush()
        .await
        .map_err(|e| AppError::Internal(format!("Failed to flush staging file: {}", e)))?;
    drop(file);

    tracing::debug!(
        staging_path = %staging_path.display(),
        size_bytes = written,
        "Upload staged to disk"
    );

    Ok(staging_path)
}

/// Reduce a Content-Type header to its media type: strip parameters,
/// trim, lowercase.
fn normalize_media_type(content_type: Option<&str>) -> Option<String> {
    content_type.map(|ct| {
        ct.split(';')
            .next()
            .unwrap_or("")
            .trim()
            .to_ascii_lowercase()
    })
}
