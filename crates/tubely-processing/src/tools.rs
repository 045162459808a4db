//! External media tool invocation.
//!
//! `MediaTools` is the capability seam for the two subprocesses the pipeline
//! depends on: a metadata probe and a container rewrite. `FfmpegTools` is the
//! production implementation over ffprobe/ffmpeg.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use thiserror::Error;
use tokio::process::Command;

use crate::probe::ProbeOutput;

#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error("Failed to launch {tool}: {message}")]
    Launch { tool: &'static str, message: String },

    #[error("{tool} failed: {stderr}")]
    ToolFailed { tool: &'static str, stderr: String },

    #[error("Malformed probe output: {0}")]
    MalformedProbeOutput(String),

    #[error("Rewrite produced no usable output: {0}")]
    EmptyOutput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Capability over the external media tools.
///
/// `probe` extracts stream metadata; `rewrite` produces a new local file with
/// a fast-start container layout. Both take a local file path; neither
/// modifies or deletes its input. The caller owns cleanup of the input and of
/// any file `rewrite` produces.
#[async_trait]
pub trait MediaTools: Send + Sync {
    async fn probe(&self, path: &Path) -> Result<ProbeOutput, ProcessingError>;

    async fn rewrite(&self, path: &Path) -> Result<PathBuf, ProcessingError>;
}

/// Production implementation over the ffprobe/ffmpeg command lines.
#[derive(Clone)]
pub struct FfmpegTools {
    ffmpeg_path: String,
    ffprobe_path: String,
}

impl FfmpegTools {
    pub fn new(ffmpeg_path: String, ffprobe_path: String) -> Self {
        Self {
            ffmpeg_path,
            ffprobe_path,
        }
    }
}

#[async_trait]
impl MediaTools for FfmpegTools {
    /// Probe a local file for stream metadata.
    ///
    /// The tool's exit code is deliberately ignored: classification is
    /// best-effort, and a truncated run simply yields output that fails to
    /// parse. Launch failure and parse failure both surface as errors for the
    /// caller to treat as "unknown".
    async fn probe(&self, path: &Path) -> Result<ProbeOutput, ProcessingError> {
        let output = Command::new(&self.ffprobe_path)
            .args(["-v", "error", "-print_format", "json", "-show_streams"])
            .arg(path)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| ProcessingError::Launch {
                tool: "ffprobe",
                message: e.to_string(),
            })?;

        serde_json::from_slice(&output.stdout)
            .map_err(|e| ProcessingError::MalformedProbeOutput(e.to_string()))
    }

    /// Rewrite a container so index metadata precedes media data, allowing
    /// playback to begin before the whole file is downloaded.
    ///
    /// Non-destructive: the input file is never touched. The output lands in
    /// a sibling path derived from the input; the caller owns its removal.
    async fn rewrite(&self, path: &Path) -> Result<PathBuf, ProcessingError> {
        let output_path = PathBuf::from(format!("{}.faststart.mp4", path.display()));

        let start = std::time::Instant::now();
        let output = Command::new(&self.ffmpeg_path)
            .arg("-i")
            .arg(path)
            .args(["-codec", "copy", "-movflags", "faststart", "-f", "mp4"])
            .arg(&output_path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| ProcessingError::Launch {
                tool: "ffmpeg",
                message: e.to_string(),
            })?;

        if !output.status.success() {
            // ffmpeg creates the output file before failing; remove the partial.
            let _ = tokio::fs::remove_file(&output_path).await;
            return Err(ProcessingError::ToolFailed {
                tool: "ffmpeg",
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        let meta = match tokio::fs::metadata(&output_path).await {
            Ok(meta) if meta.len() > 0 => meta,
            _ => {
                let _ = tokio::fs::remove_file(&output_path).await;
                return Err(ProcessingError::EmptyOutput(
                    output_path.display().to_string(),
                ));
            }
        };

        tracing::info!(
            input = %path.display(),
            output = %output_path.display(),
            size_bytes = meta.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Fast-start rewrite completed"
        );

        Ok(output_path)
    }
}
