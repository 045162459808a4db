//! Application setup and initialization
//!
//! This module contains all application initialization logic extracted from
//! main.rs for better organization and testability.

pub mod database;
pub mod routes;
pub mod server;

use crate::state::AppState;
use anyhow::{Context, Result};
use std::sync::Arc;
use tubely_core::Config;
use tubely_processing::FfmpegTools;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    config
        .validate()
        .context("Configuration validation failed")?;

    crate::telemetry::init_telemetry();

    tracing::info!("Configuration loaded and validated successfully");

    let pool = database::setup_database(&config).await?;

    let storage = tubely_storage::create_storage(&config)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to initialize storage: {}", e))?;

    let videos = Arc::new(tubely_db::PgVideoRepository::new(pool));
    let tools = Arc::new(FfmpegTools::new(
        config.ffmpeg_path.clone(),
        config.ffprobe_path.clone(),
    ));

    let state = Arc::new(AppState::new(config.clone(), videos, storage, tools));

    let router = routes::setup_routes(&config, state.clone());

    Ok((state, router))
}
