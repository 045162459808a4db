//! Application state shared across handlers.
//!
//! Collaborators sit behind trait objects so integration tests can swap in
//! fakes for the database, the object store, and the external media tools.

use std::sync::Arc;
use tubely_core::Config;
use tubely_db::VideoRepository;
use tubely_processing::MediaTools;
use tubely_storage::ObjectStorage;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub videos: Arc<dyn VideoRepository>,
    pub storage: Arc<dyn ObjectStorage>,
    pub tools: Arc<dyn MediaTools>,
}

impl AppState {
    pub fn new(
        config: Config,
        videos: Arc<dyn VideoRepository>,
        storage: Arc<dyn ObjectStorage>,
        tools: Arc<dyn MediaTools>,
    ) -> Self {
        Self {
            config,
            videos,
            storage,
            tools,
        }
    }
}
