//! Tubely DB Library
//!
//! Persistence for video records. The pipeline consumes records through the
//! `VideoRepository` trait; `PgVideoRepository` is the Postgres
//! implementation. Schema lives in `migrations/` at the workspace root.

mod videos;

pub use videos::{PgVideoRepository, VideoRepository};
