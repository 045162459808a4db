//! Domain models

mod aspect;
mod video;

pub use aspect::Aspect;
pub use video::{CreateVideoParams, Video, VideoResponse};
