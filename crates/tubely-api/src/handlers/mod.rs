pub mod video_upload;

pub use video_upload::upload_video;
