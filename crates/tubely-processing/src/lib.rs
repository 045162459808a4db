//! Tubely Processing Library
//!
//! External media tooling: probing stream metadata (ffprobe), rewriting
//! containers for fast-start playback (ffmpeg), and geometry classification.
//! The tools are modeled as an injectable capability (`MediaTools`) so tests
//! can substitute a fake.

pub mod aspect;
pub mod probe;
pub mod tools;

pub use aspect::classify_file;
pub use probe::{ProbeOutput, StreamInfo};
pub use tools::{FfmpegTools, MediaTools, ProcessingError};
