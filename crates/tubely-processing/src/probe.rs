//! Strongly-typed shape for the probe tool's JSON output.
//!
//! Only the first stream's display aspect ratio is load-bearing; every other
//! attribute the tool reports is ignored and left out of the shape.

use serde::Deserialize;

/// Parsed probe output: the stream list as reported on stdout.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProbeOutput {
    #[serde(default)]
    pub streams: Vec<StreamInfo>,
}

/// Per-stream metadata. All fields are optional; the tool omits them for
/// streams where they do not apply (e.g. audio streams).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StreamInfo {
    #[serde(default)]
    pub display_aspect_ratio: Option<String>,
}

impl ProbeOutput {
    /// Display aspect ratio of the first reported stream, if any.
    pub fn first_display_aspect_ratio(&self) -> Option<&str> {
        self.streams
            .first()
            .and_then(|s| s.display_aspect_ratio.as_deref())
    }
}
