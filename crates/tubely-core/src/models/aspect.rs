use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Coarse display-geometry bucket for a video, used as the storage key prefix.
///
/// `Other` means "unknown or non-standard", never a semantic guarantee: a failed
/// or absent probe classifies as `Other` as well.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Aspect {
    Landscape,
    Portrait,
    Other,
}

impl Aspect {
    /// Storage key prefix for this geometry class.
    pub fn as_str(&self) -> &'static str {
        match self {
            Aspect::Landscape => "landscape",
            Aspect::Portrait => "portrait",
            Aspect::Other => "other",
        }
    }

    /// Classify a display aspect ratio string as reported by the probe tool.
    /// Only the exact strings "16:9" and "9:16" map to a named bucket.
    pub fn from_display_ratio(ratio: &str) -> Self {
        match ratio {
            "16:9" => Aspect::Landscape,
            "9:16" => Aspect::Portrait,
            _ => Aspect::Other,
        }
    }
}

impl Display for Aspect {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}
