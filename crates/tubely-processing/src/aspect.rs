//! Best-effort geometry classification.
//!
//! Classification only buckets storage keys by orientation, so it fails open:
//! any probe failure (launch, exit, or malformed output) classifies as
//! `Other` rather than failing the upload.

use std::path::Path;

use tubely_core::Aspect;

use crate::tools::MediaTools;

/// Classify a video file's display geometry via the probe tool.
///
/// Returns `Landscape` for an exact `"16:9"` first-stream display aspect
/// ratio, `Portrait` for `"9:16"`, and `Other` for everything else including
/// an empty stream list, a missing ratio field, or any probe error.
pub async fn classify_file(tools: &dyn MediaTools, path: &Path) -> Aspect {
    match tools.probe(path).await {
        Ok(output) => match output.first_display_aspect_ratio() {
            Some(ratio) => Aspect::from_display_ratio(ratio),
            None => Aspect::Other,
        },
        Err(e) => {
            tracing::debug!(
                path = %path.display(),
                error = %e,
                "Probe failed, classifying as other"
            );
            Aspect::Other
        }
    }
}
