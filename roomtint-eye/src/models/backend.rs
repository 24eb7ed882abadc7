//! Contract between the session and whatever produces raw segments

use async_trait::async_trait;
use roomtint_core::{RawSegment, Result};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Progress reported while a model loads and runs.
/// Percentages are informative only, not guaranteed exact.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "progress", rename_all = "lowercase")]
pub enum ProgressEvent {
    Loading,
    Downloading(f32),
    Ready,
    Segmenting,
}

pub type ProgressSink = mpsc::UnboundedSender<ProgressEvent>;

/// Produces labelled occupancy masks for an image
#[async_trait]
pub trait SegmentationBackend: Send + Sync {
    /// Model identifier, for logging
    fn model_id(&self) -> &str;

    /// Segment `image_ref`, reporting progress through `progress`.
    /// Dropping `progress` early is allowed.
    async fn segment(&self, image_ref: &str, progress: ProgressSink) -> Result<Vec<RawSegment>>;
}
