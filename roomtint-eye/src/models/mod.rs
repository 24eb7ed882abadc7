//! Segmentation model collaborator

pub mod backend;
pub mod recorded;

pub use backend::{ProgressEvent, ProgressSink, SegmentationBackend};
pub use recorded::RecordedBackend;
