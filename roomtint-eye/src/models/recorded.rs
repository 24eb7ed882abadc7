//! Backend replaying previously recorded model output

use crate::models::backend::{ProgressEvent, ProgressSink, SegmentationBackend};
use async_trait::async_trait;
use roomtint_core::{Error, RawSegment, Result};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Clone)]
enum Source {
    Segments(Vec<RawSegment>),
    File(PathBuf),
    Failure(String),
}

/// Replays a recorded inference result: the JSON array of
/// `{label, mask: {width, height, data}}` the segmentation model emits
#[derive(Debug, Clone)]
pub struct RecordedBackend {
    model_id: String,
    source: Source,
    latency: Option<Duration>,
}

impl RecordedBackend {
    pub fn from_segments(model_id: impl Into<String>, segments: Vec<RawSegment>) -> Self {
        Self {
            model_id: model_id.into(),
            source: Source::Segments(segments),
            latency: None,
        }
    }

    /// Parse a recorded output eagerly
    pub fn from_json(model_id: impl Into<String>, json: &str) -> Result<Self> {
        let segments = parse_segments(json)?;
        Ok(Self::from_segments(model_id, segments))
    }

    /// Read a recorded output lazily, on every `segment` call
    pub fn from_file(model_id: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            model_id: model_id.into(),
            source: Source::File(path.into()),
            latency: None,
        }
    }

    /// Backend that always fails, as an unavailable model would
    pub fn failing(model_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            model_id: model_id.into(),
            source: Source::Failure(reason.into()),
            latency: None,
        }
    }

    /// Simulated inference latency
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }
}

fn parse_segments(json: &str) -> Result<Vec<RawSegment>> {
    serde_json::from_str(json)
        .map_err(|e| Error::InferenceUnavailable(format!("Invalid recorded output: {}", e)))
}

#[async_trait]
impl SegmentationBackend for RecordedBackend {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn segment(&self, image_ref: &str, progress: ProgressSink) -> Result<Vec<RawSegment>> {
        info!("Segmenting '{}' with recorded output of {}", image_ref, self.model_id);
        // progress is best-effort; the receiver may already be gone
        let _ = progress.send(ProgressEvent::Loading);
        for pct in [0.0, 50.0, 100.0] {
            let _ = progress.send(ProgressEvent::Downloading(pct));
        }
        let _ = progress.send(ProgressEvent::Ready);
        let _ = progress.send(ProgressEvent::Segmenting);

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let segments = match &self.source {
            Source::Segments(segments) => segments.clone(),
            Source::File(path) => {
                let content = tokio::fs::read_to_string(path).await.map_err(|e| {
                    Error::InferenceUnavailable(format!("{}: {}", path.display(), e))
                })?;
                parse_segments(&content)?
            }
            Source::Failure(reason) => return Err(Error::InferenceUnavailable(reason.clone())),
        };

        debug!("Recorded output has {} segments", segments.len());
        Ok(segments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    const RECORDED: &str = r#"[
        {"label": "wall", "mask": {"width": 2, "height": 1, "data": [1, 0]}},
        {"label": "sky", "mask": {"width": 2, "height": 1, "data": [0, 1]}}
    ]"#;

    #[tokio::test]
    async fn test_replays_segments_and_progress() {
        let backend = RecordedBackend::from_json("test-model", RECORDED).unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let segments = backend.segment("room.jpg", tx).await.unwrap();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].label, "wall");
        assert_eq!(segments[0].mask.data, vec![1.0, 0.0]);

        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }
        assert_eq!(events.first(), Some(&ProgressEvent::Loading));
        assert_eq!(events.last(), Some(&ProgressEvent::Segmenting));
        assert!(events.contains(&ProgressEvent::Ready));
    }

    #[tokio::test]
    async fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("segments.json");
        std::fs::write(&path, RECORDED).unwrap();

        let backend = RecordedBackend::from_file("test-model", &path);
        let (tx, _rx) = mpsc::unbounded_channel();
        assert_eq!(backend.segment("room.jpg", tx).await.unwrap().len(), 2);

        let missing = RecordedBackend::from_file("test-model", dir.path().join("nope.json"));
        let (tx, _rx) = mpsc::unbounded_channel();
        assert!(matches!(
            missing.segment("room.jpg", tx).await,
            Err(Error::InferenceUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_failing_backend() {
        let backend = RecordedBackend::failing("test-model", "model failed to load");
        let (tx, _rx) = mpsc::unbounded_channel();
        match backend.segment("room.jpg", tx).await {
            Err(Error::InferenceUnavailable(msg)) => assert!(msg.contains("failed to load")),
            other => panic!("Expected InferenceUnavailable, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_json() {
        assert!(RecordedBackend::from_json("test-model", "{not json").is_err());
    }
}
