//! Session controller: the single owner of one uploaded image's state

use crate::assets::AssetCache;
use crate::binding::MaterialBindings;
use crate::compositor::{CompositeRenderer, RenderLayer};
use crate::models::{ProgressEvent, SegmentationBackend};
use crate::processing::{ingest, HeuristicOrientation, MaskEncoder, OrientationPolicy};
use crate::regions::{Region, RegionIndex};
use crate::selection::{resolve, PointerEvent};
use crate::snapshot::SessionSnapshot;
use roomtint_core::{Error, Material, RawSegment, RegionId, Result, TintConfig};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

const EVENT_BUFFER_SIZE: usize = 64;

/// Lifecycle phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    Idle,
    Uploading,
    Inferring,
    Ready,
}

/// Progress or error status shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Idle,
    LoadingModel,
    Downloading(u8),
    ModelReady,
    Segmenting,
    Ready,
    Error(String),
}

impl Status {
    /// Stable identifier for presentation
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Idle => "idle",
            Status::LoadingModel => "loading_model",
            Status::Downloading(_) => "downloading",
            Status::ModelReady => "model_ready",
            Status::Segmenting => "segmenting",
            Status::Ready => "ready",
            Status::Error(_) => "error",
        }
    }

    pub fn message(&self) -> String {
        match self {
            Status::Idle => String::new(),
            Status::LoadingModel => "Loading the segmentation model (first run only)...".to_string(),
            Status::Downloading(pct) => format!("Downloading model: {}%", pct),
            Status::ModelReady => "Model ready, analyzing the image...".to_string(),
            Status::Segmenting => "Splitting the room into surfaces...".to_string(),
            Status::Ready => "Surfaces detected. Click a wall, floor or ceiling.".to_string(),
            Status::Error(reason) => format!("Image processing failed: {}", reason),
        }
    }

    pub fn progress(&self) -> Option<u8> {
        match self {
            Status::Downloading(pct) => Some(*pct),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Status::Error(_))
    }
}

impl From<ProgressEvent> for Status {
    fn from(event: ProgressEvent) -> Self {
        match event {
            ProgressEvent::Loading => Status::LoadingModel,
            ProgressEvent::Downloading(pct) => {
                let pct = if pct.is_finite() { pct.round().clamp(0.0, 100.0) } else { 0.0 };
                Status::Downloading(pct as u8)
            }
            ProgressEvent::Ready => Status::ModelReady,
            ProgressEvent::Segmenting => Status::Segmenting,
        }
    }
}

/// Notifications for observers of a session
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Reset,
    Status(Status),
    RegionsPublished { generation: u64, count: usize },
    SelectionChanged(Option<RegionId>),
    BindingChanged { region: RegionId, material: Option<Material> },
}

/// Handle for one inference launch. Results carrying an outdated
/// generation are discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferenceTicket {
    pub generation: u64,
    pub image_ref: String,
}

/// Outcome of delivering an inference result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// Regions published; the number of regions
    Published(usize),
    /// Result belonged to a superseded upload and was dropped
    Stale,
    /// Inference failed; the session is back to idle
    Failed(String),
}

/// Editable state for one uploaded image
#[derive(Debug, Clone)]
pub struct SessionState {
    image_ref: Option<String>,
    regions: Arc<RegionIndex>,
    selected: Option<RegionId>,
    bindings: MaterialBindings,
    status: Status,
    phase: SessionPhase,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            image_ref: None,
            regions: Arc::new(RegionIndex::empty()),
            selected: None,
            bindings: MaterialBindings::new(),
            status: Status::Idle,
            phase: SessionPhase::Idle,
        }
    }
}

impl SessionState {
    pub fn image_ref(&self) -> Option<&str> {
        self.image_ref.as_deref()
    }

    pub fn regions(&self) -> &RegionIndex {
        &self.regions
    }

    pub fn selected(&self) -> Option<RegionId> {
        self.selected
    }

    pub fn bindings(&self) -> &MaterialBindings {
        &self.bindings
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }
}

/// Serializes every mutation of a session's state
pub struct SessionController {
    config: Arc<TintConfig>,
    encoder: MaskEncoder,
    policy: Arc<dyn OrientationPolicy>,
    renderer: CompositeRenderer,
    state: SessionState,
    generation: u64,
    session_id: Uuid,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionController {
    pub fn new(config: TintConfig, assets: Arc<AssetCache>) -> Self {
        let policy = Arc::new(HeuristicOrientation::new(config.orientation.clone()));
        Self::with_policy(config, assets, policy)
    }

    /// Controller using a custom orientation policy
    pub fn with_policy(
        config: TintConfig,
        assets: Arc<AssetCache>,
        policy: Arc<dyn OrientationPolicy>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_BUFFER_SIZE);
        Self {
            encoder: MaskEncoder::new(&config.encoder),
            renderer: CompositeRenderer::new(config.render.clone(), assets),
            config: Arc::new(config),
            policy,
            state: SessionState::default(),
            generation: 0,
            session_id: Uuid::new_v4(),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub fn config(&self) -> &TintConfig {
        &self.config
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.phase
    }

    pub fn status(&self) -> &Status {
        &self.state.status
    }

    pub fn regions(&self) -> &RegionIndex {
        &self.state.regions
    }

    pub fn selected(&self) -> Option<RegionId> {
        self.state.selected
    }

    pub fn bindings(&self) -> &MaterialBindings {
        &self.state.bindings
    }

    fn emit(&self, event: SessionEvent) {
        // no subscribers is fine
        let _ = self.events.send(event);
    }

    fn set_status(&mut self, status: Status) {
        if self.state.status != status {
            self.state.status = status.clone();
            self.emit(SessionEvent::Status(status));
        }
    }

    /// Discard everything and return to `Idle`. In-flight inference
    /// results are invalidated.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.state = SessionState::default();
        info!("Session {} reset", self.session_id);
        self.emit(SessionEvent::Reset);
    }

    /// Start a new upload: resets the session atomically and issues the
    /// ticket the inference result must be delivered with.
    pub fn begin_upload(&mut self, image_ref: impl Into<String>) -> InferenceTicket {
        self.reset();
        self.session_id = Uuid::new_v4();
        let image_ref = image_ref.into();
        self.state.image_ref = Some(image_ref.clone());
        self.state.phase = SessionPhase::Uploading;
        info!(
            "Session {} uploading '{}' (generation {})",
            self.session_id, image_ref, self.generation
        );
        InferenceTicket {
            generation: self.generation,
            image_ref,
        }
    }

    /// Mark the ticket's inference as launched. Returns false for stale tickets.
    pub fn start_inference(&mut self, ticket: &InferenceTicket) -> bool {
        if ticket.generation != self.generation || self.state.phase != SessionPhase::Uploading {
            debug!("Ignoring start of stale inference generation {}", ticket.generation);
            return false;
        }
        self.state.phase = SessionPhase::Inferring;
        self.set_status(Status::LoadingModel);
        true
    }

    /// Apply a progress event. Returns false if it was stale.
    pub fn on_progress(&mut self, generation: u64, event: ProgressEvent) -> bool {
        if generation != self.generation || self.state.phase != SessionPhase::Inferring {
            debug!("Ignoring progress {:?} of generation {}", event, generation);
            return false;
        }
        self.set_status(Status::from(event));
        true
    }

    /// Deliver an inference result. Success publishes the full region
    /// batch at once; failure returns to `Idle` with an error status.
    pub fn complete(&mut self, generation: u64, result: Result<Vec<RawSegment>>) -> Completion {
        let in_flight = matches!(
            self.state.phase,
            SessionPhase::Uploading | SessionPhase::Inferring
        );
        if generation != self.generation || !in_flight {
            debug!(
                "Discarding inference result of generation {} (current {})",
                generation, self.generation
            );
            return Completion::Stale;
        }

        match result {
            Ok(segments) => {
                let accepted = ingest(segments);
                let regions = RegionIndex::build(accepted, &self.encoder, self.policy.as_ref());
                let count = regions.len();

                self.state.regions = Arc::new(regions);
                self.state.selected = None;
                self.state.bindings = MaterialBindings::new();
                self.state.phase = SessionPhase::Ready;
                info!("Session {} ready with {} regions", self.session_id, count);
                self.emit(SessionEvent::RegionsPublished { generation, count });
                self.set_status(Status::Ready);
                Completion::Published(count)
            }
            Err(e) => {
                let reason = match e {
                    Error::InferenceUnavailable(reason) => reason,
                    other => other.to_string(),
                };
                error!("Session {} inference failed: {}", self.session_id, reason);
                self.state.regions = Arc::new(RegionIndex::empty());
                self.state.selected = None;
                self.state.bindings = MaterialBindings::new();
                self.state.phase = SessionPhase::Idle;
                self.set_status(Status::Error(reason.clone()));
                Completion::Failed(reason)
            }
        }
    }

    /// Upload `image_ref` and run `backend` on it to completion,
    /// forwarding progress as it arrives. Returns the number of regions.
    pub async fn run_inference(
        &mut self,
        image_ref: impl Into<String>,
        backend: &dyn SegmentationBackend,
    ) -> Result<usize> {
        let ticket = self.begin_upload(image_ref);
        self.start_inference(&ticket);
        debug!("Running {} on '{}'", backend.model_id(), ticket.image_ref);

        let (tx, mut rx) = mpsc::unbounded_channel();
        let result = {
            let segment = backend.segment(&ticket.image_ref, tx);
            tokio::pin!(segment);
            loop {
                tokio::select! {
                    result = &mut segment => break result,
                    Some(event) = rx.recv() => {
                        self.on_progress(ticket.generation, event);
                    }
                }
            }
        };
        while let Ok(event) = rx.try_recv() {
            self.on_progress(ticket.generation, event);
        }

        match self.complete(ticket.generation, result) {
            Completion::Published(count) => Ok(count),
            Completion::Failed(reason) => Err(Error::InferenceUnavailable(reason)),
            Completion::Stale => Err(Error::InferenceUnavailable(
                "inference was superseded".to_string(),
            )),
        }
    }

    fn require_ready(&self, action: &str) -> Result<()> {
        if self.state.phase != SessionPhase::Ready {
            return Err(Error::InvalidSelection(format!(
                "cannot {} while the session is {:?}",
                action, self.state.phase
            )));
        }
        Ok(())
    }

    fn set_selection(&mut self, selected: Option<RegionId>) {
        if self.state.selected != selected {
            self.state.selected = selected;
            self.emit(SessionEvent::SelectionChanged(selected));
        }
    }

    /// Select the region under the pointer, or clear the selection if none
    pub fn select_at(&mut self, pointer: &PointerEvent) -> Result<Option<RegionId>> {
        self.require_ready("select")?;
        let hit = resolve(&self.state.regions, pointer);
        debug!("Pointer ({}, {}) -> {:?}", pointer.x, pointer.y, hit);
        self.set_selection(hit);
        Ok(hit)
    }

    /// Select a region directly by id, or clear with `None`
    pub fn select(&mut self, id: Option<RegionId>) -> Result<()> {
        self.require_ready("select")?;
        if let Some(id) = id {
            if !self.state.regions.contains(id) {
                return Err(Error::InvalidSelection(format!("region {} does not exist", id)));
            }
        }
        self.set_selection(id);
        Ok(())
    }

    pub fn selected_region(&self) -> Option<&Region> {
        self.state
            .selected
            .and_then(|id| self.state.regions.get(id))
    }

    /// Materials offered for the selected region's category
    pub fn offered_materials(&self) -> &[Material] {
        match self.selected_region() {
            Some(region) => self.config.catalog.materials(region.category),
            None => &[],
        }
    }

    /// Material bound to the selected region
    pub fn active_material(&self) -> Option<&Material> {
        self.state
            .selected
            .and_then(|id| self.state.bindings.get(id))
    }

    /// Bind `material` to the selected region
    pub fn apply(&mut self, material: &Material) -> Result<()> {
        self.require_ready("apply a material")?;
        let selected = self
            .state
            .selected
            .and_then(|id| self.state.regions.get(id));
        self.state
            .bindings
            .apply(selected, material, &self.config.catalog)?;

        if let Some(region) = self.state.selected {
            self.emit(SessionEvent::BindingChanged {
                region,
                material: Some(material.clone()),
            });
        }
        Ok(())
    }

    /// Bind the catalog material `material_id` of the selected region's category
    pub fn apply_by_id(&mut self, material_id: &str) -> Result<()> {
        let material = self
            .offered_materials()
            .iter()
            .find(|m| m.id == material_id)
            .cloned()
            .ok_or_else(|| {
                Error::InvalidSelection(format!(
                    "material '{}' is not offered for the current selection",
                    material_id
                ))
            })?;
        self.apply(&material)
    }

    /// Remove the selected region's binding
    pub fn clear_selected(&mut self) -> Result<Option<Material>> {
        self.require_ready("clear a material")?;
        let id = self
            .state
            .selected
            .ok_or_else(|| Error::InvalidSelection("no region is selected".to_string()))?;
        Ok(self.clear_binding(id))
    }

    /// Remove the binding of `id`, which must be the selected region;
    /// a no-op if it has none
    pub fn clear(&mut self, id: RegionId) -> Result<Option<Material>> {
        self.require_ready("clear a material")?;
        if !self.state.regions.contains(id) {
            return Err(Error::InvalidSelection(format!("region {} does not exist", id)));
        }
        if self.state.selected != Some(id) {
            return Err(Error::InvalidSelection(format!("region {} is not selected", id)));
        }
        Ok(self.clear_binding(id))
    }

    fn clear_binding(&mut self, id: RegionId) -> Option<Material> {
        let removed = self.state.bindings.clear(id);
        if removed.is_some() {
            self.emit(SessionEvent::BindingChanged {
                region: id,
                material: None,
            });
        }
        removed
    }

    /// Render layers in drawing order
    pub fn layers(&self) -> Vec<RenderLayer<'_>> {
        if self.state.phase != SessionPhase::Ready {
            return Vec::new();
        }
        self.renderer.layers(
            &self.state.regions,
            &self.state.bindings,
            self.state.selected,
        )
    }

    pub fn snapshot(&self) -> SessionSnapshot<'_> {
        SessionSnapshot::new(&self.state)
    }

    /// Texture references of the configured catalog, for preloading
    pub fn texture_refs(&self) -> Vec<String> {
        let refs = self.config.catalog.unique_texture_refs();
        if refs.is_empty() {
            warn!("Material catalog has no textures");
        }
        refs
    }
}
