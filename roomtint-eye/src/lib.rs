//! roomtint-eye: region extraction and compositing for interior photos
//!
//! Turns labelled segmentation masks into editable wall, floor and
//! ceiling regions, resolves pointer clicks against them, binds catalog
//! materials and derives the stencil-clipped layers a presentation layer
//! draws over the photo. [`SessionController`] owns the state of one
//! uploaded image and serializes every mutation.

pub mod assets;
pub mod binding;
pub mod compositor;
pub mod models;
pub mod processing;
pub mod regions;
pub mod selection;
pub mod session;
pub mod snapshot;

pub use assets::{AssetCache, AssetLoader, AssetLookup, FsAssetLoader, PreloadReport};
pub use binding::MaterialBindings;
pub use compositor::{BlendMode, CompositeRenderer, Fill, RenderLayer};
pub use models::{ProgressEvent, RecordedBackend, SegmentationBackend};
pub use processing::{
    HeuristicOrientation, MaskEncoder, OrientationPolicy, Stencil, TransformSpec,
};
pub use regions::{Region, RegionIndex};
pub use selection::{resolve, PointerEvent};
pub use session::{
    Completion, InferenceTicket, SessionController, SessionEvent, SessionPhase, SessionState,
    Status,
};
pub use snapshot::{RegionView, SessionSnapshot};
