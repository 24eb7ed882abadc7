//! Region extraction stages

pub mod ingest;
pub mod encoder;
pub mod orientation;

pub use ingest::{classify_label, ingest, ClassifiedSegment};
pub use encoder::{EncodedMask, MaskEncoder, Stencil};
pub use orientation::{
    default_transform, HeuristicOrientation, OrientationPolicy, TiltDirection, TransformSpec,
    VanishingSide,
};
