//! roomtint-core: shared vocabulary for the roomtint workspace
//!
//! Surface categories, raw inference segments, region identifiers,
//! materials and their catalog, configuration and the common error type.

pub mod types;
pub mod error;
pub mod material;
pub mod catalog;
pub mod config;

pub use error::{Error, Result};
pub use types::{BoundingBox, Category, OccupancyMask, RawSegment, RegionId};
pub use material::{Material, MaterialKind, Rgb};
pub use catalog::MaterialCatalog;
pub use config::{ConfigError, TintConfig};
