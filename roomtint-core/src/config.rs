// Configuration for the roomtint pipeline

use crate::catalog::MaterialCatalog;
use crate::error::Error;
use crate::material::Rgb;
use crate::types::Category;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error as ThisError;
use tracing::{debug, info};

/// Stencil encoding configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    /// Gaussian sigma, in mask pixels, used to soften stencil edges
    pub smoothing_sigma: f32,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            smoothing_sigma: 2.0,
        }
    }
}

/// Parameters of the default perspective heuristic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrientationConfig {
    pub perspective_px: f32,
    /// Floor/ceiling tilt around the horizontal axis
    pub tilt_degrees: f32,
    /// Side wall rotation around the vertical axis
    pub rotate_degrees: f32,
    /// Walls centered left of this fraction of the width face the left vanishing point
    pub left_threshold: f32,
    /// Walls centered right of this fraction of the width face the right vanishing point
    pub right_threshold: f32,
    pub tilt_scale: f32,
    pub side_scale: f32,
    pub front_scale: f32,
}

impl Default for OrientationConfig {
    fn default() -> Self {
        Self {
            perspective_px: 1200.0,
            tilt_degrees: 60.0,
            rotate_degrees: 55.0,
            left_threshold: 0.4,
            right_threshold: 0.6,
            tilt_scale: 2.5,
            side_scale: 2.0,
            front_scale: 1.2,
        }
    }
}

/// Render layer styling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub selected_z: i32,
    pub bound_z: i32,
    pub color_opacity: f32,
    pub texture_opacity: f32,
    /// Texture fill size relative to the layer bounds, centered
    pub texture_overscan: f32,
    /// Edge length of one texture tile, in display pixels
    pub texture_tile_px: u32,
    pub highlight_color: String,
    pub highlight_opacity: f32,
    /// Fill used when a texture is missing from the asset cache
    pub placeholder_color: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            selected_z: 10,
            bound_z: 5,
            color_opacity: 0.9,
            texture_opacity: 0.85,
            texture_overscan: 2.0,
            texture_tile_px: 200,
            highlight_color: "#0078FF".to_string(),
            highlight_opacity: 0.4,
            placeholder_color: "#CCCCCC".to_string(),
        }
    }
}

/// Inference collaborator identification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    pub model_id: String,
    pub task: String,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            model_id: "Xenova/segformer-b2-finetuned-ade-512-512".to_string(),
            task: "image-segmentation".to_string(),
        }
    }
}

/// Texture asset location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// Directory texture references are resolved against
    pub texture_root: PathBuf,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            texture_root: PathBuf::from("./public"),
        }
    }
}

/// Full roomtint configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TintConfig {
    pub log_level: String,
    pub encoder: EncoderConfig,
    pub orientation: OrientationConfig,
    pub render: RenderConfig,
    pub inference: InferenceConfig,
    pub assets: AssetConfig,
    pub catalog: MaterialCatalog,
}

impl Default for TintConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            encoder: EncoderConfig::default(),
            orientation: OrientationConfig::default(),
            render: RenderConfig::default(),
            inference: InferenceConfig::default(),
            assets: AssetConfig::default(),
            catalog: MaterialCatalog::default(),
        }
    }
}

#[derive(ThisError, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Error::Configuration(err.to_string())
    }
}

impl TintConfig {
    /// Load configuration from a JSON, TOML or YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
        info!("Loading configuration from {}", path.display());
        Self::from_str(&content)
    }

    /// Load configuration from a string, trying JSON, then TOML, then YAML
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        if let Ok(config) = serde_json::from_str::<TintConfig>(content) {
            debug!("Parsed configuration as JSON");
            return Ok(config);
        }

        if let Ok(config) = toml::from_str::<TintConfig>(content) {
            debug!("Parsed configuration as TOML");
            return Ok(config);
        }

        if let Ok(config) = serde_yaml::from_str::<TintConfig>(content) {
            debug!("Parsed configuration as YAML");
            return Ok(config);
        }

        Err(ConfigError::Parse("Unknown format".to_string()))
    }

    /// Overlay `ROOMTINT_*` environment variables
    pub fn from_env(mut self) -> Self {
        if let Ok(log_level) = std::env::var("ROOMTINT_LOG_LEVEL") {
            self.log_level = log_level;
        }

        if let Ok(model_id) = std::env::var("ROOMTINT_MODEL") {
            self.inference.model_id = model_id;
        }

        if let Ok(root) = std::env::var("ROOMTINT_TEXTURE_ROOT") {
            self.assets.texture_root = PathBuf::from(root);
        }

        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.encoder.smoothing_sigma > 0.0) || !self.encoder.smoothing_sigma.is_finite() {
            return Err(ConfigError::Validation(
                "encoder.smoothing_sigma must be a positive number".to_string(),
            ));
        }

        let o = &self.orientation;
        let unit = 0.0..=1.0;
        if !unit.contains(&o.left_threshold) || !unit.contains(&o.right_threshold) {
            return Err(ConfigError::Validation(
                "orientation thresholds must be within [0, 1]".to_string(),
            ));
        }
        if o.left_threshold >= o.right_threshold {
            return Err(ConfigError::Validation(
                "orientation.left_threshold must be below right_threshold".to_string(),
            ));
        }
        for (name, scale) in [
            ("tilt_scale", o.tilt_scale),
            ("side_scale", o.side_scale),
            ("front_scale", o.front_scale),
            ("perspective_px", o.perspective_px),
        ] {
            if !(scale > 0.0) || !scale.is_finite() {
                return Err(ConfigError::Validation(format!(
                    "orientation.{} must be a positive number",
                    name
                )));
            }
        }

        let r = &self.render;
        for (name, opacity) in [
            ("color_opacity", r.color_opacity),
            ("texture_opacity", r.texture_opacity),
            ("highlight_opacity", r.highlight_opacity),
        ] {
            if !unit.contains(&opacity) {
                return Err(ConfigError::Validation(format!(
                    "render.{} must be within [0, 1]",
                    name
                )));
            }
        }
        if r.selected_z <= r.bound_z {
            return Err(ConfigError::Validation(
                "render.selected_z must be above render.bound_z".to_string(),
            ));
        }
        if !(r.texture_overscan >= 1.0) || r.texture_tile_px == 0 {
            return Err(ConfigError::Validation(
                "render.texture_overscan must be >= 1 and texture_tile_px > 0".to_string(),
            ));
        }
        for (name, color) in [
            ("highlight_color", &r.highlight_color),
            ("placeholder_color", &r.placeholder_color),
        ] {
            if Rgb::parse_hex(color).is_none() {
                return Err(ConfigError::Validation(format!(
                    "render.{} is not a #RRGGBB color: {}",
                    name, color
                )));
            }
        }

        self.validate_catalog()
    }

    fn validate_catalog(&self) -> Result<(), ConfigError> {
        for category in Category::ALL {
            let mut seen = HashSet::new();
            for material in self.catalog.materials(category) {
                if material.id.trim().is_empty() {
                    return Err(ConfigError::Validation(format!(
                        "catalog.{} contains a material with an empty id",
                        category
                    )));
                }
                if !seen.insert(material.id.as_str()) {
                    return Err(ConfigError::Validation(format!(
                        "catalog.{} contains duplicate material id '{}'",
                        category, material.id
                    )));
                }
                if let crate::material::MaterialKind::Color { color } = &material.kind {
                    if Rgb::parse_hex(color).is_none() {
                        return Err(ConfigError::Validation(format!(
                            "material '{}' has invalid color '{}'",
                            material.id, color
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}
