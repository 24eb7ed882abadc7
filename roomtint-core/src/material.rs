//! Materials that can be bound to a region

use serde::{Deserialize, Serialize};
use std::fmt;

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` (the leading `#` is required)
    pub fn parse_hex(value: &str) -> Option<Self> {
        let hex = value.trim().strip_prefix('#')?;
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Fill a material paints with
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MaterialKind {
    /// Flat color, `#RRGGBB`
    Color { color: String },
    /// Tiled texture, referenced by asset path
    Texture { image: String },
}

/// A selectable finish offered for one category
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Material {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub kind: MaterialKind,
}

impl Material {
    pub fn color(id: impl Into<String>, name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: MaterialKind::Color { color: color.into() },
        }
    }

    pub fn texture(id: impl Into<String>, name: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: MaterialKind::Texture { image: image.into() },
        }
    }

    pub fn is_texture(&self) -> bool {
        matches!(self.kind, MaterialKind::Texture { .. })
    }

    /// Texture reference, if this is a texture material
    pub fn texture_ref(&self) -> Option<&str> {
        match &self.kind {
            MaterialKind::Texture { image } => Some(image),
            MaterialKind::Color { .. } => None,
        }
    }

    /// Parsed flat color, if this is a color material with a valid hex value
    pub fn rgb(&self) -> Option<Rgb> {
        match &self.kind {
            MaterialKind::Color { color } => Rgb::parse_hex(color),
            MaterialKind::Texture { .. } => None,
        }
    }
}
