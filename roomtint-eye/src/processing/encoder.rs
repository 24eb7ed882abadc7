//! Mask encoding: occupancy masks to bounding boxes and soft-edged stencils

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{imageops, DynamicImage, ImageOutputFormat, Rgba, RgbaImage};
use roomtint_core::config::EncoderConfig;
use roomtint_core::{BoundingBox, Error, OccupancyMask, Result};
use serde::{Serialize, Serializer};
use std::io::Cursor;

/// Alpha stencil clipping a fill to a region's footprint, PNG encoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stencil {
    pub width: u32,
    pub height: u32,
    /// Number of occupied mask pixels the stencil was built from
    pub coverage: usize,
    png: Vec<u8>,
}

impl Stencil {
    pub fn png_bytes(&self) -> &[u8] {
        &self.png
    }

    pub fn is_empty(&self) -> bool {
        self.coverage == 0 || self.png.is_empty()
    }

    /// `data:` URL for presentation layers that reference images by URL
    pub fn data_url(&self) -> String {
        format!("data:image/png;base64,{}", STANDARD.encode(&self.png))
    }

    /// Decode back into pixels
    pub fn decode(&self) -> Result<RgbaImage> {
        image::load_from_memory(&self.png)
            .map(|img| img.to_rgba8())
            .map_err(|e| Error::Encoding(format!("Failed to decode stencil: {}", e)))
    }
}

impl Serialize for Stencil {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.data_url())
    }
}

/// Output of encoding one occupied mask
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedMask {
    pub bounding_box: BoundingBox,
    pub stencil: Stencil,
}

/// Builds stencils from occupancy masks
#[derive(Debug, Clone)]
pub struct MaskEncoder {
    smoothing_sigma: f32,
}

impl Default for MaskEncoder {
    fn default() -> Self {
        Self::new(&EncoderConfig::default())
    }
}

impl MaskEncoder {
    pub fn new(config: &EncoderConfig) -> Self {
        Self {
            smoothing_sigma: config.smoothing_sigma,
        }
    }

    /// Encode the mask of the `index`-th accepted segment.
    ///
    /// Returns `Error::EmptyRegion` when no pixel is occupied and
    /// `Error::MaskShape` when the mask is malformed.
    pub fn encode(&self, index: usize, mask: &OccupancyMask) -> Result<EncodedMask> {
        mask.validate()?;
        let width = u32::try_from(mask.width)
            .map_err(|_| Error::MaskShape(format!("mask width {} too large", mask.width)))?;
        let height = u32::try_from(mask.height)
            .map_err(|_| Error::MaskShape(format!("mask height {} too large", mask.height)))?;

        let mut binary = RgbaImage::new(width, height);
        let mut min_x = mask.width;
        let mut max_x = 0usize;
        let mut coverage = 0usize;

        for (i, &value) in mask.data.iter().enumerate() {
            if value > 0.0 {
                let x = i % mask.width;
                let y = i / mask.width;
                min_x = min_x.min(x);
                max_x = max_x.max(x);
                coverage += 1;
                binary.put_pixel(x as u32, y as u32, Rgba([0, 0, 0, 255]));
            }
        }

        if coverage == 0 {
            return Err(Error::EmptyRegion { index });
        }

        let softened = imageops::blur(&binary, self.smoothing_sigma);

        let mut png = Vec::new();
        DynamicImage::ImageRgba8(softened)
            .write_to(&mut Cursor::new(&mut png), ImageOutputFormat::Png)
            .map_err(|e| Error::Encoding(format!("Failed to encode stencil {}: {}", index, e)))?;

        Ok(EncodedMask {
            bounding_box: BoundingBox { min_x, max_x },
            stencil: Stencil {
                width,
                height,
                coverage,
                png,
            },
        })
    }
}
