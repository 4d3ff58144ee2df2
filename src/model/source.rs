use serde::{Deserialize, Serialize};

use super::{ModelError, PixelRect, Result};

/// The image currently shown on the surface, with its full-resolution size.
///
/// A value only exists once the dimensions are known: a deep-zoom source after
/// its manifest was fetched, a raster source after the renderer loaded it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ImageSource {
    Tiled { width: u32, height: u32 },
    Raster { width: u32, height: u32 },
}

impl ImageSource {
    pub fn tiled(width: u32, height: u32) -> Result<Self> {
        validate_dimensions(width, height)?;
        Ok(Self::Tiled { width, height })
    }

    pub fn raster(width: u32, height: u32) -> Result<Self> {
        validate_dimensions(width, height)?;
        Ok(Self::Raster { width, height })
    }

    pub fn width(&self) -> u32 {
        match *self {
            Self::Tiled { width, .. } | Self::Raster { width, .. } => width,
        }
    }

    pub fn height(&self) -> u32 {
        match *self {
            Self::Tiled { height, .. } | Self::Raster { height, .. } => height,
        }
    }

    pub fn is_tiled(&self) -> bool {
        matches!(self, Self::Tiled { .. })
    }

    /// Whether `rect` lies entirely inside the image.
    pub fn contains(&self, rect: &PixelRect) -> bool {
        rect.x >= 0
            && rect.y >= 0
            && rect.right() <= i64::from(self.width())
            && rect.bottom() <= i64::from(self.height())
    }
}

fn validate_dimensions(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(ModelError::EmptyDimensions { width, height });
    }
    Ok(())
}
