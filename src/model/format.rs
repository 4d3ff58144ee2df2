use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{ModelError, Result};

pub const PYRAMIDAL_EXTENSIONS: &[&str] = &[
    "svs", "tiff", "tif", "ndpi", "mrxs", "vms", "vmu", "scn", "svslide", "bif",
];

pub const RASTER_EXTENSIONS: &[&str] = &["jpg", "png"];

/// How an uploaded slide is displayed, decided purely by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlideFormat {
    /// Needs server-side tiling before it can be viewed.
    Pyramidal,
    /// Served as-is and rendered as a single image.
    Raster,
}

impl SlideFormat {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|value| value.to_str())
            .map(|value| value.to_ascii_lowercase())
            .ok_or_else(|| ModelError::UnsupportedFormat(path.to_string_lossy().to_string()))?;
        Self::from_extension(&extension)
    }

    pub fn from_extension(extension: &str) -> Result<Self> {
        let extension = extension.trim_start_matches('.').to_ascii_lowercase();
        if RASTER_EXTENSIONS.contains(&extension.as_str()) {
            Ok(Self::Raster)
        } else if PYRAMIDAL_EXTENSIONS.contains(&extension.as_str()) {
            Ok(Self::Pyramidal)
        } else {
            Err(ModelError::UnsupportedFormat(extension))
        }
    }

    pub fn needs_tiling(self) -> bool {
        matches!(self, Self::Pyramidal)
    }
}

pub fn supported_extensions() -> impl Iterator<Item = &'static str> {
    PYRAMIDAL_EXTENSIONS
        .iter()
        .chain(RASTER_EXTENSIONS.iter())
        .copied()
}
