use serde::{Deserialize, Serialize};

use super::{ClientError, Result};

/// Full-resolution geometry of a Deep Zoom pyramid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeepZoomManifest {
    pub width: u32,
    pub height: u32,
    pub tile_size: Option<u32>,
    pub overlap: Option<u32>,
    pub format: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ImageElement {
    #[serde(rename = "@TileSize")]
    tile_size: Option<u32>,
    #[serde(rename = "@Overlap")]
    overlap: Option<u32>,
    #[serde(rename = "@Format")]
    format: Option<String>,
    #[serde(rename = "Size")]
    size: SizeElement,
}

#[derive(Debug, Deserialize)]
struct SizeElement {
    #[serde(rename = "@Width")]
    width: u32,
    #[serde(rename = "@Height")]
    height: u32,
}

/// Parses a `.dzi` document:
///
/// ```xml
/// <Image TileSize="254" Overlap="1" Format="jpeg" xmlns="http://schemas.microsoft.com/deepzoom/2008">
///   <Size Width="10000" Height="8000"/>
/// </Image>
/// ```
pub fn parse_manifest(xml: &str) -> Result<DeepZoomManifest> {
    let image: ImageElement =
        quick_xml::de::from_str(xml).map_err(|error| ClientError::Manifest(error.to_string()))?;
    if image.size.width == 0 || image.size.height == 0 {
        return Err(ClientError::Manifest(format!(
            "image size {}x{} is empty",
            image.size.width, image.size.height
        )));
    }
    Ok(DeepZoomManifest {
        width: image.size.width,
        height: image.size.height,
        tile_size: image.tile_size,
        overlap: image.overlap,
        format: image.format,
    })
}
