use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::model::{PixelRect, Prediction, ProcessConfig, RgbSample, Segmentation};

use super::{ClientError, DeepZoomManifest, Result};

/// Region processing input: regions of one uploaded slide plus shared settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessRequest {
    pub image_path: String,
    pub rects: Vec<PixelRect>,
    pub config: ProcessConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainedModel {
    pub model_id: String,
    pub loss_history: Vec<f64>,
}

/// The remote tiling/processing/training service.
pub trait RemoteService {
    fn health(&self) -> Result<String>;

    fn list_uploads(&self) -> Result<Vec<String>>;

    /// Uploads `file`, calling `progress` with whole percentages. Returns the
    /// server-side image path.
    fn upload(&self, file: &Path, progress: &mut dyn FnMut(u8)) -> Result<String>;

    /// Requests a Deep Zoom pyramid for a pyramidal slide. Returns the manifest URL.
    fn tile(&self, image_path: &str) -> Result<String>;

    fn fetch_manifest(&self, manifest_url: &str) -> Result<DeepZoomManifest>;

    /// URL under which the service publishes an uploaded raster image.
    fn raster_url(&self, image_path: &str) -> String;

    /// Downloads an uploaded raster image far enough to read its dimensions.
    fn fetch_raster_dimensions(&self, image_path: &str) -> Result<(u32, u32)>;

    /// Segments every region; results are aligned with `request.rects`.
    fn process_regions(&self, request: &ProcessRequest) -> Result<Vec<Segmentation>>;

    fn train(&self, rgb: &[Vec<RgbSample>], labels: &[i64]) -> Result<TrainedModel>;

    fn predict(&self, model_id: &str, rgb: &[RgbSample]) -> Result<Prediction>;

    /// Segments a single region and returns its base64 PNG mask.
    fn process_region(
        &self,
        image_path: &str,
        rect: PixelRect,
        config: &ProcessConfig,
    ) -> Result<String> {
        let request = ProcessRequest {
            image_path: image_path.to_string(),
            rects: vec![rect],
            config: config.clone(),
        };
        let mut results = self.process_regions(&request)?;
        if results.len() != 1 {
            return Err(ClientError::ResultCount {
                expected: 1,
                got: results.len(),
            });
        }
        Ok(results.remove(0).mask)
    }
}
