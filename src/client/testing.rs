use std::cell::{Cell, RefCell};
use std::path::Path;

use crate::model::{Prediction, RgbSample, Segmentation};

use super::{
    ClientError, DeepZoomManifest, ProcessRequest, RemoteService, Result, TrainedModel,
};

pub(crate) const PNG_SIGNATURE_B64: &str = "iVBORw0KGgo=";

/// Scripted [`RemoteService`] that records every call.
#[derive(Default)]
pub(crate) struct FakeService {
    pub(crate) calls: RefCell<Vec<&'static str>>,
    pub(crate) fail_upload: Cell<bool>,
    pub(crate) fail_tile: Cell<bool>,
    pub(crate) fail_process: Cell<bool>,
    pub(crate) fail_train: Cell<bool>,
    pub(crate) trained_labels: RefCell<Vec<i64>>,
    pub(crate) processed_rects: RefCell<Vec<usize>>,
}

impl FakeService {
    pub(crate) fn calls(&self) -> Vec<&'static str> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: &'static str) {
        self.calls.borrow_mut().push(call);
    }

    fn server_error(detail: &str) -> ClientError {
        ClientError::Status {
            status: 500,
            detail: detail.to_string(),
        }
    }
}

impl RemoteService for FakeService {
    fn health(&self) -> Result<String> {
        self.record("health");
        Ok("ok".to_string())
    }

    fn list_uploads(&self) -> Result<Vec<String>> {
        self.record("list_uploads");
        Ok(Vec::new())
    }

    fn upload(&self, file: &Path, progress: &mut dyn FnMut(u8)) -> Result<String> {
        self.record("upload");
        if self.fail_upload.get() {
            return Err(Self::server_error("disk full"));
        }
        progress(40);
        progress(100);
        let name = file
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();
        Ok(format!("uploads/{name}"))
    }

    fn tile(&self, image_path: &str) -> Result<String> {
        self.record("tile");
        if self.fail_tile.get() {
            return Err(Self::server_error("openslide failed"));
        }
        Ok(format!("http://server/tiles/{image_path}.dzi"))
    }

    fn fetch_manifest(&self, _manifest_url: &str) -> Result<DeepZoomManifest> {
        self.record("manifest");
        Ok(DeepZoomManifest {
            width: 10_000,
            height: 8_000,
            tile_size: Some(254),
            overlap: Some(1),
            format: Some("jpeg".to_string()),
        })
    }

    fn raster_url(&self, image_path: &str) -> String {
        format!("http://server/{image_path}")
    }

    fn fetch_raster_dimensions(&self, _image_path: &str) -> Result<(u32, u32)> {
        self.record("raster_dimensions");
        Ok((400, 300))
    }

    fn process_regions(&self, request: &ProcessRequest) -> Result<Vec<Segmentation>> {
        self.record("process");
        self.processed_rects.borrow_mut().push(request.rects.len());
        if self.fail_process.get() {
            return Err(Self::server_error("ROI out of bounds"));
        }
        Ok((0..request.rects.len())
            .map(|index| Segmentation {
                mask: PNG_SIGNATURE_B64.to_string(),
                rgb: vec![[index as u8, 10, 20], [index as u8, 30, 40]],
            })
            .collect())
    }

    fn train(&self, _rgb: &[Vec<RgbSample>], labels: &[i64]) -> Result<TrainedModel> {
        self.record("train");
        if self.fail_train.get() {
            return Err(Self::server_error("single class"));
        }
        *self.trained_labels.borrow_mut() = labels.to_vec();
        Ok(TrainedModel {
            model_id: "model-1".to_string(),
            loss_history: vec![0.9, 0.5, 0.25],
        })
    }

    fn predict(&self, _model_id: &str, rgb: &[RgbSample]) -> Result<Prediction> {
        self.record("predict");
        Ok(Prediction::new(rgb.iter().map(|sample| i64::from(sample[0])).collect()))
    }
}
