use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::{PixelRect, ProcessConfig, RgbSample, Segmentation};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct RoiBox {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl From<PixelRect> for RoiBox {
    fn from(rect: PixelRect) -> Self {
        Self {
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ProcessBody<'a> {
    pub wsi_path: &'a str,
    pub rois: Vec<RoiBox>,
    pub threshold_type: &'static str,
    pub morph_ops: Vec<&'static str>,
    pub morph_kwargs: BTreeMap<&'static str, Value>,
}

impl<'a> ProcessBody<'a> {
    pub fn new(wsi_path: &'a str, rects: &[PixelRect], config: &ProcessConfig) -> Self {
        let mut morph_kwargs = BTreeMap::new();
        if let Some(value) = config.threshold.manual_value() {
            morph_kwargs.insert("manual_value", Value::from(value));
        }
        Self {
            wsi_path,
            rois: rects.iter().copied().map(RoiBox::from).collect(),
            threshold_type: config.threshold.name(),
            morph_ops: config.morph_ops.names(),
            morph_kwargs,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProcessResponse {
    pub results: Vec<Segmentation>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UploadResponse {
    pub wsi_path: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TileResponse {
    pub dzi_url: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct TrainBody<'a> {
    pub rgb: &'a [Vec<RgbSample>],
    pub labels: &'a [i64],
}

#[derive(Debug, Deserialize)]
pub(crate) struct TrainResponse {
    pub model_id: String,
    #[serde(default)]
    pub loss_history: Vec<f64>,
}

#[derive(Debug, Serialize)]
pub(crate) struct PredictBody<'a> {
    pub model_id: &'a str,
    pub rgb: &'a [RgbSample],
}

#[derive(Debug, Deserialize)]
pub(crate) struct PredictResponse {
    pub predictions: Vec<i64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UploadsResponse {
    #[serde(default)]
    pub files: Vec<String>,
}

/// Extracts the human-readable part of an error body such as `{"detail": "..."}`.
pub(crate) fn error_detail(body: &str) -> String {
    let trimmed = body.trim();
    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Object(map)) => match map.get("detail") {
            Some(Value::String(detail)) => detail.clone(),
            Some(other) => other.to_string(),
            None => trimmed.to_string(),
        },
        _ if trimmed.is_empty() => "no detail provided".to_string(),
        _ => trimmed.to_string(),
    }
}
