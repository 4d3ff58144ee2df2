use serde::{Deserialize, Serialize};

use super::{StageKind, StageStatus};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StageReport {
    pub stage: StageKind,
    pub status: StageStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoiReport {
    pub index: usize,
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
    pub label: Option<String>,
    pub samples: usize,
    pub predictions: Option<Vec<i64>>,
    pub majority_class: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunReport {
    pub image_path: Option<String>,
    pub manifest_url: Option<String>,
    pub stages: Vec<StageReport>,
    pub rois: Vec<RoiReport>,
    pub model_id: Option<String>,
    pub loss_history: Vec<f64>,
}
