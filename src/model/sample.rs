use std::collections::BTreeMap;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use super::Result;

/// One segmented pixel as `[r, g, b]`.
pub type RgbSample = [u8; 3];

/// Batch-processing output for one ROI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segmentation {
    /// PNG mask, base64 encoded as delivered by the service.
    pub mask: String,
    /// Colors of the pixels inside the mask, used as training samples.
    pub rgb: Vec<RgbSample>,
}

/// Decodes a base64 mask into PNG bytes.
pub fn decode_mask(mask: &str) -> Result<Vec<u8>> {
    Ok(STANDARD.decode(mask.trim().as_bytes())?)
}

impl Segmentation {
    pub fn mask_png(&self) -> Result<Vec<u8>> {
        decode_mask(&self.mask)
    }

    pub fn sample_count(&self) -> usize {
        self.rgb.len()
    }
}

/// Per-pixel class predictions for one ROI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prediction {
    pub classes: Vec<i64>,
}

impl Prediction {
    pub fn new(classes: Vec<i64>) -> Self {
        Self { classes }
    }

    /// Most frequent class; ties resolve to the smaller class id.
    pub fn majority_class(&self) -> Option<i64> {
        let mut counts = BTreeMap::new();
        for class in &self.classes {
            *counts.entry(*class).or_insert(0_usize) += 1;
        }
        counts
            .into_iter()
            .max_by(|(left_class, left), (right_class, right)| {
                left.cmp(right).then(right_class.cmp(left_class))
            })
            .map(|(class, _)| class)
    }
}
