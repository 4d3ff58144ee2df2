use serde::{Deserialize, Serialize};

use crate::model::PixelRect;
use crate::ui::RoiStore;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRoi {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl SessionRoi {
    pub fn rect(&self) -> PixelRect {
        PixelRect::new(self.x, self.y, self.width, self.height)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RoiSession {
    #[serde(default)]
    pub image_path: Option<String>,
    #[serde(default)]
    pub rois: Vec<SessionRoi>,
}

impl RoiSession {
    pub fn capture(image_path: Option<&str>, store: &RoiStore) -> Self {
        Self {
            image_path: image_path.map(str::to_string),
            rois: store
                .iter()
                .map(|record| SessionRoi {
                    x: record.rect.x,
                    y: record.rect.y,
                    width: record.rect.width,
                    height: record.rect.height,
                    label: record.label.clone(),
                })
                .collect(),
        }
    }

    pub fn labels(&self) -> Vec<Option<&str>> {
        self.rois.iter().map(|roi| roi.label.as_deref()).collect()
    }
}
