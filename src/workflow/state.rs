use crate::client::TrainedModel;
use crate::model::ImageSource;
use crate::ui::RoiStore;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum SourceState {
    #[default]
    Unset,
    /// A raster upload is published at `url`; its size is reported once it loads.
    AwaitingRaster { url: String },
    Ready(ImageSource),
}

impl SourceState {
    pub fn ready(&self) -> Option<&ImageSource> {
        match self {
            Self::Ready(source) => Some(source),
            Self::Unset | Self::AwaitingRaster { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct WorkflowState {
    pub(super) image_path: Option<String>,
    pub(super) manifest_url: Option<String>,
    pub(super) source: SourceState,
    pub(super) rois: RoiStore,
    pub(super) single_result: Option<String>,
    pub(super) model: Option<TrainedModel>,
    pub(super) upload_progress: u8,
}

impl WorkflowState {
    pub fn image_path(&self) -> Option<&str> {
        self.image_path.as_deref()
    }

    pub fn manifest_url(&self) -> Option<&str> {
        self.manifest_url.as_deref()
    }

    pub fn source(&self) -> &SourceState {
        &self.source
    }

    pub fn rois(&self) -> &RoiStore {
        &self.rois
    }

    /// Base64 PNG mask from the last single-region run.
    pub fn single_result(&self) -> Option<&str> {
        self.single_result.as_deref()
    }

    pub fn model_id(&self) -> Option<&str> {
        self.model.as_ref().map(|model| model.model_id.as_str())
    }

    pub fn loss_history(&self) -> &[f64] {
        self.model
            .as_ref()
            .map(|model| model.loss_history.as_slice())
            .unwrap_or_default()
    }

    pub fn upload_progress(&self) -> u8 {
        self.upload_progress
    }

    /// Forgets everything tied to the previous image. The trained model survives.
    pub(super) fn reset_image(&mut self) {
        self.image_path = None;
        self.manifest_url = None;
        self.source = SourceState::Unset;
        self.rois.clear();
        self.single_result = None;
        self.upload_progress = 0;
    }
}
