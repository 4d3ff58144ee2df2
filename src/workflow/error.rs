use thiserror::Error;

use crate::client::ClientError;
use crate::model::ModelError;

pub type Result<T> = std::result::Result<T, WorkflowError>;

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("no image has been uploaded")]
    NoImage,

    #[error("image dimensions are not known yet")]
    SourceNotReady,

    #[error("no viewer is attached to an active image")]
    ViewerNotReady,

    #[error("there are no ROIs to process")]
    NoRois,

    #[error("ROI {0} does not exist")]
    UnknownRoi(usize),

    #[error("ROI {0} has not been segmented yet")]
    NotSegmented(usize),

    #[error("label for ROI {index} must be an integer")]
    LabelsIncomplete { index: usize },

    #[error("no processing result is available")]
    NoResult,

    #[error("no trained model is available")]
    ModelMissing,

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("workflow I/O failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("workflow serialization failure: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("workflow YAML serialization failure: {0}")]
    SerdeYaml(#[from] serde_yaml::Error),
}
