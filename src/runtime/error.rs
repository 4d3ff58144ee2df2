use thiserror::Error;

use crate::client::ClientError;
use crate::model::ModelError;
use crate::workflow::WorkflowError;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("remote service error: {0}")]
    Client(#[from] ClientError),

    #[error("workflow error: {0}")]
    Workflow(#[from] WorkflowError),

    #[error("invalid input: {0}")]
    Model(#[from] ModelError),

    #[error("configuration I/O failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration parse failure: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("configuration YAML parse failure: {0}")]
    SerdeYaml(#[from] serde_yaml::Error),
}
