use thiserror::Error;

pub type Result<T> = std::result::Result<T, ModelError>;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("image dimensions must be non-zero (got {width}x{height})")]
    EmptyDimensions { width: u32, height: u32 },

    #[error("unsupported slide format: {0}")]
    UnsupportedFormat(String),

    #[error("invalid manual value {0}: threshold must be within 0..=255")]
    ManualValueOutOfRange(i64),

    #[error("mask payload is not valid base64: {0}")]
    MaskDecode(#[from] base64::DecodeError),
}
