use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("server responded with status {status}: {detail}")]
    Status { status: u16, detail: String },

    #[error("request could not be delivered: {0}")]
    Transport(String),

    #[error("client I/O failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed server response: {0}")]
    Decode(String),

    #[error("invalid Deep Zoom manifest: {0}")]
    Manifest(String),

    #[error("could not read raster image size: {0}")]
    Image(#[from] image::ImageError),

    #[error("server returned {got} results for {expected} regions")]
    ResultCount { expected: usize, got: usize },
}

impl From<ureq::Error> for ClientError {
    fn from(error: ureq::Error) -> Self {
        match error {
            ureq::Error::Status(status, response) => {
                let body = response.into_string().unwrap_or_default();
                Self::Status {
                    status,
                    detail: super::wire::error_detail(&body),
                }
            }
            ureq::Error::Transport(transport) => Self::Transport(transport.to_string()),
        }
    }
}
