mod error;
mod http;
mod manifest;
mod multipart;
mod service;
mod wire;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{ClientError, Result};
pub use http::HttpService;
pub use manifest::{DeepZoomManifest, parse_manifest};
pub use multipart::upload_percent;
pub use service::{ProcessRequest, RemoteService, TrainedModel};
