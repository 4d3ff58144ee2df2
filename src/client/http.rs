use std::io::{Cursor, Read};
use std::path::Path;
use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::model::{Prediction, RgbSample, Segmentation};

use super::manifest::{DeepZoomManifest, parse_manifest};
use super::multipart::{MultipartFile, ProgressReader};
use super::service::{ProcessRequest, RemoteService, TrainedModel};
use super::wire::{
    HealthResponse, PredictBody, PredictResponse, ProcessBody, ProcessResponse, TileResponse,
    TrainBody, TrainResponse, UploadResponse, UploadsResponse,
};
use super::{ClientError, Result};

const DEFAULT_CHUNK_SIZE: usize = 1024 * 1024;
const MAX_RASTER_BYTES: u64 = 512 * 1024 * 1024;

/// [`RemoteService`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpService {
    agent: ureq::Agent,
    base_url: String,
    chunk_size: usize,
}

impl HttpService {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            agent,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Sets how many bytes are sent between upload progress reports.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

fn read_json<T: DeserializeOwned>(response: ureq::Response) -> Result<T> {
    response
        .into_json::<T>()
        .map_err(|error| ClientError::Decode(error.to_string()))
}

impl RemoteService for HttpService {
    fn health(&self) -> Result<String> {
        let response = self.agent.get(&self.endpoint("health")).call()?;
        Ok(read_json::<HealthResponse>(response)?.status)
    }

    fn list_uploads(&self) -> Result<Vec<String>> {
        let response = self.agent.get(&self.endpoint("list_uploads")).call()?;
        Ok(read_json::<UploadsResponse>(response)?.files)
    }

    fn upload(&self, file: &Path, progress: &mut dyn FnMut(u8)) -> Result<String> {
        let multipart = MultipartFile::open("file", file)?;
        log::debug!(
            "uploading {} ({} bytes)",
            file.display(),
            multipart.content_length
        );
        let body = ProgressReader::new(
            multipart.body,
            multipart.content_length,
            self.chunk_size,
            progress,
        );
        let response = self
            .agent
            .post(&self.endpoint("upload_wsi"))
            .set("Content-Type", &multipart.content_type)
            .set("Content-Length", &multipart.content_length.to_string())
            .send(body)?;
        Ok(read_json::<UploadResponse>(response)?.wsi_path)
    }

    fn tile(&self, image_path: &str) -> Result<String> {
        let response = self
            .agent
            .post(&self.endpoint("tile_wsi"))
            .send_form(&[("wsi_path", image_path)])?;
        Ok(read_json::<TileResponse>(response)?.dzi_url)
    }

    fn fetch_manifest(&self, manifest_url: &str) -> Result<DeepZoomManifest> {
        let xml = self.agent.get(manifest_url).call()?.into_string()?;
        parse_manifest(&xml)
    }

    fn raster_url(&self, image_path: &str) -> String {
        let file_name = image_path
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(image_path);
        self.endpoint(&format!("uploads/{file_name}"))
    }

    fn fetch_raster_dimensions(&self, image_path: &str) -> Result<(u32, u32)> {
        let response = self.agent.get(&self.raster_url(image_path)).call()?;
        let mut bytes = Vec::new();
        response
            .into_reader()
            .take(MAX_RASTER_BYTES)
            .read_to_end(&mut bytes)?;
        let dimensions = image::ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()?
            .into_dimensions()?;
        Ok(dimensions)
    }

    fn process_regions(&self, request: &ProcessRequest) -> Result<Vec<Segmentation>> {
        let body = ProcessBody::new(&request.image_path, &request.rects, &request.config);
        log::debug!(
            "processing {} regions of {} ({})",
            body.rois.len(),
            request.image_path,
            body.threshold_type
        );
        let response = self
            .agent
            .post(&self.endpoint("process_roi"))
            .send_json(&body)?;
        let results = read_json::<ProcessResponse>(response)?.results;
        if results.len() != request.rects.len() {
            return Err(ClientError::ResultCount {
                expected: request.rects.len(),
                got: results.len(),
            });
        }
        Ok(results)
    }

    fn train(&self, rgb: &[Vec<RgbSample>], labels: &[i64]) -> Result<TrainedModel> {
        let response = self
            .agent
            .post(&self.endpoint("train_model"))
            .send_json(TrainBody { rgb, labels })?;
        let trained = read_json::<TrainResponse>(response)?;
        Ok(TrainedModel {
            model_id: trained.model_id,
            loss_history: trained.loss_history,
        })
    }

    fn predict(&self, model_id: &str, rgb: &[RgbSample]) -> Result<Prediction> {
        let response = self
            .agent
            .post(&self.endpoint("predict_model"))
            .send_json(PredictBody { model_id, rgb })?;
        Ok(Prediction::new(
            read_json::<PredictResponse>(response)?.predictions,
        ))
    }
}
